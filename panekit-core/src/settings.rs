// SPDX-License-Identifier: LGPL-3.0-only
use anyhow::Result;
use peniko::Color;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use xdg::BaseDirectories;

use crate::config::{TabAlignment, ToolkitConfig};
use crate::error::ConfigError;

const XDG_PREFIX: &str = "panekit";
const CONFIG_FILE: &str = "config.toml";

/// One configuration file as found on disk. Every field is optional so that
/// later files only override what they actually mention.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsFile {
    /// Tab manager settings
    #[serde(default)]
    pub tabs: TabsSettings,
    /// Any other sections are captured here
    #[serde(flatten)]
    pub other: HashMap<String, toml::Value>,
}

/// Tab manager settings, see [TabsConfig](crate::config::TabsConfig).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TabsSettings {
    /// Edge the selector strip is docked to.
    pub alignment: Option<TabAlignment>,
    /// Size of the selector strip.
    pub strip_size: Option<f32>,
    /// Show the separator line.
    pub show_separator: Option<bool>,
    /// Colour of the separator line.
    #[serde(default, deserialize_with = "crate::serde_color::deserialize_option")]
    pub separator_color: Option<Color>,
    /// Draw selector borders.
    pub show_selector_border: Option<bool>,
    /// Activate a neighbouring tab when the mounted one is removed.
    pub reselect_on_remove: Option<bool>,
}

/// Registry for managing toolkit settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsRegistry {
    config: ToolkitConfig,
    other: HashMap<String, toml::Value>,
}

impl SettingsRegistry {
    /// Create a registry holding only the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry and load configuration from the standard locations.
    pub fn load() -> Result<Self> {
        let mut registry = Self::new();
        registry.load_standard_locations()?;
        Ok(registry)
    }

    /// Load configuration from standard locations in precedence order.
    ///
    /// Order (later overrides earlier):
    /// 1. System Data: /usr/share/panekit/config.toml (and XDG_DATA_DIRS)
    /// 2. System Config: /etc/xdg/panekit/config.toml (and XDG_CONFIG_DIRS)
    /// 3. User Config: ~/.config/panekit/config.toml (XDG_CONFIG_HOME)
    pub fn load_standard_locations(&mut self) -> Result<()> {
        let xdg_dirs = BaseDirectories::with_prefix(XDG_PREFIX)?;

        for path in xdg_dirs.find_data_files(CONFIG_FILE).rev() {
            self.load_file(&path);
        }

        for path in xdg_dirs.find_config_files(CONFIG_FILE).rev() {
            self.load_file(&path);
        }

        if let Some(user_config_path) = xdg_dirs.find_config_file(CONFIG_FILE) {
            self.load_file(&user_config_path);
        } else {
            let user_config_path = xdg_dirs.get_config_home().join(CONFIG_FILE);
            if user_config_path.exists() {
                self.load_file(&user_config_path);
            }
        }

        Ok(())
    }

    /// Load a single file, logging and skipping it if it cannot be read or parsed.
    pub fn load_file(&mut self, path: &Path) {
        log::info!("Loading config from: {:?}", path);
        match fs::read_to_string(path) {
            Ok(content) => {
                if let Err(e) = self.merge_toml(&content) {
                    log::warn!("Failed to parse config file {:?}: {}", path, e);
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}", path, e);
            },
        }
    }

    /// Load configuration from explicit paths, in order, reporting each result.
    pub fn load_from_paths(&mut self, paths: Vec<PathBuf>) -> Vec<Result<()>> {
        paths
            .into_iter()
            .map(|path| {
                let content = fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("Failed to read config file {:?}: {}", path, e))?;
                self.merge_toml(&content)
                    .map_err(|e| anyhow::anyhow!("Failed to parse config file {:?}: {}", path, e))
            })
            .collect()
    }

    /// Parse a TOML source and merge it over the current configuration.
    pub fn merge_toml(&mut self, source: &str) -> Result<(), ConfigError> {
        let file: SettingsFile = toml::from_str(source)?;
        self.merge(file);
        Ok(())
    }

    /// Merge a loaded file into the current configuration.
    fn merge(&mut self, other: SettingsFile) {
        // Tabs
        let tabs = &mut self.config.tabs;
        if let Some(alignment) = other.tabs.alignment {
            tabs.alignment = alignment;
        }
        if let Some(strip_size) = other.tabs.strip_size {
            tabs.strip_size = strip_size;
        }
        if let Some(show_separator) = other.tabs.show_separator {
            tabs.show_separator = show_separator;
        }
        if let Some(separator_color) = other.tabs.separator_color {
            tabs.separator_color = separator_color;
        }
        if let Some(show_selector_border) = other.tabs.show_selector_border {
            tabs.show_selector_border = show_selector_border;
        }
        if let Some(reselect_on_remove) = other.tabs.reselect_on_remove {
            tabs.reselect_on_remove = reselect_on_remove;
        }

        // Other
        self.other.extend(other.other);
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    /// Get a section this registry does not interpret.
    pub fn section(&self, name: &str) -> Option<&toml::Value> {
        self.other.get(name)
    }
}
