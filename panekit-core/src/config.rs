use peniko::Color;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::layout::{Dock, Orientation};

/// panekit configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolkitConfig {
    /// Tab manager configuration.
    #[serde(default)]
    pub tabs: TabsConfig,
}

impl ToolkitConfig {
    /// Parse a configuration from TOML. Missing fields keep their defaults.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}

/// The edge of a tab manager the selector strip is docked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabAlignment {
    /// Selectors above the content.
    #[default]
    Top,
    /// Selectors below the content.
    Bottom,
    /// Selectors left of the content.
    Left,
    /// Selectors right of the content.
    Right,
}

impl TabAlignment {
    /// The dock edge of the selector strip and separator.
    pub fn dock(self) -> Dock {
        match self {
            TabAlignment::Top => Dock::Top,
            TabAlignment::Bottom => Dock::Bottom,
            TabAlignment::Left => Dock::Left,
            TabAlignment::Right => Dock::Right,
        }
    }

    /// Returns if the selector strip runs horizontally.
    pub fn is_horizontal(self) -> bool {
        matches!(self, TabAlignment::Top | TabAlignment::Bottom)
    }

    /// Orientation of the selector strip and of the separator line.
    pub fn orientation(self) -> Orientation {
        if self.is_horizontal() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    /// The dock edge of each selector inside the strip.
    pub fn selector_dock(self) -> Dock {
        if self.is_horizontal() {
            Dock::Left
        } else {
            Dock::Top
        }
    }
}

/// Tab manager configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    /// Edge the selector strip is docked to.
    pub alignment: TabAlignment,
    /// Height (top/bottom) or width (left/right) of the selector strip.
    pub strip_size: f32,
    /// Show the line between the selector strip and the content.
    pub show_separator: bool,
    /// Colour of the separator line.
    #[serde(deserialize_with = "crate::serde_color::deserialize")]
    pub separator_color: Color,
    /// Draw a border around every selector.
    pub show_selector_border: bool,
    /// Activate a neighbouring tab when the mounted one is removed.
    pub reselect_on_remove: bool,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            alignment: TabAlignment::Top,
            strip_size: 32.0,
            show_separator: true,
            separator_color: Color::BLACK,
            show_selector_border: false,
            reselect_on_remove: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_yields_defaults() {
        let config = ToolkitConfig::from_toml("").unwrap();
        let defaults = TabsConfig::default();
        assert_eq!(config.tabs.alignment, defaults.alignment);
        assert_eq!(config.tabs.strip_size, defaults.strip_size);
        assert_eq!(config.tabs.show_separator, defaults.show_separator);
        let (loaded, default) = (config.tabs.separator_color.to_rgba8(), defaults.separator_color.to_rgba8());
        assert_eq!((loaded.r, loaded.g, loaded.b, loaded.a), (default.r, default.g, default.b, default.a));
        assert!(!config.tabs.show_selector_border);
        assert!(!config.tabs.reselect_on_remove);
    }

    #[test]
    fn test_partial_tabs_section() {
        let config = ToolkitConfig::from_toml(
            r##"
            [tabs]
            alignment = "left"
            strip_size = 48.0
            separator_color = "#336699"
            "##,
        )
        .unwrap();

        assert_eq!(config.tabs.alignment, TabAlignment::Left);
        assert_eq!(config.tabs.strip_size, 48.0);
        assert!(config.tabs.show_separator);
        let color = config.tabs.separator_color.to_rgba8();
        assert_eq!((color.r, color.g, color.b), (0x33, 0x66, 0x99));
    }

    #[test]
    fn test_bad_color_is_a_parse_error() {
        let result = ToolkitConfig::from_toml("[tabs]\nseparator_color = \"blue\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_alignment_docks() {
        assert_eq!(TabAlignment::Bottom.dock(), Dock::Bottom);
        assert_eq!(TabAlignment::Top.selector_dock(), Dock::Left);
        assert_eq!(TabAlignment::Right.selector_dock(), Dock::Top);
        assert_eq!(TabAlignment::Left.orientation(), Orientation::Vertical);
    }
}
