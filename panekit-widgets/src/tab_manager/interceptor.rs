// SPDX-License-Identifier: LGPL-3.0-only
use std::cell::Cell;

/// Which structural notification the tab manager is about to cause itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Suppression {
    /// Every notification is taken at face value.
    #[default]
    Idle,
    /// The next attach notification is self-inflicted.
    SuppressingAttach,
    /// The next detach notification is self-inflicted.
    SuppressingDetach,
}

/// Tells self-inflicted attach/detach notifications apart from consumer-driven ones.
///
/// The owner arms the interceptor right before it attaches or detaches a child
/// itself. The matching notification consumes the tag exactly once; a
/// notification of the other kind leaves it armed.
#[derive(Debug, Default)]
pub struct Interceptor {
    tag: Cell<Suppression>,
    suppressed: Cell<usize>,
}

impl Interceptor {
    /// Create an idle interceptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current tag.
    pub fn state(&self) -> Suppression {
        self.tag.get()
    }

    /// Total number of notifications suppressed so far.
    pub fn suppressed(&self) -> usize {
        self.suppressed.get()
    }

    /// Arm the interceptor for the next attach notification.
    ///
    /// The returned guard disarms it again if that notification never arrives.
    pub fn arm_attach(&self) -> Armed<'_> {
        self.arm(Suppression::SuppressingAttach)
    }

    /// Arm the interceptor for the next detach notification.
    ///
    /// The returned guard disarms it again if that notification never arrives.
    pub fn arm_detach(&self) -> Armed<'_> {
        self.arm(Suppression::SuppressingDetach)
    }

    fn arm(&self, tag: Suppression) -> Armed<'_> {
        let previous = self.tag.replace(tag);
        if previous != Suppression::Idle {
            log::warn!("Interceptor re-armed as {:?} while still {:?}", tag, previous);
        }
        Armed { interceptor: self, tag }
    }

    /// Returns `true` and disarms if an attach notification is expected.
    pub fn consume_attach(&self) -> bool {
        self.consume(Suppression::SuppressingAttach)
    }

    /// Returns `true` and disarms if a detach notification is expected.
    pub fn consume_detach(&self) -> bool {
        self.consume(Suppression::SuppressingDetach)
    }

    fn consume(&self, tag: Suppression) -> bool {
        if self.tag.get() != tag {
            return false;
        }
        self.tag.set(Suppression::Idle);
        self.suppressed.set(self.suppressed.get() + 1);
        true
    }
}

/// Keeps an [Interceptor] armed while the owner performs its own structural change.
#[must_use = "the interceptor is disarmed as soon as the guard is dropped"]
pub struct Armed<'a> {
    interceptor: &'a Interceptor,
    tag: Suppression,
}

impl Drop for Armed<'_> {
    fn drop(&mut self) {
        if self.interceptor.tag.get() == self.tag {
            log::trace!("No notification consumed {:?}, disarming", self.tag);
            self.interceptor.tag.set(Suppression::Idle);
        }
    }
}
