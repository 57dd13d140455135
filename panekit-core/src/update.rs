use bitflags::bitflags;

bitflags! {
    /// Update bitflags to define which part of the app should be updated.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Update: u8 {
        /// Re-evaluate widget state.
        const EVAL = 0b0001;
        /// Redraw the affected widgets.
        const DRAW = 0b0010;
        /// Recompute layout.
        const LAYOUT = 0b0100;
        /// Force an update even if nothing seems to have changed.
        const FORCE = 0b1000;
    }
}

impl Default for Update {
    fn default() -> Self {
        Self::empty()
    }
}
