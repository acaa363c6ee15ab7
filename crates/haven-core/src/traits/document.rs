//! Document-level presentation hooks.

/// The root document element.
pub trait Document: Send + Sync + std::fmt::Debug + 'static {
    /// Toggle the dark-mode class on the root element.
    fn set_dark_mode(&self, enabled: bool);
}
