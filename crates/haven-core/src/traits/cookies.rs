//! Read-only cookie access.

/// Source of cookie values visible to the client.
pub trait CookieSource: Send + Sync + std::fmt::Debug + 'static {
    /// Value of the named cookie, if set.
    fn get(&self, name: &str) -> Option<String>;
}
