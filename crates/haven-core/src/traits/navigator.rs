//! Client-side navigation trait (the browser's history and location).

/// Performs navigation on behalf of the session layer.
pub trait Navigator: Send + Sync + std::fmt::Debug + 'static {
    /// Current path including query string.
    fn current(&self) -> String;

    /// Client-side navigation replacing the current history entry.
    fn replace(&self, path: &str);

    /// Client-side navigation pushing a new history entry.
    fn push(&self, path: &str);

    /// Full page load of the given URL, discarding all in-memory state.
    fn hard_navigate(&self, url: &str);

    /// Full reload of the current page.
    fn reload(&self);
}
