//! Navigation seam.

/// Surface for "navigate to path X" side effects.
///
/// The core never renders anything; it only tells the view layer where
/// to go (home after logout, the results view after a search).
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator that ignores every navigation request. Useful for headless
/// callers and tests that do not assert on navigation.
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _path: &str) {}
}
