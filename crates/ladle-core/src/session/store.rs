//! Token persistence seam.

use super::model::Session;
use crate::error::Result;

/// Persistent key-value storage for the session tokens and display
/// name. No validation of token contents; pure get/set/clear.
///
/// When storage is unavailable, implementations should fail the
/// operation and let callers degrade to anonymous rather than panic.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    /// Persists the session.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Loads the persisted session, `None` when absent.
    async fn load(&self) -> Result<Option<Session>>;

    /// Removes any persisted session.
    async fn clear(&self) -> Result<()>;
}
