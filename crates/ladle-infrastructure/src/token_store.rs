//! File-backed token store.
//!
//! Persists the session as a single JSON document under the base
//! directory. Tokens are opaque strings; nothing is validated here.

use crate::paths::LadlePaths;
use async_trait::async_trait;
use ladle_core::session::TokenStore;
use ladle_core::{Result, Session};
use tokio::fs;
use tracing::debug;

/// Token store writing `session.json` under a [`LadlePaths`] base dir.
///
/// Writes are last-writer-wins; concurrent flows overwrite each other
/// with the latest known-good value, which is acceptable because every
/// write carries the full session.
pub struct FileTokenStore {
    paths: LadlePaths,
}

impl FileTokenStore {
    pub fn new(paths: LadlePaths) -> Self {
        Self { paths }
    }

    /// Creates a store at the default location (`~/.ladle`).
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(LadlePaths::default_location()?))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn save(&self, session: &Session) -> Result<()> {
        fs::create_dir_all(self.paths.base_dir()).await?;
        let json = serde_json::to_string_pretty(session)?;
        fs::write(self.paths.session_file(), json).await?;
        debug!("session persisted");
        Ok(())
    }

    async fn load(&self) -> Result<Option<Session>> {
        let path = self.paths.session_file();
        let json = match fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let session: Session = serde_json::from_str(&json)?;
        Ok(Some(session))
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(self.paths.session_file()).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FileTokenStore {
        FileTokenStore::new(LadlePaths::new(dir.path()))
    }

    fn session() -> Session {
        Session::new("access-1", Some("refresh-1".to_string()), "alice")
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.save(&session()).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded, session());
    }

    #[tokio::test]
    async fn load_returns_none_when_nothing_persisted() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store(&dir).load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_removes_the_session() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.save(&session()).await.unwrap();
        store.clear().await.unwrap();

        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.clear().await.unwrap();
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn save_overwrites_previous_session() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.save(&session()).await.unwrap();
        let rotated = Session::new("access-2", Some("refresh-1".to_string()), "alice");
        store.save(&rotated).await.unwrap();

        assert_eq!(store.load().await.unwrap().unwrap(), rotated);
    }
}
