//! Session state machine.

use super::model::Session;
use super::navigator::Navigator;
use super::store::TokenStore;
use crate::api::TokenRefreshApi;
use crate::error::{LadleError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Callback invoked after every transition to anonymous, so outer
/// layers can reset per-identity state before the next render.
pub type LogoutHook = Arc<dyn Fn() + Send + Sync>;

/// Owns the in-memory identity and the token lifecycle.
///
/// Two states: anonymous (`None`) and authenticated (`Some(Session)`).
/// The session is mirrored into the [`TokenStore`] so it survives
/// restarts; storage failures are logged and the controller degrades to
/// in-memory-only operation.
///
/// A single instance is shared by reference with the request executor
/// and the catalog use case; there is no ambient global.
pub struct SessionController {
    state: RwLock<Option<Session>>,
    store: Arc<dyn TokenStore>,
    refresher: Arc<dyn TokenRefreshApi>,
    navigator: Arc<dyn Navigator>,
    on_logout: std::sync::RwLock<Option<LogoutHook>>,
}

impl SessionController {
    pub fn new(
        store: Arc<dyn TokenStore>,
        refresher: Arc<dyn TokenRefreshApi>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            state: RwLock::new(None),
            store,
            refresher,
            navigator,
            on_logout: std::sync::RwLock::new(None),
        }
    }

    /// Registers the hook run on every logout transition.
    pub fn set_logout_hook(&self, hook: LogoutHook) {
        *self.on_logout.write().unwrap() = Some(hook);
    }

    /// Restores a persisted session on process start.
    ///
    /// The access token is not validated up front; an expired token is
    /// discovered on the first authorized call and recovered there.
    ///
    /// # Returns
    ///
    /// `true` when a session was restored.
    pub async fn bootstrap(&self) -> bool {
        match self.store.load().await {
            Ok(Some(session)) => {
                debug!(username = %session.username, "restored persisted session");
                *self.state.write().await = Some(session);
                true
            }
            Ok(None) => false,
            Err(err) => {
                warn!("token storage unavailable, starting anonymous: {err}");
                false
            }
        }
    }

    /// Transitions to authenticated with the supplied tokens.
    pub async fn login(&self, session: Session) {
        if let Err(err) = self.store.save(&session).await {
            warn!("failed to persist session: {err}");
        }
        debug!(username = %session.username, "logged in");
        *self.state.write().await = Some(session);
    }

    /// Transitions to anonymous, clears storage, runs the logout hook,
    /// and navigates home.
    pub async fn logout(&self) {
        *self.state.write().await = None;
        if let Err(err) = self.store.clear().await {
            warn!("failed to clear token storage: {err}");
        }
        if let Some(hook) = self.on_logout.read().unwrap().as_ref() {
            hook();
        }
        debug!("logged out");
        self.navigator.navigate("/");
    }

    /// Rotates the access token using the stored refresh token.
    ///
    /// Called only by the request executor on a 401. Two racing 401s
    /// may each trigger a refresh; the endpoint tolerates repeated use
    /// of the same refresh token, so the calls are not deduplicated.
    ///
    /// # Errors
    ///
    /// - `NoRefreshToken` when anonymous or no refresh token was stored;
    ///   the caller must treat the session as ended.
    /// - `RefreshRejected` when the endpoint refuses the token; the
    ///   caller must invoke [`logout`](Self::logout).
    pub async fn refresh(&self) -> Result<String> {
        let refresh_token = self
            .state
            .read()
            .await
            .as_ref()
            .and_then(|s| s.refresh_token.clone())
            .ok_or(LadleError::NoRefreshToken)?;

        let access_token = self
            .refresher
            .refresh_access_token(&refresh_token)
            .await
            .map_err(|err| LadleError::RefreshRejected(err.to_string()))?;

        let mut guard = self.state.write().await;
        if let Some(session) = guard.as_mut() {
            // Rotate in place; the refresh token is kept.
            session.access_token = access_token.clone();
            if let Err(err) = self.store.save(session).await {
                warn!("failed to persist rotated token: {err}");
            }
        }
        debug!("access token rotated");
        Ok(access_token)
    }

    /// Current access token, if authenticated.
    pub async fn access_token(&self) -> Option<String> {
        self.state
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Snapshot of the current session.
    pub async fn current(&self) -> Option<Session> {
        self.state.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_some()
    }

    pub async fn username(&self) -> Option<String> {
        self.state.read().await.as_ref().map(|s| s.username.clone())
    }
}
