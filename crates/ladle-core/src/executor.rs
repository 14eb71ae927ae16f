//! Authorized request execution.
//!
//! Wraps an API call with bearer-token injection and the single
//! refresh-and-retry policy: attempt, detect-unauthorized,
//! refresh-once, retry-once. The two attempts are written out
//! sequentially, so the "exactly one retry" invariant holds
//! structurally rather than by a counter.

use crate::error::{LadleError, Result};
use crate::session::SessionController;
use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::{debug, warn};

/// Executes operations under the current access token.
///
/// Bounds worst-case latency to two round trips: a request that is
/// rejected again after a token rotation is not retried a second time,
/// and non-auth failures are never retried at all.
pub struct AuthorizedExecutor {
    controller: Arc<SessionController>,
}

impl AuthorizedExecutor {
    pub fn new(controller: Arc<SessionController>) -> Self {
        Self { controller }
    }

    /// Runs `op` with the current access token.
    ///
    /// On a 401 the session controller refreshes the token and `op` is
    /// reissued exactly once with the rotated token. A refresh failure
    /// or a second 401 ends the session and surfaces `Auth`.
    ///
    /// # Errors
    ///
    /// - `LoginRequired` when anonymous; no network call is made.
    /// - `Auth` after the retry budget is exhausted.
    /// - Any non-auth error from `op`, propagated without retry.
    pub async fn execute<T, F>(&self, op: F) -> Result<T>
    where
        T: Send,
        F: Fn(String) -> BoxFuture<'static, Result<T>> + Send + Sync,
    {
        let Some(token) = self.controller.access_token().await else {
            return Err(LadleError::LoginRequired);
        };

        match op(token).await {
            Err(err) if err.is_unauthorized() => {}
            other => return other,
        }

        debug!("access token rejected, refreshing once");
        let rotated = match self.controller.refresh().await {
            Ok(token) => token,
            Err(err) => {
                warn!("token refresh failed, ending session: {err}");
                self.controller.logout().await;
                return Err(LadleError::auth(format!("session ended: {err}")));
            }
        };

        match op(rotated).await {
            Err(err) if err.is_unauthorized() => {
                warn!("request rejected again after token rotation, ending session");
                self.controller.logout().await;
                Err(LadleError::auth("request rejected after token refresh"))
            }
            other => other,
        }
    }
}
