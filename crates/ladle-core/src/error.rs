//! Error types shared across the Ladle crates.

use thiserror::Error;

/// A shared error type for the whole client core.
///
/// Variants are split along the lines the call sites care about:
/// auth-related failures are handled by the request executor itself,
/// everything else is reported upward to the calling operation.
#[derive(Error, Debug, Clone)]
pub enum LadleError {
    /// Non-2xx API response that is not an authorization failure.
    #[error("HTTP {status}: {message}")]
    Network { status: u16, message: String },

    /// Connection-level failure (no response received).
    #[error("transport error: {0}")]
    Transport(String),

    /// Raw 401 from the API. Only the request executor should see this;
    /// it either recovers via a token refresh or converts it to `Auth`.
    #[error("unauthorized")]
    Unauthorized,

    /// Unrecoverable authentication failure, after the one permitted
    /// refresh-and-retry cycle. The session has already been ended.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A refresh was requested but no refresh token is available.
    #[error("no refresh token available")]
    NoRefreshToken,

    /// The token endpoint rejected the refresh token.
    #[error("token refresh rejected: {0}")]
    RefreshRejected(String),

    /// The operation requires an authenticated session.
    #[error("login required")]
    LoginRequired,

    /// Client-side validation failure, raised before any call is made.
    #[error("validation error: {0}")]
    Validation(String),

    /// Token storage failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Internal error (should not happen in normal operation).
    #[error("internal error: {0}")]
    Internal(String),
}

impl LadleError {
    /// Creates a `Network` error.
    pub fn network(status: u16, message: impl Into<String>) -> Self {
        Self::Network {
            status,
            message: message.into(),
        }
    }

    /// Creates a `Transport` error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates an `Auth` error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a `Validation` error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a `Storage` error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a `Decode` error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Check if this is the raw 401 signal from the transport.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Check if this is any auth-lifecycle failure.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized
                | Self::Auth(_)
                | Self::NoRefreshToken
                | Self::RefreshRejected(_)
                | Self::LoginRequired
        )
    }

    /// Check if this is a client-side validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for LadleError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for LadleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// A type alias for `Result<T, LadleError>`.
pub type Result<T> = std::result::Result<T, LadleError>;
