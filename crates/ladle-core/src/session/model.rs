//! Session model.

use serde::{Deserialize, Serialize};

/// An authenticated identity: the two bearer tokens plus the display
/// name. Absence of a `Session` means anonymous.
///
/// Token contents are opaque strings; validity is discovered lazily on
/// the first authorized call, not checked up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub username: String,
}

impl Session {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            username: username.into(),
        }
    }
}
