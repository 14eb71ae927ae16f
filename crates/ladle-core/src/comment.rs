//! Comment domain model.

use serde::{Deserialize, Serialize};

/// A comment on a recipe. Append-only from the client's perspective
/// within a session; timestamps are carried as opaque server strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub author: String,
    pub text: String,
    pub created_at: String,
    /// Parent recipe id.
    pub recipe: u64,
}
