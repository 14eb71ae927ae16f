//! Per-identity personalization models.
//!
//! These collections exist only while a session exists; logout resets
//! them to empty before the next render.

use crate::recipe::Recipe;
use serde::{Deserialize, Serialize};

/// One saved search query, returned newest-first by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub query: String,
}

/// A recipe snapshot wrapped with a view timestamp.
///
/// Fetched from the server, never mutated by the client; the server
/// records views on the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentlyViewedEntry {
    pub recipe: Recipe,
    #[serde(default)]
    pub viewed_at: Option<String>,
}

/// A favorites membership row: `(identity, recipe)` with its own id.
///
/// Removal targets the row id, not the recipe id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub id: u64,
    pub recipe: u64,
}
