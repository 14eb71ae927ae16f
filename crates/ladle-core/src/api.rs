//! API transport trait seams.
//!
//! The traits are defined here and implemented by the HTTP layer in an
//! outer crate; dynamic dispatch keeps the dependency direction
//! leaf-to-root and lets tests substitute scripted fakes.
//!
//! Bearer-token parameters are explicit: the transport performs no
//! token lookup of its own. Token injection and the single
//! refresh-and-retry policy live in [`crate::executor`].

use crate::comment::Comment;
use crate::error::Result;
use crate::personalization::{FavoriteEntry, RecentlyViewedEntry, SearchHistoryEntry};
use crate::recipe::{Recipe, RecipeDraft};

/// Catalog, personalization, and mutation endpoints.
///
/// Implementations must signal a 401 response as
/// [`LadleError::Unauthorized`](crate::LadleError::Unauthorized) so the
/// request executor can distinguish it from other failures.
#[async_trait::async_trait]
pub trait RecipeApi: Send + Sync {
    /// Lists the catalog, optionally filtered by a search query.
    async fn list_recipes(&self, search: Option<&str>) -> Result<Vec<Recipe>>;

    /// Fetches a single recipe by id.
    async fn get_recipe(&self, id: u64) -> Result<Recipe>;

    /// Creates a recipe from a draft (multipart form).
    async fn create_recipe(&self, token: &str, draft: &RecipeDraft) -> Result<Recipe>;

    /// Updates an existing recipe from a draft (multipart form).
    async fn update_recipe(&self, token: &str, id: u64, draft: &RecipeDraft) -> Result<Recipe>;

    /// Deletes a recipe by id.
    async fn delete_recipe(&self, token: &str, id: u64) -> Result<()>;

    /// Lists comments for a recipe.
    async fn list_comments(&self, recipe_id: u64) -> Result<Vec<Comment>>;

    /// Posts a new comment on a recipe.
    async fn post_comment(&self, token: &str, recipe_id: u64, text: &str) -> Result<Comment>;

    /// Fetches the search history, newest-first.
    async fn search_history(&self, token: &str) -> Result<Vec<SearchHistoryEntry>>;

    /// Persists a query to the server-side search history.
    async fn add_search_history(&self, token: &str, query: &str) -> Result<()>;

    /// Fetches the recently-viewed feed.
    async fn recently_viewed(&self, token: &str) -> Result<Vec<RecentlyViewedEntry>>;

    /// Lists the favorites membership rows for the current identity.
    async fn favorites(&self, token: &str) -> Result<Vec<FavoriteEntry>>;

    /// Adds a recipe to favorites.
    async fn add_favorite(&self, token: &str, recipe_id: u64) -> Result<FavoriteEntry>;

    /// Removes a favorites membership row by its row id.
    async fn remove_favorite(&self, token: &str, favorite_id: u64) -> Result<()>;
}

/// The token-refresh endpoint, split out so the session controller can
/// depend on it without seeing the rest of the API surface.
#[async_trait::async_trait]
pub trait TokenRefreshApi: Send + Sync {
    /// Exchanges a refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated.
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String>;
}
