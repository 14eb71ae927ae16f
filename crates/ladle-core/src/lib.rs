//! Ladle core: domain models and the session & synchronization logic
//! of a recipe-catalog client.
//!
//! The crate is transport-agnostic: HTTP and storage live behind the
//! trait seams in [`api`] and [`session`], implemented by outer crates
//! and injected as trait objects.

pub mod api;
pub mod comment;
pub mod error;
pub mod executor;
pub mod media;
pub mod personalization;
pub mod recipe;
pub mod session;

// Re-export common types
pub use comment::Comment;
pub use error::{LadleError, Result};
pub use personalization::{FavoriteEntry, RecentlyViewedEntry, SearchHistoryEntry};
pub use recipe::{Attribute, Ingredient, Recipe, RecipeDraft};
pub use session::{Session, SessionController};
