//! Shared per-identity state.

use ladle_core::{RecentlyViewedEntry, SearchHistoryEntry};
use std::collections::HashSet;
use std::sync::RwLock;

/// The personalization collections: search history, recently viewed,
/// and locally-known favorite membership.
///
/// Non-empty only while a session exists. [`clear_all`](Self::clear_all)
/// is wired into the session controller's logout hook so every logout
/// transition resets them before the next render.
#[derive(Default)]
pub struct PersonalizationState {
    search_history: RwLock<Vec<SearchHistoryEntry>>,
    recently_viewed: RwLock<Vec<RecentlyViewedEntry>>,
    favorites: RwLock<HashSet<u64>>,
}

impl PersonalizationState {
    pub fn set_search_history(&self, entries: Vec<SearchHistoryEntry>) {
        *self.search_history.write().unwrap() = entries;
    }

    pub fn search_history(&self) -> Vec<SearchHistoryEntry> {
        self.search_history.read().unwrap().clone()
    }

    pub fn set_recently_viewed(&self, entries: Vec<RecentlyViewedEntry>) {
        *self.recently_viewed.write().unwrap() = entries;
    }

    pub fn recently_viewed(&self) -> Vec<RecentlyViewedEntry> {
        self.recently_viewed.read().unwrap().clone()
    }

    pub fn mark_favorite(&self, recipe_id: u64, favorited: bool) {
        let mut favorites = self.favorites.write().unwrap();
        if favorited {
            favorites.insert(recipe_id);
        } else {
            favorites.remove(&recipe_id);
        }
    }

    pub fn is_favorite(&self, recipe_id: u64) -> bool {
        self.favorites.read().unwrap().contains(&recipe_id)
    }

    /// Empties every collection. Runs on logout.
    pub fn clear_all(&self) {
        self.search_history.write().unwrap().clear();
        self.recently_viewed.write().unwrap().clear();
        self.favorites.write().unwrap().clear();
    }
}
