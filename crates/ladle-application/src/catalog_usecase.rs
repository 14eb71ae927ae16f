//! Catalog and personalization synchronization use case.
//!
//! `CatalogUseCase` is the surface the view layer calls. It coordinates
//! the session controller, the authorized request executor, and the API
//! transport, and owns the observable state the view renders from.
//!
//! Consistency rule: after a save the listing cache is re-fetched, not
//! patched; delete is the one exception and filters the cache locally.
//! Failed reads degrade to empty collections (logged, not thrown) — an
//! empty listing is indistinguishable from a failed fetch by design.

use crate::state::PersonalizationState;
use futures::future::BoxFuture;
use ladle_core::api::RecipeApi;
use ladle_core::executor::AuthorizedExecutor;
use ladle_core::session::Navigator;
use ladle_core::{
    Comment, FavoriteEntry, LadleError, RecentlyViewedEntry, Recipe, RecipeDraft, Result,
    SearchHistoryEntry, Session, SessionController,
};
use std::sync::{Arc, RwLock};
use tracing::{debug, error, warn};

/// How many catalog entries the recommended feed shows.
///
/// A fixed prefix of the listing, not a separate ranking.
pub const RECOMMENDED_COUNT: usize = 5;

/// The personalization & catalog sync component.
pub struct CatalogUseCase {
    controller: Arc<SessionController>,
    executor: AuthorizedExecutor,
    api: Arc<dyn RecipeApi>,
    navigator: Arc<dyn Navigator>,
    recipes: RwLock<Vec<Recipe>>,
    recommended: RwLock<Vec<Recipe>>,
    comments: RwLock<Vec<Comment>>,
    personalization: Arc<PersonalizationState>,
}

impl CatalogUseCase {
    /// Wires the use case to a session controller and transport.
    ///
    /// Registers the controller's logout hook so every transition to
    /// anonymous (user-initiated or forced by an auth failure) resets
    /// the personalization collections.
    pub fn new(
        controller: Arc<SessionController>,
        api: Arc<dyn RecipeApi>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let personalization = Arc::new(PersonalizationState::default());
        let on_logout = personalization.clone();
        controller.set_logout_hook(Arc::new(move || on_logout.clear_all()));

        Self {
            executor: AuthorizedExecutor::new(controller.clone()),
            controller,
            api,
            navigator,
            recipes: RwLock::new(Vec::new()),
            recommended: RwLock::new(Vec::new()),
            comments: RwLock::new(Vec::new()),
            personalization,
        }
    }

    /// App-start sequence: restore the persisted session, then load the
    /// catalog and, when authenticated, hydrate the personalization
    /// feeds. The fetches are independent and complete in any order.
    ///
    /// # Returns
    ///
    /// `true` when a persisted session was restored.
    pub async fn bootstrap(&self) -> bool {
        let restored = self.controller.bootstrap().await;
        tokio::join!(self.list_recipes(), self.list_recommended());
        if restored {
            tokio::join!(self.fetch_search_history(), self.fetch_recently_viewed());
        }
        restored
    }

    /// Logs in with tokens obtained out of band and hydrates the
    /// personalization feeds. Login is the single hydration point.
    pub async fn login(&self, session: Session) {
        self.controller.login(session).await;
        tokio::join!(self.fetch_search_history(), self.fetch_recently_viewed());
    }

    /// Ends the session. The logout hook resets the personalization
    /// collections and the navigator is pointed home.
    pub async fn logout(&self) {
        self.controller.logout().await;
    }

    /// Fetches the full catalog, updating the local cache.
    ///
    /// Failures are logged and surfaced as an empty result; the caller
    /// cannot distinguish "no recipes" from "fetch failed".
    pub async fn list_recipes(&self) -> Vec<Recipe> {
        match self.api.list_recipes(None).await {
            Ok(recipes) => {
                *self.recipes.write().unwrap() = recipes.clone();
                recipes
            }
            Err(err) => {
                error!("failed to fetch recipes: {err}");
                Vec::new()
            }
        }
    }

    /// Fetches the recommended feed: the first [`RECOMMENDED_COUNT`]
    /// entries of the catalog.
    pub async fn list_recommended(&self) -> Vec<Recipe> {
        match self.api.list_recipes(None).await {
            Ok(mut recipes) => {
                recipes.truncate(RECOMMENDED_COUNT);
                *self.recommended.write().unwrap() = recipes.clone();
                recipes
            }
            Err(err) => {
                error!("failed to fetch recommended recipes: {err}");
                Vec::new()
            }
        }
    }

    /// Fetches a single recipe.
    pub async fn get_recipe(&self, id: u64) -> Result<Recipe> {
        self.api.get_recipe(id).await
    }

    /// Refreshes the search-history feed. Silent no-op when anonymous;
    /// the collection is defined only for an authenticated identity.
    pub async fn fetch_search_history(&self) {
        if !self.controller.is_authenticated().await {
            return;
        }
        let api = self.api.clone();
        let result = self
            .executor
            .execute(
                move |token: String| -> BoxFuture<'static, Result<Vec<SearchHistoryEntry>>> {
                    let api = api.clone();
                    Box::pin(async move { api.search_history(&token).await })
                },
            )
            .await;
        match result {
            Ok(entries) => self.personalization.set_search_history(entries),
            Err(err) => error!("failed to fetch search history: {err}"),
        }
    }

    /// Refreshes the recently-viewed feed. Silent no-op when anonymous.
    pub async fn fetch_recently_viewed(&self) {
        if !self.controller.is_authenticated().await {
            return;
        }
        let api = self.api.clone();
        let result = self
            .executor
            .execute(
                move |token: String| -> BoxFuture<'static, Result<Vec<RecentlyViewedEntry>>> {
                    let api = api.clone();
                    Box::pin(async move { api.recently_viewed(&token).await })
                },
            )
            .await;
        match result {
            Ok(entries) => self.personalization.set_recently_viewed(entries),
            Err(err) => error!("failed to fetch recently viewed: {err}"),
        }
    }

    /// Runs the search pipeline.
    ///
    /// Empty queries are a no-op. When authenticated, the query is
    /// persisted to the server-side history (best effort) and the
    /// history feed is re-fetched unconditionally. The handler receives
    /// the results before any navigation signal, so the destination
    /// view renders with data already available.
    pub async fn search<F>(&self, query: &str, handler: F)
    where
        F: FnOnce(&[Recipe]),
    {
        if query.is_empty() {
            return;
        }

        if self.controller.is_authenticated().await {
            let api = self.api.clone();
            let persisted = query.to_string();
            let outcome = self
                .executor
                .execute(move |token: String| -> BoxFuture<'static, Result<()>> {
                    let api = api.clone();
                    let query = persisted.clone();
                    Box::pin(async move { api.add_search_history(&token, &query).await })
                })
                .await;
            if let Err(err) = outcome {
                warn!("failed to persist search query: {err}");
            }
            self.fetch_search_history().await;
        }

        match self.api.list_recipes(Some(query)).await {
            Ok(results) => {
                debug!(count = results.len(), query, "search completed");
                handler(&results);
                self.navigator.navigate(&format!("/search?query={query}"));
            }
            Err(err) => error!("search failed: {err}"),
        }
    }

    /// Flips the favorite membership for a recipe.
    ///
    /// Local state changes only after the server confirms; a failed
    /// call leaves it untouched.
    ///
    /// # Errors
    ///
    /// `LoginRequired` when anonymous, so the view can prompt for
    /// authentication instead of failing silently.
    ///
    /// # Returns
    ///
    /// The new membership state.
    pub async fn toggle_favorite(&self, recipe_id: u64) -> Result<bool> {
        if !self.controller.is_authenticated().await {
            return Err(LadleError::LoginRequired);
        }

        let api = self.api.clone();
        let rows = self
            .executor
            .execute(
                move |token: String| -> BoxFuture<'static, Result<Vec<FavoriteEntry>>> {
                    let api = api.clone();
                    Box::pin(async move { api.favorites(&token).await })
                },
            )
            .await?;

        match rows.into_iter().find(|row| row.recipe == recipe_id) {
            Some(row) => {
                let api = self.api.clone();
                let row_id = row.id;
                self.executor
                    .execute(move |token: String| -> BoxFuture<'static, Result<()>> {
                        let api = api.clone();
                        Box::pin(async move { api.remove_favorite(&token, row_id).await })
                    })
                    .await?;
                self.personalization.mark_favorite(recipe_id, false);
                Ok(false)
            }
            None => {
                let api = self.api.clone();
                self.executor
                    .execute(
                        move |token: String| -> BoxFuture<'static, Result<FavoriteEntry>> {
                            let api = api.clone();
                            Box::pin(async move { api.add_favorite(&token, recipe_id).await })
                        },
                    )
                    .await?;
                self.personalization.mark_favorite(recipe_id, true);
                Ok(true)
            }
        }
    }

    /// Creates or updates a recipe from a draft, deciding POST vs PUT
    /// by the presence of a recipe id.
    ///
    /// On success the listing cache is re-synchronized with a full
    /// refetch. On failure the prior state is left intact and the error
    /// is surfaced for display.
    pub async fn save_recipe(&self, draft: &RecipeDraft) -> Result<Recipe> {
        draft.validate()?;

        let api = self.api.clone();
        let draft_for_call = draft.clone();
        let saved = self
            .executor
            .execute(move |token: String| -> BoxFuture<'static, Result<Recipe>> {
                let api = api.clone();
                let draft = draft_for_call.clone();
                Box::pin(async move {
                    match draft.id {
                        Some(id) => api.update_recipe(&token, id, &draft).await,
                        None => api.create_recipe(&token, &draft).await,
                    }
                })
            })
            .await?;

        self.list_recipes().await;
        Ok(saved)
    }

    /// Deletes a recipe, then removes it from the local cache by id.
    ///
    /// The one place the cache is patched instead of re-fetched: delete
    /// has no server-derived fields left to reconcile.
    pub async fn delete_recipe(&self, recipe_id: u64) -> Result<()> {
        let api = self.api.clone();
        self.executor
            .execute(move |token: String| -> BoxFuture<'static, Result<()>> {
                let api = api.clone();
                Box::pin(async move { api.delete_recipe(&token, recipe_id).await })
            })
            .await?;
        self.recipes
            .write()
            .unwrap()
            .retain(|recipe| recipe.id != recipe_id);
        Ok(())
    }

    /// Fetches the comments for a recipe; degrades to empty on failure.
    pub async fn fetch_comments(&self, recipe_id: u64) -> Vec<Comment> {
        match self.api.list_comments(recipe_id).await {
            Ok(comments) => {
                *self.comments.write().unwrap() = comments.clone();
                comments
            }
            Err(err) => {
                error!("failed to fetch comments: {err}");
                Vec::new()
            }
        }
    }

    /// Posts a comment and appends it to the local comment list.
    pub async fn post_comment(&self, recipe_id: u64, text: &str) -> Result<Comment> {
        if text.trim().is_empty() {
            return Err(LadleError::validation("comment must not be empty"));
        }
        let api = self.api.clone();
        let body = text.to_string();
        let comment = self
            .executor
            .execute(move |token: String| -> BoxFuture<'static, Result<Comment>> {
                let api = api.clone();
                let text = body.clone();
                Box::pin(async move { api.post_comment(&token, recipe_id, &text).await })
            })
            .await?;
        self.comments.write().unwrap().push(comment.clone());
        Ok(comment)
    }

    // ── Observable state ────────────────────────────────────────────

    pub fn recipes(&self) -> Vec<Recipe> {
        self.recipes.read().unwrap().clone()
    }

    pub fn recommended(&self) -> Vec<Recipe> {
        self.recommended.read().unwrap().clone()
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.comments.read().unwrap().clone()
    }

    pub fn personalization(&self) -> &PersonalizationState {
        &self.personalization
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.controller.current().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladle_core::api::TokenRefreshApi;
    use ladle_core::session::TokenStore;
    use std::sync::Mutex;

    fn recipe(id: u64, name: &str) -> Recipe {
        Recipe {
            id,
            name: name.to_string(),
            description: "tasty".to_string(),
            ingredients_list: vec!["2 cups flour".to_string()],
            instructions: "Mix\nBake".to_string(),
            attributes: vec![],
            image: None,
            step_images: vec![],
            owner: None,
        }
    }

    /// Scripted transport recording every call into a shared event log.
    struct FakeApi {
        events: Arc<Mutex<Vec<String>>>,
        recipes: Vec<Recipe>,
        history: Vec<SearchHistoryEntry>,
        recent: Vec<RecentlyViewedEntry>,
        favorite_rows: Vec<FavoriteEntry>,
        fail_listing: bool,
        fail_history_post: bool,
        fail_favorite_mutation: bool,
        fail_delete: bool,
        reject_tokens: bool,
    }

    impl Default for FakeApi {
        fn default() -> Self {
            Self {
                events: Arc::new(Mutex::new(Vec::new())),
                recipes: vec![recipe(1, "Pasta"), recipe(2, "Pancakes")],
                history: vec![SearchHistoryEntry {
                    query: "soup".to_string(),
                }],
                recent: vec![RecentlyViewedEntry {
                    recipe: recipe(1, "Pasta"),
                    viewed_at: None,
                }],
                favorite_rows: vec![],
                fail_listing: false,
                fail_history_post: false,
                fail_favorite_mutation: false,
                fail_delete: false,
                reject_tokens: false,
            }
        }
    }

    impl FakeApi {
        fn log(&self, event: impl Into<String>) {
            self.events.lock().unwrap().push(event.into());
        }

        fn gate(&self) -> Result<()> {
            if self.reject_tokens {
                Err(LadleError::Unauthorized)
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl RecipeApi for FakeApi {
        async fn list_recipes(&self, search: Option<&str>) -> Result<Vec<Recipe>> {
            match search {
                Some(query) => {
                    self.log(format!("recipes_search:{query}"));
                    let needle = query.to_lowercase();
                    Ok(self
                        .recipes
                        .iter()
                        .filter(|r| r.name.to_lowercase().contains(&needle))
                        .cloned()
                        .collect())
                }
                None => {
                    self.log("recipes_list");
                    if self.fail_listing {
                        return Err(LadleError::network(500, "listing down"));
                    }
                    Ok(self.recipes.clone())
                }
            }
        }

        async fn get_recipe(&self, id: u64) -> Result<Recipe> {
            self.log(format!("recipe_get:{id}"));
            self.recipes
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or_else(|| LadleError::network(404, "not found"))
        }

        async fn create_recipe(&self, _token: &str, draft: &RecipeDraft) -> Result<Recipe> {
            self.gate()?;
            self.log("recipe_create");
            Ok(recipe(100, &draft.name))
        }

        async fn update_recipe(&self, _token: &str, id: u64, draft: &RecipeDraft) -> Result<Recipe> {
            self.gate()?;
            self.log(format!("recipe_update:{id}"));
            Ok(recipe(id, &draft.name))
        }

        async fn delete_recipe(&self, _token: &str, id: u64) -> Result<()> {
            self.gate()?;
            self.log(format!("recipe_delete:{id}"));
            if self.fail_delete {
                return Err(LadleError::network(500, "delete failed"));
            }
            Ok(())
        }

        async fn list_comments(&self, recipe_id: u64) -> Result<Vec<Comment>> {
            self.log(format!("comments_get:{recipe_id}"));
            Ok(vec![])
        }

        async fn post_comment(&self, _token: &str, recipe_id: u64, text: &str) -> Result<Comment> {
            self.gate()?;
            self.log(format!("comment_post:{recipe_id}"));
            Ok(Comment {
                id: 42,
                author: "alice".to_string(),
                text: text.to_string(),
                created_at: "2024-01-01T00:00:00Z".to_string(),
                recipe: recipe_id,
            })
        }

        async fn search_history(&self, _token: &str) -> Result<Vec<SearchHistoryEntry>> {
            self.gate()?;
            self.log("history_get");
            Ok(self.history.clone())
        }

        async fn add_search_history(&self, _token: &str, query: &str) -> Result<()> {
            self.gate()?;
            self.log(format!("history_post:{query}"));
            if self.fail_history_post {
                return Err(LadleError::network(500, "history down"));
            }
            Ok(())
        }

        async fn recently_viewed(&self, _token: &str) -> Result<Vec<RecentlyViewedEntry>> {
            self.gate()?;
            self.log("recent_get");
            Ok(self.recent.clone())
        }

        async fn favorites(&self, _token: &str) -> Result<Vec<FavoriteEntry>> {
            self.gate()?;
            self.log("favorites_get");
            Ok(self.favorite_rows.clone())
        }

        async fn add_favorite(&self, _token: &str, recipe_id: u64) -> Result<FavoriteEntry> {
            self.gate()?;
            self.log(format!("favorite_add:{recipe_id}"));
            if self.fail_favorite_mutation {
                return Err(LadleError::network(500, "favorites down"));
            }
            Ok(FavoriteEntry {
                id: 900,
                recipe: recipe_id,
            })
        }

        async fn remove_favorite(&self, _token: &str, favorite_id: u64) -> Result<()> {
            self.gate()?;
            self.log(format!("favorite_remove:{favorite_id}"));
            if self.fail_favorite_mutation {
                return Err(LadleError::network(500, "favorites down"));
            }
            Ok(())
        }
    }

    struct FakeRefresher {
        accept: bool,
    }

    #[async_trait::async_trait]
    impl TokenRefreshApi for FakeRefresher {
        async fn refresh_access_token(&self, _refresh_token: &str) -> Result<String> {
            if self.accept {
                Ok("fresh-token".to_string())
            } else {
                Err(LadleError::network(400, "refresh rejected"))
            }
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        session: Mutex<Option<Session>>,
    }

    #[async_trait::async_trait]
    impl TokenStore for MemoryStore {
        async fn save(&self, session: &Session) -> Result<()> {
            *self.session.lock().unwrap() = Some(session.clone());
            Ok(())
        }

        async fn load(&self) -> Result<Option<Session>> {
            Ok(self.session.lock().unwrap().clone())
        }

        async fn clear(&self) -> Result<()> {
            *self.session.lock().unwrap() = None;
            Ok(())
        }
    }

    struct RecordingNavigator {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, path: &str) {
            self.events.lock().unwrap().push(format!("navigate:{path}"));
        }
    }

    struct Fixture {
        usecase: CatalogUseCase,
        controller: Arc<SessionController>,
        events: Arc<Mutex<Vec<String>>>,
    }

    impl Fixture {
        fn new(api: FakeApi, accept_refresh: bool) -> Self {
            let events = api.events.clone();
            let controller = Arc::new(SessionController::new(
                Arc::new(MemoryStore::default()),
                Arc::new(FakeRefresher {
                    accept: accept_refresh,
                }),
                Arc::new(RecordingNavigator {
                    events: events.clone(),
                }),
            ));
            let usecase = CatalogUseCase::new(
                controller.clone(),
                Arc::new(api),
                Arc::new(RecordingNavigator {
                    events: events.clone(),
                }),
            );
            Self {
                usecase,
                controller,
                events,
            }
        }

        async fn login(&self) {
            self.usecase
                .login(Session::new(
                    "access",
                    Some("refresh".to_string()),
                    "alice",
                ))
                .await;
            // Hydration fetches are not under test here.
            self.events.lock().unwrap().clear();
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    #[tokio::test]
    async fn empty_search_makes_no_calls_and_changes_nothing() {
        let fx = Fixture::new(FakeApi::default(), true);
        fx.login().await;

        fx.usecase
            .search("", |_| panic!("handler must not run for empty query"))
            .await;

        assert!(fx.events().is_empty());
    }

    #[tokio::test]
    async fn authenticated_search_orders_history_results_handler_navigation() {
        let fx = Fixture::new(FakeApi::default(), true);
        fx.login().await;

        let delivered = Arc::new(Mutex::new(Vec::new()));
        let sink = delivered.clone();
        let log = fx.events.clone();
        fx.usecase
            .search("pasta", move |results| {
                log.lock().unwrap().push(format!("handler:{}", results.len()));
                *sink.lock().unwrap() = results.to_vec();
            })
            .await;

        assert_eq!(
            fx.events(),
            vec![
                "history_post:pasta",
                "history_get",
                "recipes_search:pasta",
                "handler:1",
                "navigate:/search?query=pasta",
            ]
        );
        assert_eq!(delivered.lock().unwrap()[0].name, "Pasta");
    }

    #[tokio::test]
    async fn anonymous_search_skips_history_entirely() {
        let fx = Fixture::new(FakeApi::default(), true);

        fx.usecase.search("pasta", |_| {}).await;

        assert_eq!(
            fx.events(),
            vec!["recipes_search:pasta", "navigate:/search?query=pasta"]
        );
    }

    #[tokio::test]
    async fn history_persist_failure_does_not_block_search() {
        let fx = Fixture::new(
            FakeApi {
                fail_history_post: true,
                ..Default::default()
            },
            true,
        );
        fx.login().await;

        let handled = Arc::new(Mutex::new(false));
        let flag = handled.clone();
        fx.usecase
            .search("pasta", move |_| *flag.lock().unwrap() = true)
            .await;

        assert!(*handled.lock().unwrap());
        // The history refetch still ran after the failed persist.
        assert!(fx.events().contains(&"history_get".to_string()));
    }

    #[tokio::test]
    async fn logout_empties_all_personalization_collections() {
        let fx = Fixture::new(FakeApi::default(), true);
        fx.login().await;
        fx.usecase.fetch_search_history().await;
        fx.usecase.fetch_recently_viewed().await;
        fx.usecase.personalization().mark_favorite(1, true);
        assert!(!fx.usecase.personalization().search_history().is_empty());
        assert!(!fx.usecase.personalization().recently_viewed().is_empty());

        fx.usecase.logout().await;

        assert!(fx.usecase.personalization().search_history().is_empty());
        assert!(fx.usecase.personalization().recently_viewed().is_empty());
        assert!(!fx.usecase.personalization().is_favorite(1));
        assert_eq!(fx.events().last().map(String::as_str), Some("navigate:/"));
    }

    #[tokio::test]
    async fn forced_logout_after_failed_refresh_also_empties_collections() {
        let fx = Fixture::new(
            FakeApi {
                reject_tokens: true,
                ..Default::default()
            },
            false,
        );
        fx.controller
            .login(Session::new("stale", Some("refresh".to_string()), "alice"))
            .await;
        fx.usecase
            .personalization()
            .set_search_history(vec![SearchHistoryEntry {
                query: "soup".to_string(),
            }]);

        // 401 -> refresh rejected -> forced logout through the hook.
        fx.usecase.fetch_recently_viewed().await;

        assert!(!fx.controller.is_authenticated().await);
        assert!(fx.usecase.personalization().search_history().is_empty());
    }

    #[tokio::test]
    async fn personalization_fetches_are_noops_when_anonymous() {
        let fx = Fixture::new(FakeApi::default(), true);

        fx.usecase.fetch_search_history().await;
        fx.usecase.fetch_recently_viewed().await;

        assert!(fx.events().is_empty());
        assert!(fx.usecase.personalization().search_history().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_only_the_deleted_entry_preserving_order() {
        let fx = Fixture::new(
            FakeApi {
                recipes: vec![
                    recipe(1, "A"),
                    recipe(2, "B"),
                    recipe(5, "C"),
                    recipe(7, "D"),
                ],
                ..Default::default()
            },
            true,
        );
        fx.login().await;
        fx.usecase.list_recipes().await;

        fx.usecase.delete_recipe(5).await.unwrap();

        let ids: Vec<u64> = fx.usecase.recipes().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 7]);
    }

    #[tokio::test]
    async fn failed_delete_leaves_the_cache_intact() {
        let fx = Fixture::new(
            FakeApi {
                recipes: vec![recipe(1, "A"), recipe(5, "C")],
                fail_delete: true,
                ..Default::default()
            },
            true,
        );
        fx.login().await;
        fx.usecase.list_recipes().await;

        assert!(fx.usecase.delete_recipe(5).await.is_err());
        assert_eq!(fx.usecase.recipes().len(), 2);
    }

    #[tokio::test]
    async fn toggle_favorite_requires_a_session() {
        let fx = Fixture::new(FakeApi::default(), true);

        let err = fx.usecase.toggle_favorite(5).await.unwrap_err();

        assert!(matches!(err, LadleError::LoginRequired));
        assert!(fx.events().is_empty());
    }

    #[tokio::test]
    async fn toggle_favorite_adds_membership_after_confirmation() {
        let fx = Fixture::new(FakeApi::default(), true);
        fx.login().await;

        let now_favorite = fx.usecase.toggle_favorite(5).await.unwrap();

        assert!(now_favorite);
        assert!(fx.usecase.personalization().is_favorite(5));
        assert_eq!(fx.events(), vec!["favorites_get", "favorite_add:5"]);
    }

    #[tokio::test]
    async fn toggle_favorite_removes_membership_by_row_id() {
        let fx = Fixture::new(
            FakeApi {
                favorite_rows: vec![FavoriteEntry { id: 99, recipe: 5 }],
                ..Default::default()
            },
            true,
        );
        fx.login().await;
        fx.usecase.personalization().mark_favorite(5, true);

        let now_favorite = fx.usecase.toggle_favorite(5).await.unwrap();

        assert!(!now_favorite);
        assert!(!fx.usecase.personalization().is_favorite(5));
        assert_eq!(fx.events(), vec!["favorites_get", "favorite_remove:99"]);
    }

    #[tokio::test]
    async fn failed_favorite_call_leaves_local_state_unchanged() {
        let fx = Fixture::new(
            FakeApi {
                fail_favorite_mutation: true,
                ..Default::default()
            },
            true,
        );
        fx.login().await;

        assert!(fx.usecase.toggle_favorite(5).await.is_err());
        assert!(!fx.usecase.personalization().is_favorite(5));
    }

    #[tokio::test]
    async fn save_without_id_creates_and_resynchronizes() {
        let fx = Fixture::new(FakeApi::default(), true);
        fx.login().await;

        let draft = RecipeDraft {
            name: "Borscht".to_string(),
            description: "Beet soup".to_string(),
            instructions: "Boil".to_string(),
            ..Default::default()
        };
        let saved = fx.usecase.save_recipe(&draft).await.unwrap();

        assert_eq!(saved.name, "Borscht");
        assert_eq!(fx.events(), vec!["recipe_create", "recipes_list"]);
        assert!(!fx.usecase.recipes().is_empty());
    }

    #[tokio::test]
    async fn save_with_id_updates_in_place() {
        let fx = Fixture::new(FakeApi::default(), true);
        fx.login().await;

        let draft = RecipeDraft {
            id: Some(3),
            name: "Borscht".to_string(),
            description: "Beet soup".to_string(),
            instructions: "Boil".to_string(),
            ..Default::default()
        };
        fx.usecase.save_recipe(&draft).await.unwrap();

        assert_eq!(fx.events(), vec!["recipe_update:3", "recipes_list"]);
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_before_any_call() {
        let fx = Fixture::new(FakeApi::default(), true);
        fx.login().await;

        let err = fx
            .usecase
            .save_recipe(&RecipeDraft::default())
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(fx.events().is_empty());
    }

    #[tokio::test]
    async fn listing_failure_degrades_to_an_empty_result() {
        let fx = Fixture::new(
            FakeApi {
                fail_listing: true,
                ..Default::default()
            },
            true,
        );

        assert!(fx.usecase.list_recipes().await.is_empty());
        assert!(fx.usecase.recipes().is_empty());
    }

    #[tokio::test]
    async fn recommended_is_a_five_entry_prefix_of_the_catalog() {
        let fx = Fixture::new(
            FakeApi {
                recipes: (1..=7).map(|i| recipe(i, &format!("R{i}"))).collect(),
                ..Default::default()
            },
            true,
        );

        let recommended = fx.usecase.list_recommended().await;

        assert_eq!(recommended.len(), RECOMMENDED_COUNT);
        let ids: Vec<u64> = recommended.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn posted_comment_is_appended_locally() {
        let fx = Fixture::new(FakeApi::default(), true);
        fx.login().await;
        fx.usecase.fetch_comments(1).await;

        let comment = fx.usecase.post_comment(1, "Delicious!").await.unwrap();

        assert_eq!(comment.text, "Delicious!");
        assert_eq!(fx.usecase.comments().len(), 1);
    }

    #[tokio::test]
    async fn blank_comment_is_rejected_without_a_call() {
        let fx = Fixture::new(FakeApi::default(), true);
        fx.login().await;

        let err = fx.usecase.post_comment(1, "   ").await.unwrap_err();

        assert!(err.is_validation());
        assert!(fx.events().is_empty());
    }

    #[tokio::test]
    async fn expired_token_is_recovered_transparently_mid_flight() {
        // First bearer call 401s, refresh succeeds, retry lands.
        struct FlakyOnce {
            inner: FakeApi,
            rejected: Mutex<bool>,
        }

        #[async_trait::async_trait]
        impl RecipeApi for FlakyOnce {
            async fn list_recipes(&self, search: Option<&str>) -> Result<Vec<Recipe>> {
                self.inner.list_recipes(search).await
            }
            async fn get_recipe(&self, id: u64) -> Result<Recipe> {
                self.inner.get_recipe(id).await
            }
            async fn create_recipe(&self, token: &str, draft: &RecipeDraft) -> Result<Recipe> {
                self.inner.create_recipe(token, draft).await
            }
            async fn update_recipe(
                &self,
                token: &str,
                id: u64,
                draft: &RecipeDraft,
            ) -> Result<Recipe> {
                self.inner.update_recipe(token, id, draft).await
            }
            async fn delete_recipe(&self, token: &str, id: u64) -> Result<()> {
                self.inner.delete_recipe(token, id).await
            }
            async fn list_comments(&self, recipe_id: u64) -> Result<Vec<Comment>> {
                self.inner.list_comments(recipe_id).await
            }
            async fn post_comment(
                &self,
                token: &str,
                recipe_id: u64,
                text: &str,
            ) -> Result<Comment> {
                self.inner.post_comment(token, recipe_id, text).await
            }
            async fn search_history(&self, token: &str) -> Result<Vec<SearchHistoryEntry>> {
                {
                    let mut rejected = self.rejected.lock().unwrap();
                    if !*rejected {
                        *rejected = true;
                        return Err(LadleError::Unauthorized);
                    }
                }
                self.inner.search_history(token).await
            }
            async fn add_search_history(&self, token: &str, query: &str) -> Result<()> {
                self.inner.add_search_history(token, query).await
            }
            async fn recently_viewed(&self, token: &str) -> Result<Vec<RecentlyViewedEntry>> {
                self.inner.recently_viewed(token).await
            }
            async fn favorites(&self, token: &str) -> Result<Vec<FavoriteEntry>> {
                self.inner.favorites(token).await
            }
            async fn add_favorite(&self, token: &str, recipe_id: u64) -> Result<FavoriteEntry> {
                self.inner.add_favorite(token, recipe_id).await
            }
            async fn remove_favorite(&self, token: &str, favorite_id: u64) -> Result<()> {
                self.inner.remove_favorite(token, favorite_id).await
            }
        }

        let inner = FakeApi::default();
        let events = inner.events.clone();
        let controller = Arc::new(SessionController::new(
            Arc::new(MemoryStore::default()),
            Arc::new(FakeRefresher { accept: true }),
            Arc::new(RecordingNavigator {
                events: events.clone(),
            }),
        ));
        let usecase = CatalogUseCase::new(
            controller.clone(),
            Arc::new(FlakyOnce {
                inner,
                rejected: Mutex::new(false),
            }),
            Arc::new(RecordingNavigator {
                events: events.clone(),
            }),
        );
        controller
            .login(Session::new("stale", Some("refresh".to_string()), "alice"))
            .await;

        usecase.fetch_search_history().await;

        // Recovered: history hydrated, session intact with rotated token.
        assert!(!usecase.personalization().search_history().is_empty());
        let session = controller.current().await.unwrap();
        assert_eq!(session.access_token, "fresh-token");
    }
}
