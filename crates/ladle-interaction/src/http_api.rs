//! HTTP implementation of the API transport traits.
//!
//! Talks to the REST backend with `reqwest`. Responses are normalized
//! before they leave this crate: root-relative media paths are
//! rewritten to absolute URLs and missing primary images fall back to a
//! configured placeholder.

use async_trait::async_trait;
use ladle_core::api::{RecipeApi, TokenRefreshApi};
use ladle_core::media::absolutize;
use ladle_core::{
    Comment, FavoriteEntry, LadleError, RecentlyViewedEntry, Recipe, RecipeDraft, Result,
    SearchHistoryEntry,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
}

/// `reqwest`-backed transport against a single API origin.
pub struct HttpRecipeApi {
    http: reqwest::Client,
    origin: String,
    placeholder_image: Option<String>,
}

impl HttpRecipeApi {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            origin: origin.into().trim_end_matches('/').to_string(),
            placeholder_image: None,
        }
    }

    /// Asset path substituted for recipes without a primary image.
    ///
    /// The placeholder is a view-layer asset, so it is not prefixed
    /// with the API origin.
    pub fn with_placeholder_image(mut self, path: impl Into<String>) -> Self {
        self.placeholder_image = Some(path.into());
        self
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn collection_url(&self, resource: &str) -> String {
        format!("{}/api/{}/", self.origin, resource)
    }

    fn item_url(&self, resource: &str, id: u64) -> String {
        format!("{}/api/{}/{}/", self.origin, resource, id)
    }

    /// Parse an API response, mapping HTTP errors to `LadleError`.
    async fn parse<R: DeserializeOwned>(resp: Response) -> Result<R> {
        Self::check(resp)
            .await?
            .json::<R>()
            .await
            .map_err(|err| LadleError::decode(format!("response body: {err}")))
    }

    /// Maps error statuses, returning the response for body handling.
    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(LadleError::Unauthorized);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LadleError::network(status.as_u16(), body));
        }
        Ok(resp)
    }

    fn send_err(err: reqwest::Error) -> LadleError {
        LadleError::transport(err.to_string())
    }

    /// Rewrites media references on a recipe fresh off the wire.
    fn finalize_recipe(&self, mut recipe: Recipe) -> Recipe {
        recipe.image = match recipe.image {
            Some(path) => Some(absolutize(&self.origin, &path)),
            None => self.placeholder_image.clone(),
        };
        recipe.step_images = recipe
            .step_images
            .iter()
            .map(|path| absolutize(&self.origin, path))
            .collect();
        recipe
    }

    fn finalize_recipes(&self, recipes: Vec<Recipe>) -> Vec<Recipe> {
        recipes
            .into_iter()
            .map(|recipe| self.finalize_recipe(recipe))
            .collect()
    }

    /// Builds the multipart body for recipe create/update.
    ///
    /// Blank ingredients and incomplete attributes are skipped, keeping
    /// the indexed field names dense with their source positions.
    async fn draft_form(&self, draft: &RecipeDraft) -> Result<Form> {
        let mut form = Form::new()
            .text("name", draft.name.clone())
            .text("description", draft.description.clone())
            .text("instructions", draft.instructions.clone())
            .text("cooking_time", draft.cooking_time.unwrap_or(25).to_string())
            .text("calories", draft.calories.unwrap_or(145).to_string());

        for (i, ingredient) in draft.ingredients.iter().enumerate() {
            if !ingredient.trim().is_empty() {
                form = form.text(format!("ingredient_{i}"), ingredient.clone());
            }
        }
        for (i, attr) in draft.attributes.iter().enumerate() {
            if !attr.name.is_empty() && !attr.value.is_empty() {
                form = form.text(format!("attribute_name_{i}"), attr.name.clone());
                form = form.text(format!("attribute_value_{i}"), attr.value.clone());
            }
        }
        if let Some(path) = &draft.image {
            form = form.part("image", file_part(path).await?);
        }
        for (i, path) in draft.step_images.iter().enumerate() {
            form = form.part(format!("step_image_{i}"), file_part(path).await?);
        }
        Ok(form)
    }
}

/// Reads a local file into a multipart part with a guessed MIME type.
async fn file_part(path: &Path) -> Result<Part> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime.as_ref())
        .map_err(|err| LadleError::validation(format!("invalid mime type: {err}")))
}

#[async_trait]
impl RecipeApi for HttpRecipeApi {
    async fn list_recipes(&self, search: Option<&str>) -> Result<Vec<Recipe>> {
        let mut req = self.http.get(self.collection_url("recipes"));
        if let Some(query) = search {
            req = req.query(&[("search", query)]);
        }
        let resp = req.send().await.map_err(Self::send_err)?;
        let recipes: Vec<Recipe> = Self::parse(resp).await?;
        debug!(count = recipes.len(), "fetched recipe listing");
        Ok(self.finalize_recipes(recipes))
    }

    async fn get_recipe(&self, id: u64) -> Result<Recipe> {
        let resp = self
            .http
            .get(self.item_url("recipes", id))
            .send()
            .await
            .map_err(Self::send_err)?;
        let recipe: Recipe = Self::parse(resp).await?;
        Ok(self.finalize_recipe(recipe))
    }

    async fn create_recipe(&self, token: &str, draft: &RecipeDraft) -> Result<Recipe> {
        let form = self.draft_form(draft).await?;
        let resp = self
            .http
            .post(self.collection_url("recipes"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(Self::send_err)?;
        let recipe: Recipe = Self::parse(resp).await?;
        Ok(self.finalize_recipe(recipe))
    }

    async fn update_recipe(&self, token: &str, id: u64, draft: &RecipeDraft) -> Result<Recipe> {
        let form = self.draft_form(draft).await?;
        let resp = self
            .http
            .put(self.item_url("recipes", id))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(Self::send_err)?;
        let recipe: Recipe = Self::parse(resp).await?;
        Ok(self.finalize_recipe(recipe))
    }

    async fn delete_recipe(&self, token: &str, id: u64) -> Result<()> {
        let resp = self
            .http
            .delete(self.item_url("recipes", id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::send_err)?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn list_comments(&self, recipe_id: u64) -> Result<Vec<Comment>> {
        let resp = self
            .http
            .get(self.collection_url("comments"))
            .query(&[("recipe", recipe_id)])
            .send()
            .await
            .map_err(Self::send_err)?;
        Self::parse(resp).await
    }

    async fn post_comment(&self, token: &str, recipe_id: u64, text: &str) -> Result<Comment> {
        let resp = self
            .http
            .post(self.collection_url("comments"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "recipe": recipe_id, "text": text }))
            .send()
            .await
            .map_err(Self::send_err)?;
        Self::parse(resp).await
    }

    async fn search_history(&self, token: &str) -> Result<Vec<SearchHistoryEntry>> {
        let resp = self
            .http
            .get(self.collection_url("search-history"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::send_err)?;
        Self::parse(resp).await
    }

    async fn add_search_history(&self, token: &str, query: &str) -> Result<()> {
        let resp = self
            .http
            .post(self.collection_url("search-history"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(Self::send_err)?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn recently_viewed(&self, token: &str) -> Result<Vec<RecentlyViewedEntry>> {
        let resp = self
            .http
            .get(self.collection_url("recently-viewed"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::send_err)?;
        let entries: Vec<RecentlyViewedEntry> = Self::parse(resp).await?;
        Ok(entries
            .into_iter()
            .map(|mut entry| {
                entry.recipe = self.finalize_recipe(entry.recipe);
                entry
            })
            .collect())
    }

    async fn favorites(&self, token: &str) -> Result<Vec<FavoriteEntry>> {
        let resp = self
            .http
            .get(self.collection_url("favorites"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::send_err)?;
        Self::parse(resp).await
    }

    async fn add_favorite(&self, token: &str, recipe_id: u64) -> Result<FavoriteEntry> {
        let resp = self
            .http
            .post(self.collection_url("favorites"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "recipe": recipe_id }))
            .send()
            .await
            .map_err(Self::send_err)?;
        Self::parse(resp).await
    }

    async fn remove_favorite(&self, token: &str, favorite_id: u64) -> Result<()> {
        let resp = self
            .http
            .delete(self.item_url("favorites", favorite_id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::send_err)?;
        Self::check(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenRefreshApi for HttpRecipeApi {
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String> {
        let resp = self
            .http
            .post(self.collection_url("token/refresh"))
            .json(&serde_json::json!({ "refresh": refresh_token }))
            .send()
            .await
            .map_err(Self::send_err)?;
        let refreshed: RefreshResponse = Self::parse(resp).await?;
        Ok(refreshed.access)
    }
}
