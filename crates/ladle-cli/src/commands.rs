//! Subcommand handlers: thin printers over the application use case.

use anyhow::{Result, anyhow};
use clap::Args;
use ladle_application::CatalogUseCase;
use ladle_core::session::Navigator;
use ladle_core::{Attribute, Recipe, RecipeDraft, Session};
use std::path::PathBuf;

/// Prints the route the client would move to after an action.
pub struct CliNavigator;

impl Navigator for CliNavigator {
    fn navigate(&self, path: &str) {
        println!("view: {path}");
    }
}

fn print_row(recipe: &Recipe) {
    println!("  [{}] {}", recipe.id, recipe.name);
}

pub async fn list(usecase: &CatalogUseCase) -> Result<()> {
    let recipes = usecase.list_recipes().await;
    if recipes.is_empty() {
        println!("no recipes");
        return Ok(());
    }
    println!("{} recipes:", recipes.len());
    for recipe in &recipes {
        print_row(recipe);
    }
    Ok(())
}

pub async fn recommended(usecase: &CatalogUseCase) -> Result<()> {
    let recipes = usecase.list_recommended().await;
    println!("recommended:");
    for recipe in &recipes {
        print_row(recipe);
    }
    Ok(())
}

pub async fn show(usecase: &CatalogUseCase, id: u64) -> Result<()> {
    let recipe = usecase.get_recipe(id).await?;
    println!("{} (#{})", recipe.name, recipe.id);
    if let Some(owner) = &recipe.owner {
        println!("by {owner}");
    }
    println!("\n{}", recipe.description);
    if let Some(image) = &recipe.image {
        println!("image: {image}");
    }
    println!("\ningredients:");
    for ingredient in recipe.parsed_ingredients() {
        if ingredient.quantity.is_empty() {
            println!("  - {}", ingredient.name);
        } else {
            println!("  - {} {}", ingredient.quantity, ingredient.name);
        }
    }
    println!("\nsteps:");
    for (index, step) in recipe.instruction_steps().iter().enumerate() {
        println!("  {}. {step}", index + 1);
    }
    for attribute in &recipe.attributes {
        println!("{}: {}", attribute.name, attribute.value);
    }
    Ok(())
}

pub async fn search(usecase: &CatalogUseCase, query: &str) -> Result<()> {
    usecase
        .search(query, |results| {
            println!("{} results for {query:?}:", results.len());
            for recipe in results {
                print_row(recipe);
            }
        })
        .await;
    Ok(())
}

pub async fn login(
    usecase: &CatalogUseCase,
    username: String,
    access: String,
    refresh: Option<String>,
) -> Result<()> {
    usecase.login(Session::new(access, refresh, &username)).await;
    println!("logged in as {username}");
    Ok(())
}

pub async fn logout(usecase: &CatalogUseCase) -> Result<()> {
    usecase.logout().await;
    println!("logged out");
    Ok(())
}

pub async fn history(usecase: &CatalogUseCase) -> Result<()> {
    usecase.fetch_search_history().await;
    let entries = usecase.personalization().search_history();
    if entries.is_empty() {
        println!("no search history");
        return Ok(());
    }
    for entry in entries {
        println!("  {}", entry.query);
    }
    Ok(())
}

pub async fn recent(usecase: &CatalogUseCase) -> Result<()> {
    usecase.fetch_recently_viewed().await;
    let entries = usecase.personalization().recently_viewed();
    if entries.is_empty() {
        println!("nothing viewed recently");
        return Ok(());
    }
    for entry in entries {
        print_row(&entry.recipe);
    }
    Ok(())
}

pub async fn favorite(usecase: &CatalogUseCase, id: u64) -> Result<()> {
    if usecase.toggle_favorite(id).await? {
        println!("recipe {id} added to favorites");
    } else {
        println!("recipe {id} removed from favorites");
    }
    Ok(())
}

pub async fn comments(usecase: &CatalogUseCase, id: u64) -> Result<()> {
    let comments = usecase.fetch_comments(id).await;
    if comments.is_empty() {
        println!("no comments");
        return Ok(());
    }
    for comment in comments {
        println!("  {} ({}): {}", comment.author, comment.created_at, comment.text);
    }
    Ok(())
}

pub async fn comment(usecase: &CatalogUseCase, id: u64, text: &str) -> Result<()> {
    let posted = usecase.post_comment(id, text).await?;
    println!("comment #{} posted", posted.id);
    Ok(())
}

pub async fn save(usecase: &CatalogUseCase, args: SaveArgs) -> Result<()> {
    let draft = args.into_draft()?;
    let updating = draft.is_update();
    let saved = usecase.save_recipe(&draft).await?;
    if updating {
        println!("recipe {} updated", saved.id);
    } else {
        println!("recipe {} created", saved.id);
    }
    Ok(())
}

pub async fn delete(usecase: &CatalogUseCase, id: u64) -> Result<()> {
    usecase.delete_recipe(id).await?;
    println!("recipe {id} deleted");
    Ok(())
}

#[derive(Args)]
pub struct SaveArgs {
    /// Recipe id to update; omit to create a new recipe
    #[arg(long)]
    pub id: Option<u64>,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: String,
    /// Raw "quantity name" ingredient, repeatable
    #[arg(long = "ingredient")]
    pub ingredients: Vec<String>,
    /// Newline-delimited step text
    #[arg(long)]
    pub instructions: String,
    /// name=value attribute, repeatable
    #[arg(long = "attribute")]
    pub attributes: Vec<String>,
    #[arg(long)]
    pub cooking_time: Option<u32>,
    #[arg(long)]
    pub calories: Option<u32>,
    /// Local path of the primary image
    #[arg(long)]
    pub image: Option<PathBuf>,
    /// Local path of a step image, repeatable
    #[arg(long = "step-image")]
    pub step_images: Vec<PathBuf>,
}

impl SaveArgs {
    fn into_draft(self) -> Result<RecipeDraft> {
        let attributes = self
            .attributes
            .iter()
            .map(|raw| {
                raw.split_once('=')
                    .map(|(name, value)| Attribute {
                        name: name.trim().to_string(),
                        value: value.trim().to_string(),
                    })
                    .ok_or_else(|| anyhow!("attribute must be name=value, got {raw:?}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RecipeDraft {
            id: self.id,
            name: self.name,
            description: self.description,
            ingredients: self.ingredients,
            instructions: self.instructions,
            attributes,
            cooking_time: self.cooking_time,
            calories: self.calories,
            image: self.image,
            step_images: self.step_images,
        })
    }
}
