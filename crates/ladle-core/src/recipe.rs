//! Recipe domain models.
//!
//! The server is the source of truth for recipes; the client keeps a
//! fetched listing cache that is re-fetched after mutations rather than
//! patched in place.

use crate::error::{LadleError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Maximum number of step images a recipe can carry.
pub const MAX_STEP_IMAGES: usize = 10;

/// A named attribute attached to a recipe (e.g. calories, cooking time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// A recipe as returned by the API.
///
/// `ingredients_list` holds raw `"quantity name"` strings;
/// `instructions` is newline-delimited step text. Image fields are
/// absolute URLs by the time they leave the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients_list: Vec<String>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub step_images: Vec<String>,
    #[serde(default)]
    pub owner: Option<String>,
}

impl Recipe {
    /// Instruction steps, one per non-empty line.
    pub fn instruction_steps(&self) -> Vec<&str> {
        self.instructions
            .split('\n')
            .map(str::trim)
            .filter(|step| !step.is_empty())
            .collect()
    }

    /// Ingredients split into quantity and name.
    pub fn parsed_ingredients(&self) -> Vec<Ingredient> {
        self.ingredients_list
            .iter()
            .map(|raw| Ingredient::parse(raw))
            .collect()
    }
}

/// An ingredient split into its quantity prefix and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub quantity: String,
    pub name: String,
}

// "2 cups flour" -> quantity "2 cups", name "flour".
static INGREDIENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+\s*\w*)\s*(.*)$").expect("ingredient regex"));

impl Ingredient {
    /// Parses a raw `"quantity name"` string.
    ///
    /// Strings that do not start with a numeric quantity keep the whole
    /// string as the name with an empty quantity.
    pub fn parse(raw: &str) -> Self {
        match INGREDIENT_RE.captures(raw) {
            Some(caps) => Self {
                quantity: caps[1].trim().to_string(),
                name: caps[2].trim().to_string(),
            },
            None => Self {
                quantity: String::new(),
                name: raw.trim().to_string(),
            },
        }
    }
}

/// Form payload for creating or updating a recipe.
///
/// `id` decides between create (POST) and update (PUT). Image fields
/// are local file paths; the transport reads them and builds the
/// multipart body.
#[derive(Debug, Clone, Default)]
pub struct RecipeDraft {
    pub id: Option<u64>,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub attributes: Vec<Attribute>,
    pub cooking_time: Option<u32>,
    pub calories: Option<u32>,
    pub image: Option<PathBuf>,
    pub step_images: Vec<PathBuf>,
}

impl RecipeDraft {
    /// Validates the draft before any call is made.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when a required field is empty or more than
    /// [`MAX_STEP_IMAGES`] step images are attached.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LadleError::validation("recipe name must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(LadleError::validation("description must not be empty"));
        }
        if self.instructions.trim().is_empty() {
            return Err(LadleError::validation("instructions must not be empty"));
        }
        if self.step_images.len() > MAX_STEP_IMAGES {
            return Err(LadleError::validation(format!(
                "at most {} step images are allowed",
                MAX_STEP_IMAGES
            )));
        }
        Ok(())
    }

    /// True when this draft edits an existing recipe.
    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RecipeDraft {
        RecipeDraft {
            name: "Pancakes".to_string(),
            description: "Fluffy".to_string(),
            instructions: "Mix\nFry".to_string(),
            ingredients: vec!["2 cups flour".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn parse_quantity_and_name() {
        let ing = Ingredient::parse("2 cups flour");
        assert_eq!(ing.quantity, "2 cups");
        assert_eq!(ing.name, "flour");
    }

    #[test]
    fn parse_without_quantity() {
        let ing = Ingredient::parse("salt to taste");
        assert_eq!(ing.quantity, "");
        assert_eq!(ing.name, "salt to taste");
    }

    #[test]
    fn instruction_steps_skip_blank_lines() {
        let recipe = Recipe {
            id: 1,
            name: "x".to_string(),
            description: String::new(),
            ingredients_list: vec![],
            instructions: "Mix\n\nFry \n".to_string(),
            attributes: vec![],
            image: None,
            step_images: vec![],
            owner: None,
        };
        assert_eq!(recipe.instruction_steps(), vec!["Mix", "Fry"]);
    }

    #[test]
    fn draft_validation_accepts_complete_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn draft_validation_rejects_empty_name() {
        let mut d = draft();
        d.name = "  ".to_string();
        assert!(d.validate().unwrap_err().is_validation());
    }

    #[test]
    fn draft_validation_rejects_too_many_step_images() {
        let mut d = draft();
        d.step_images = (0..11).map(|i| PathBuf::from(format!("{i}.jpg"))).collect();
        assert!(d.validate().unwrap_err().is_validation());
    }
}
