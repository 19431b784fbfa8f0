// core/src/model.rs

//! Records held by the store and the read models served to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type TagId = i64;
pub type IngredientId = i64;
pub type RecipeId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub email: String,
  pub id: UserId,
  pub username: String,
  pub first_name: String,
  pub last_name: String,
  #[serde(skip_serializing, default)]
  pub is_admin: bool,
}

impl User {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name).trim().to_string()
  }
}

/// A user as seen by a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
  #[serde(flatten)]
  pub user: User,
  pub is_subscribed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
  pub id: TagId,
  pub name: String,
  pub color: String,
  pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
  pub id: IngredientId,
  pub name: String,
  pub measurement_unit: String,
}

impl Ingredient {
  pub fn key(&self) -> IngredientKey {
    IngredientKey::new(&self.name, &self.measurement_unit)
  }
}

/// Identity of an ingredient: the unique (name, measurement unit) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IngredientKey {
  pub name: String,
  pub measurement_unit: String,
}

impl IngredientKey {
  pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      measurement_unit: measurement_unit.into(),
    }
  }
}

/// One ingredient line of a recipe, flattened with the ingredient record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeIngredient {
  pub id: IngredientId,
  pub name: String,
  pub measurement_unit: String,
  pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeSummary {
  pub id: RecipeId,
  pub name: String,
  pub image: String,
  pub cooking_time: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeDetails {
  pub id: RecipeId,
  pub tags: Vec<Tag>,
  pub author: UserView,
  pub ingredients: Vec<RecipeIngredient>,
  pub is_favorited: bool,
  pub is_in_shopping_cart: bool,
  pub name: String,
  pub image: String,
  pub text: String,
  pub cooking_time: i32,
  /// Publication time; orders an author's recipes newest first.
  #[serde(skip_serializing)]
  pub created_at: DateTime<Utc>,
}

impl RecipeDetails {
  pub fn summary(&self) -> RecipeSummary {
    RecipeSummary {
      id: self.id,
      name: self.name.clone(),
      image: self.image.clone(),
      cooking_time: self.cooking_time,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientAmountInput {
  pub id: IngredientId,
  pub amount: i32,
}

/// Create/update payload for a recipe. Shape checks live in `validation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDraft {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub text: String,
  #[serde(default)]
  pub image: String,
  #[serde(default)]
  pub cooking_time: i32,
  #[serde(default)]
  pub ingredients: Vec<IngredientAmountInput>,
  #[serde(default)]
  pub tags: Vec<TagId>,
}

impl RecipeDraft {
  /// Drops surrounding whitespace from the text fields. Stored names are
  /// compared in this form.
  pub fn normalized(mut self) -> Self {
    for field in [&mut self.name, &mut self.text, &mut self.image] {
      let trimmed = field.trim();
      if trimmed.len() != field.len() {
        *field = trimmed.to_string();
      }
    }
    self
  }
}

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionView {
  #[serde(flatten)]
  pub author: UserView,
  pub recipes: Vec<RecipeSummary>,
  pub recipes_count: u64,
}

/// One ingredient-amount line of a recipe in a user's cart, in store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
  pub ingredient: IngredientKey,
  pub recipe_name: String,
  pub amount: i32,
}

impl CartLine {
  pub fn new(name: &str, measurement_unit: &str, recipe_name: &str, amount: i32) -> Self {
    Self {
      ingredient: IngredientKey::new(name, measurement_unit),
      recipe_name: recipe_name.to_string(),
      amount,
    }
  }
}

/// Filters accepted by the recipe listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
  pub author: Option<UserId>,
  /// Tag slugs; a recipe matches when it carries any of them.
  pub tags: Vec<String>,
  pub favorited_by: Option<UserId>,
  pub in_cart_of: Option<UserId>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn user(first: &str, last: &str) -> User {
    User {
      email: "cook@example.com".into(),
      id: 1,
      username: "cook".into(),
      first_name: first.into(),
      last_name: last.into(),
      is_admin: true,
    }
  }

  #[test]
  fn full_name_trims_missing_parts() {
    assert_eq!(user("Ada", "Lovelace").full_name(), "Ada Lovelace");
    assert_eq!(user("Ada", "").full_name(), "Ada");
    assert_eq!(user("", "").full_name(), "");
  }

  #[test]
  fn normalized_draft_trims_text_fields() {
    let draft = RecipeDraft {
      name: "  Soup ".into(),
      text: "Boil.\n".into(),
      image: " img".into(),
      cooking_time: 5,
      ingredients: vec![],
      tags: vec![],
    }
    .normalized();
    assert_eq!((draft.name.as_str(), draft.text.as_str(), draft.image.as_str()), ("Soup", "Boil.", "img"));
  }

  #[test]
  fn admin_flag_is_not_serialized() {
    let json = serde_json::to_value(UserView {
      user: user("Ada", "Lovelace"),
      is_subscribed: false,
    })
    .unwrap();
    assert!(json.get("is_admin").is_none());
    assert_eq!(json["is_subscribed"], false);
    assert_eq!(json["username"], "cook");
  }
}
