// core/tests/common/mod.rs
#![allow(dead_code)]

use foodgram::model::{Ingredient, IngredientAmountInput, RecipeDraft, RecipeId, Tag, User};
use foodgram::store::RecipeStore;
use foodgram::MemoryStore;
use once_cell::sync::Lazy;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// A store with two cooks, a tag and the pantry used across tests.
pub struct Kitchen {
  pub store: MemoryStore,
  pub ann: User,
  pub bob: User,
  pub breakfast: Tag,
  pub flour: Ingredient,
  pub sugar: Ingredient,
  pub egg: Ingredient,
}

impl Kitchen {
  pub fn new() -> Self {
    let store = MemoryStore::new();
    let ann = store.add_user("ann", "Ann", "Baker");
    let bob = store.add_user("bob", "Bob", "Cook");
    let breakfast = store.add_tag("Breakfast", "#E26C2D", "breakfast").unwrap();
    let flour = store.add_ingredient("Flour", "g").unwrap();
    let sugar = store.add_ingredient("Sugar", "g").unwrap();
    let egg = store.add_ingredient("Egg", "pcs").unwrap();
    Self {
      store,
      ann,
      bob,
      breakfast,
      flour,
      sugar,
      egg,
    }
  }

  pub fn draft(&self, name: &str, lines: &[(&Ingredient, i32)]) -> RecipeDraft {
    RecipeDraft {
      name: name.to_string(),
      text: format!("How to make {name}."),
      image: "data:image/png;base64,iVBORw0KGgo=".to_string(),
      cooking_time: 15,
      ingredients: lines
        .iter()
        .map(|(ingredient, amount)| IngredientAmountInput {
          id: ingredient.id,
          amount: *amount,
        })
        .collect(),
      tags: vec![self.breakfast.id],
    }
  }

  pub async fn recipe(&self, author: &User, name: &str, lines: &[(&Ingredient, i32)]) -> RecipeId {
    self.store.create_recipe(author.id, &self.draft(name, lines)).await.unwrap()
  }

  /// Recipe A (Flour 200 g, Sugar 50 g) and Recipe B (Flour 100 g, Egg 2 pcs), both by Ann.
  pub async fn pancakes_and_bread(&self) -> (RecipeId, RecipeId) {
    let a = self.recipe(&self.ann, "A", &[(&self.flour, 200), (&self.sugar, 50)]).await;
    let b = self.recipe(&self.ann, "B", &[(&self.flour, 100), (&self.egg, 2)]).await;
    (a, b)
  }
}
