// core/src/relation.rs

//! The user-recipe relation shared by favorites and the shopping cart.
//!
//! Per (user, recipe) pair the relation is either absent or present. `Add` moves
//! absent to present and `Remove` moves present to absent; the opposite request
//! fails, so a retried request observes `DuplicateRelation`/`MissingRelation`.

use crate::error::{CoreError, CoreResult};
use crate::model::{RecipeId, RecipeSummary, UserId};
use crate::store::{InsertOutcome, RecipeStore, RelationStore};
use std::fmt;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
  Favorite,
  ShoppingCart,
}

impl RelationKind {
  pub const ALL: [RelationKind; 2] = [RelationKind::Favorite, RelationKind::ShoppingCart];

  pub fn as_str(&self) -> &'static str {
    match self {
      RelationKind::Favorite => "favorite",
      RelationKind::ShoppingCart => "shopping_cart",
    }
  }
}

impl fmt::Display for RelationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      RelationKind::Favorite => "favorites",
      RelationKind::ShoppingCart => "the shopping cart",
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationChange {
  Add,
  Remove,
}

pub async fn ensure_recipe_exists<S>(store: &S, recipe: RecipeId) -> CoreResult<()>
where
  S: RecipeStore + ?Sized,
{
  match store.recipe_author(recipe).await? {
    Some(_) => Ok(()),
    None => Err(CoreError::not_found("Recipe", recipe)),
  }
}

/// Applies one transition of the (user, recipe) state machine for `kind`.
///
/// A concurrent insert that loses the race against the store's uniqueness
/// constraint surfaces as `DuplicateRelation` too.
#[instrument(name = "relation::apply_change", skip(store))]
pub async fn apply_relation_change<S>(
  store: &S,
  kind: RelationKind,
  change: RelationChange,
  user: UserId,
  recipe: RecipeId,
) -> CoreResult<()>
where
  S: RelationStore + ?Sized,
{
  match change {
    RelationChange::Add => match store.insert_relation(kind, user, recipe).await? {
      InsertOutcome::Inserted => {
        info!("Relation added.");
        Ok(())
      }
      InsertOutcome::AlreadyPresent => {
        warn!("Relation already present.");
        Err(CoreError::DuplicateRelation { kind, recipe_id: recipe })
      }
    },
    RelationChange::Remove => {
      if store.remove_relation(kind, user, recipe).await? {
        info!("Relation removed.");
        Ok(())
      } else {
        warn!("Relation was not present.");
        Err(CoreError::MissingRelation { kind, recipe_id: recipe })
      }
    }
  }
}

/// Checks the recipe, adds the relation and returns the recipe's short form.
pub async fn add_recipe_relation<S>(store: &S, kind: RelationKind, user: UserId, recipe: RecipeId) -> CoreResult<RecipeSummary>
where
  S: RecipeStore + RelationStore + ?Sized,
{
  let summary = store
    .recipe_summary(recipe)
    .await?
    .ok_or_else(|| CoreError::not_found("Recipe", recipe))?;
  apply_relation_change(store, kind, RelationChange::Add, user, recipe).await?;
  Ok(summary)
}

pub async fn remove_recipe_relation<S>(store: &S, kind: RelationKind, user: UserId, recipe: RecipeId) -> CoreResult<()>
where
  S: RecipeStore + RelationStore + ?Sized,
{
  ensure_recipe_exists(store, recipe).await?;
  apply_relation_change(store, kind, RelationChange::Remove, user, recipe).await
}
