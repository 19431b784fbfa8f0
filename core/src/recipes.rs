// core/src/recipes.rs

//! Recipe authoring rules: who may modify a recipe, how a write is persisted,
//! and how listing flags resolve against the viewer.

use crate::error::{CoreError, CoreResult};
use crate::model::{RecipeDetails, RecipeDraft, RecipeFilter, RecipeId, User, UserId};
use crate::pagination::{Page, PageRequest};
use crate::store::{RecipeStore, StoreError};
use crate::validation::FieldErrors;
use tracing::{info, instrument, warn};

/// Listing query as sent by clients, before it is resolved against the viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeListQuery {
  pub author: Option<UserId>,
  pub tags: Vec<String>,
  pub is_favorited: bool,
  pub is_in_shopping_cart: bool,
}

impl RecipeListQuery {
  /// `None` when a viewer-relative flag is set but nobody is looking:
  /// an anonymous caller has no favorites and no cart.
  pub fn resolve(self, viewer: Option<UserId>) -> Option<RecipeFilter> {
    let needs_viewer = self.is_favorited || self.is_in_shopping_cart;
    if needs_viewer && viewer.is_none() {
      return None;
    }
    Some(RecipeFilter {
      author: self.author,
      tags: self.tags,
      favorited_by: viewer.filter(|_| self.is_favorited),
      in_cart_of: viewer.filter(|_| self.is_in_shopping_cart),
    })
  }
}

#[instrument(name = "recipes::list", skip(store))]
pub async fn list_recipes<S>(
  store: &S,
  query: RecipeListQuery,
  viewer: Option<UserId>,
  page: PageRequest,
) -> CoreResult<Page<RecipeDetails>>
where
  S: RecipeStore + ?Sized,
{
  match query.resolve(viewer) {
    Some(filter) => Ok(store.list_recipes(&filter, viewer, page).await?),
    None => Ok(Page::empty(page)),
  }
}

pub async fn load_details<S>(store: &S, recipe: RecipeId, viewer: Option<UserId>) -> CoreResult<RecipeDetails>
where
  S: RecipeStore + ?Sized,
{
  store
    .recipe_details(recipe, viewer)
    .await?
    .ok_or_else(|| CoreError::not_found("Recipe", recipe))
}

/// Authors may modify their own recipes; administrators may modify any.
pub fn ensure_can_modify(actor: &User, author: UserId, recipe: RecipeId) -> CoreResult<()> {
  if actor.id == author || actor.is_admin {
    Ok(())
  } else {
    warn!(actor = actor.id, author, recipe, "Recipe modification denied.");
    Err(CoreError::Forbidden { recipe_id: recipe })
  }
}

pub async fn authorize_modification<S>(store: &S, actor: &User, recipe: RecipeId) -> CoreResult<()>
where
  S: RecipeStore + ?Sized,
{
  let author = store
    .recipe_author(recipe)
    .await?
    .ok_or_else(|| CoreError::not_found("Recipe", recipe))?;
  ensure_can_modify(actor, author, recipe)
}

/// Creates (`target` is `None`) or replaces a recipe. A clash with another recipe
/// of the same author is reported against the `name` field.
#[instrument(name = "recipes::persist", skip(store, draft), fields(recipe_name = %draft.name))]
pub async fn persist_recipe<S>(
  store: &S,
  author: UserId,
  target: Option<RecipeId>,
  draft: &RecipeDraft,
) -> CoreResult<RecipeId>
where
  S: RecipeStore + ?Sized,
{
  let draft = draft.clone().normalized();
  let written = match target {
    None => store.create_recipe(author, &draft).await,
    Some(id) => match store.update_recipe(id, &draft).await {
      Ok(true) => Ok(id),
      Ok(false) => return Err(CoreError::not_found("Recipe", id)),
      Err(e) => Err(e),
    },
  };
  match written {
    Ok(id) => {
      info!(recipe_id = id, "Recipe persisted.");
      Ok(id)
    }
    Err(StoreError::Conflict(_)) => Err(CoreError::Validation(FieldErrors::single(
      "name",
      "You already have a recipe with this name.",
    ))),
    Err(e) => Err(e.into()),
  }
}

#[instrument(name = "recipes::delete", skip(store, actor), fields(actor = actor.id))]
pub async fn delete_recipe<S>(store: &S, actor: &User, recipe: RecipeId) -> CoreResult<()>
where
  S: RecipeStore + ?Sized,
{
  authorize_modification(store, actor, recipe).await?;
  if store.delete_recipe(recipe).await? {
    info!("Recipe deleted.");
    Ok(())
  } else {
    Err(CoreError::not_found("Recipe", recipe))
  }
}
