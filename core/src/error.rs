// core/src/error.rs

use crate::relation::RelationKind;
use crate::render::RenderError;
use crate::store::StoreError;
use crate::validation::FieldErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
  #[error("Shopping cart is empty")]
  EmptyCart,

  #[error("Recipe {recipe_id} is already in {kind}")]
  DuplicateRelation { kind: RelationKind, recipe_id: i64 },

  #[error("Recipe {recipe_id} is not in {kind}")]
  MissingRelation { kind: RelationKind, recipe_id: i64 },

  #[error("Already subscribed to author {author_id}")]
  DuplicateSubscription { author_id: i64 },

  #[error("Not subscribed to author {author_id}")]
  MissingSubscription { author_id: i64 },

  #[error("Cannot subscribe to yourself")]
  SelfSubscription,

  #[error("Validation failed: {0}")]
  Validation(FieldErrors),

  #[error("{entity} {id} not found")]
  NotFound { entity: &'static str, id: i64 },

  #[error("Only the author or an administrator may modify recipe {recipe_id}")]
  Forbidden { recipe_id: i64 },

  #[error("Storage error: {0}")]
  Store(#[from] StoreError),

  #[error("Shopping list rendering failed: {0}")]
  Render(#[from] RenderError),
}

impl CoreError {
  pub fn not_found(entity: &'static str, id: i64) -> Self {
    CoreError::NotFound { entity, id }
  }
}

pub type CoreResult<T, E = CoreError> = std::result::Result<T, E>;
