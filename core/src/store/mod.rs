// core/src/store/mod.rs

//! Persistence seams. Every operation takes the caller's identity explicitly;
//! nothing here looks up an ambient "current user".

mod memory;

pub use memory::MemoryStore;

use crate::model::{
  CartLine, Ingredient, IngredientId, RecipeDetails, RecipeDraft, RecipeFilter, RecipeId, RecipeSummary, Tag, TagId,
  User, UserId,
};
use crate::pagination::{Page, PageRequest};
use crate::relation::RelationKind;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
  /// A uniqueness constraint rejected the write.
  #[error("Unique constraint violated: {0}")]
  Conflict(String),

  #[error(transparent)]
  Backend(#[from] anyhow::Error),
}

impl StoreError {
  pub fn backend<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    StoreError::Backend(anyhow::Error::new(err))
  }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result of inserting a row guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
  Inserted,
  AlreadyPresent,
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
  /// Ordered by name.
  async fn list_tags(&self) -> StoreResult<Vec<Tag>>;
  async fn get_tag(&self, id: TagId) -> StoreResult<Option<Tag>>;
  /// Case-insensitive name prefix match, ordered by name.
  async fn search_ingredients(&self, name_prefix: Option<&str>) -> StoreResult<Vec<Ingredient>>;
  async fn get_ingredient(&self, id: IngredientId) -> StoreResult<Option<Ingredient>>;
}

#[async_trait]
pub trait RecipeStore: Send + Sync {
  /// Writes the recipe row, its lines and tag links atomically.
  /// A second recipe with the same name by the same author is a `Conflict`.
  async fn create_recipe(&self, author: UserId, draft: &RecipeDraft) -> StoreResult<RecipeId>;
  /// Replaces fields, lines and tags. `false` when the recipe does not exist.
  async fn update_recipe(&self, id: RecipeId, draft: &RecipeDraft) -> StoreResult<bool>;
  /// Cascades to lines, tag links, favorites and cart entries.
  async fn delete_recipe(&self, id: RecipeId) -> StoreResult<bool>;
  async fn recipe_author(&self, id: RecipeId) -> StoreResult<Option<UserId>>;
  async fn recipe_summary(&self, id: RecipeId) -> StoreResult<Option<RecipeSummary>>;
  async fn recipe_details(&self, id: RecipeId, viewer: Option<UserId>) -> StoreResult<Option<RecipeDetails>>;
  /// Ordered by name, then id.
  async fn list_recipes(
    &self,
    filter: &RecipeFilter,
    viewer: Option<UserId>,
    page: PageRequest,
  ) -> StoreResult<Page<RecipeDetails>>;
  /// Newest first, truncated to `limit` when given.
  async fn author_recipes(&self, author: UserId, limit: Option<u32>) -> StoreResult<Vec<RecipeSummary>>;
  async fn count_author_recipes(&self, author: UserId) -> StoreResult<u64>;
}

#[async_trait]
pub trait RelationStore: Send + Sync {
  async fn insert_relation(&self, kind: RelationKind, user: UserId, recipe: RecipeId) -> StoreResult<InsertOutcome>;
  /// `false` when there was nothing to remove.
  async fn remove_relation(&self, kind: RelationKind, user: UserId, recipe: RecipeId) -> StoreResult<bool>;
  /// Every ingredient line of every recipe in the user's cart,
  /// ordered by ingredient id, then by line id.
  async fn cart_lines(&self, user: UserId) -> StoreResult<Vec<CartLine>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
  async fn get_user(&self, id: UserId) -> StoreResult<Option<User>>;
  /// Ordered by id.
  async fn list_users(&self, page: PageRequest) -> StoreResult<Page<User>>;
  async fn insert_subscription(&self, follower: UserId, author: UserId) -> StoreResult<InsertOutcome>;
  async fn remove_subscription(&self, follower: UserId, author: UserId) -> StoreResult<bool>;
  async fn is_subscribed(&self, follower: UserId, author: UserId) -> StoreResult<bool>;
  /// Authors followed by `follower`, ordered by id.
  async fn list_subscriptions(&self, follower: UserId, page: PageRequest) -> StoreResult<Page<User>>;
}

/// Everything the application needs from persistence, usable as `Arc<dyn Store>`.
pub trait Store: CatalogStore + RecipeStore + RelationStore + UserStore {}

impl<T> Store for T where T: CatalogStore + RecipeStore + RelationStore + UserStore {}
