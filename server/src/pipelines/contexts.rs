// server/src/pipelines/contexts.rs

//! Data structs the request workflows run on. Handlers receive them wrapped in
//! `foodgram::ContextData`.

use crate::state::AppState;
use chrono::NaiveDate;
use foodgram::model::{CartLine, RecipeDetails, RecipeDraft, RecipeId, RecipeSummary, SubscriptionView, User, UserId};
use foodgram::shopping::{IngredientTotals, ShoppingPlan};
use foodgram::{RelationChange, RelationKind};

#[derive(Clone)]
pub struct ShoppingListCtxData {
  pub app_state: AppState,
  pub user_id: UserId,
  pub today: NaiveDate,
  pub user: Option<User>,
  pub lines: Vec<CartLine>,
  pub totals: IngredientTotals,
  pub plan: Option<ShoppingPlan>,
  pub document: Option<Vec<u8>>,
}

impl ShoppingListCtxData {
  pub fn new(app_state: AppState, user_id: UserId, today: NaiveDate) -> Self {
    Self {
      app_state,
      user_id,
      today,
      user: None,
      lines: Vec::new(),
      totals: IngredientTotals::new(),
      plan: None,
      document: None,
    }
  }
}

/// Favorite or shopping-cart toggle for one (user, recipe) pair.
#[derive(Clone)]
pub struct RelationCtxData {
  pub app_state: AppState,
  pub user_id: UserId,
  pub recipe_id: RecipeId,
  pub kind: RelationKind,
  pub change: RelationChange,
  pub summary: Option<RecipeSummary>,
}

#[derive(Clone)]
pub struct RecipeWriteCtxData {
  pub app_state: AppState,
  pub actor: User,
  /// `None` creates a new recipe.
  pub target: Option<RecipeId>,
  pub draft: RecipeDraft,
  pub recipe_id: Option<RecipeId>,
  pub details: Option<RecipeDetails>,
}

#[derive(Clone)]
pub struct SubscriptionCtxData {
  pub app_state: AppState,
  pub follower_id: UserId,
  pub author_id: UserId,
  pub change: RelationChange,
  pub recipes_limit: Option<u32>,
  pub author: Option<User>,
  pub view: Option<SubscriptionView>,
}
