// core/src/store/memory.rs

//! In-process store used by tests, benchmarks and local runs without a database.

use super::{CatalogStore, InsertOutcome, RecipeStore, RelationStore, StoreError, StoreResult, UserStore};
use crate::model::{
  CartLine, Ingredient, IngredientId, RecipeDetails, RecipeDraft, RecipeFilter, RecipeId, RecipeIngredient,
  RecipeSummary, Tag, TagId, User, UserId, UserView,
};
use crate::pagination::{Page, PageRequest};
use crate::relation::RelationKind;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
struct LineRow {
  id: i64,
  ingredient: IngredientId,
  amount: i32,
}

#[derive(Debug, Clone)]
struct RecipeRow {
  id: RecipeId,
  author: UserId,
  name: String,
  image: String,
  text: String,
  cooking_time: i32,
  created_at: DateTime<Utc>,
  tags: Vec<TagId>,
  lines: Vec<LineRow>,
}

#[derive(Debug, Default)]
struct State {
  users: BTreeMap<UserId, User>,
  tags: BTreeMap<TagId, Tag>,
  ingredients: BTreeMap<IngredientId, Ingredient>,
  recipes: BTreeMap<RecipeId, RecipeRow>,
  favorites: BTreeSet<(UserId, RecipeId)>,
  cart: BTreeSet<(UserId, RecipeId)>,
  /// (follower, author)
  subscriptions: BTreeSet<(UserId, UserId)>,
  next_id: i64,
}

impl State {
  fn next_id(&mut self) -> i64 {
    self.next_id += 1;
    self.next_id
  }

  fn relation(&self, kind: RelationKind) -> &BTreeSet<(UserId, RecipeId)> {
    match kind {
      RelationKind::Favorite => &self.favorites,
      RelationKind::ShoppingCart => &self.cart,
    }
  }

  fn relation_mut(&mut self, kind: RelationKind) -> &mut BTreeSet<(UserId, RecipeId)> {
    match kind {
      RelationKind::Favorite => &mut self.favorites,
      RelationKind::ShoppingCart => &mut self.cart,
    }
  }

  fn has_relation(&self, kind: RelationKind, viewer: Option<UserId>, recipe: RecipeId) -> bool {
    viewer.is_some_and(|user| self.relation(kind).contains(&(user, recipe)))
  }

  fn name_taken(&self, author: UserId, name: &str, except: Option<RecipeId>) -> bool {
    self
      .recipes
      .values()
      .any(|r| r.author == author && r.name == name && Some(r.id) != except)
  }

  fn lines_from(&mut self, draft: &RecipeDraft) -> Vec<LineRow> {
    draft
      .ingredients
      .iter()
      .map(|input| LineRow {
        id: self.next_id(),
        ingredient: input.id,
        amount: input.amount,
      })
      .collect()
  }

  fn user_view(&self, viewer: Option<UserId>, user: &User) -> UserView {
    UserView {
      user: user.clone(),
      is_subscribed: viewer.is_some_and(|v| self.subscriptions.contains(&(v, user.id))),
    }
  }

  fn summary(row: &RecipeRow) -> RecipeSummary {
    RecipeSummary {
      id: row.id,
      name: row.name.clone(),
      image: row.image.clone(),
      cooking_time: row.cooking_time,
    }
  }

  fn details(&self, row: &RecipeRow, viewer: Option<UserId>) -> StoreResult<RecipeDetails> {
    let author = self
      .users
      .get(&row.author)
      .ok_or_else(|| StoreError::Backend(anyhow::anyhow!("recipe {} references missing user {}", row.id, row.author)))?;
    let ingredients = row
      .lines
      .iter()
      .filter_map(|line| {
        self.ingredients.get(&line.ingredient).map(|ing| RecipeIngredient {
          id: ing.id,
          name: ing.name.clone(),
          measurement_unit: ing.measurement_unit.clone(),
          amount: line.amount,
        })
      })
      .collect();
    let tags = row.tags.iter().filter_map(|id| self.tags.get(id).cloned()).collect();
    Ok(RecipeDetails {
      id: row.id,
      tags,
      author: self.user_view(viewer, author),
      ingredients,
      is_favorited: self.has_relation(RelationKind::Favorite, viewer, row.id),
      is_in_shopping_cart: self.has_relation(RelationKind::ShoppingCart, viewer, row.id),
      name: row.name.clone(),
      image: row.image.clone(),
      text: row.text.clone(),
      cooking_time: row.cooking_time,
      created_at: row.created_at,
    })
  }

  fn matches(&self, row: &RecipeRow, filter: &RecipeFilter) -> bool {
    if filter.author.is_some_and(|author| author != row.author) {
      return false;
    }
    if let Some(user) = filter.favorited_by {
      if !self.favorites.contains(&(user, row.id)) {
        return false;
      }
    }
    if let Some(user) = filter.in_cart_of {
      if !self.cart.contains(&(user, row.id)) {
        return false;
      }
    }
    filter.tags.is_empty()
      || row
        .tags
        .iter()
        .filter_map(|id| self.tags.get(id))
        .any(|tag| filter.tags.iter().any(|slug| *slug == tag.slug))
  }
}

/// `Store` backed by ordered maps behind a single lock. Ids come from one
/// shared sequence, so they increase in insertion order across all tables.
#[derive(Debug, Default)]
pub struct MemoryStore {
  state: RwLock<State>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_user(&self, username: &str, first_name: &str, last_name: &str) -> User {
    let mut state = self.state.write();
    let user = User {
      email: format!("{username}@example.com"),
      id: state.next_id(),
      username: username.to_string(),
      first_name: first_name.to_string(),
      last_name: last_name.to_string(),
      is_admin: false,
    };
    state.users.insert(user.id, user.clone());
    user
  }

  pub fn add_admin(&self, username: &str) -> User {
    let mut user = self.add_user(username, "", "");
    user.is_admin = true;
    self.state.write().users.insert(user.id, user.clone());
    user
  }

  pub fn add_tag(&self, name: &str, color: &str, slug: &str) -> StoreResult<Tag> {
    let mut state = self.state.write();
    if state.tags.values().any(|t| t.name == name || t.slug == slug || t.color == color) {
      return Err(StoreError::Conflict(format!("tag {slug}")));
    }
    let tag = Tag {
      id: state.next_id(),
      name: name.to_string(),
      color: color.to_string(),
      slug: slug.to_string(),
    };
    state.tags.insert(tag.id, tag.clone());
    Ok(tag)
  }

  pub fn add_ingredient(&self, name: &str, measurement_unit: &str) -> StoreResult<Ingredient> {
    let mut state = self.state.write();
    if state
      .ingredients
      .values()
      .any(|i| i.name == name && i.measurement_unit == measurement_unit)
    {
      return Err(StoreError::Conflict(format!("ingredient {name} ({measurement_unit})")));
    }
    let ingredient = Ingredient {
      id: state.next_id(),
      name: name.to_string(),
      measurement_unit: measurement_unit.to_string(),
    };
    state.ingredients.insert(ingredient.id, ingredient.clone());
    Ok(ingredient)
  }
}

#[async_trait]
impl CatalogStore for MemoryStore {
  async fn list_tags(&self) -> StoreResult<Vec<Tag>> {
    let mut tags: Vec<Tag> = self.state.read().tags.values().cloned().collect();
    tags.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(tags)
  }

  async fn get_tag(&self, id: TagId) -> StoreResult<Option<Tag>> {
    Ok(self.state.read().tags.get(&id).cloned())
  }

  async fn search_ingredients(&self, name_prefix: Option<&str>) -> StoreResult<Vec<Ingredient>> {
    let prefix = name_prefix.map(str::to_lowercase).unwrap_or_default();
    let mut found: Vec<Ingredient> = self
      .state
      .read()
      .ingredients
      .values()
      .filter(|i| i.name.to_lowercase().starts_with(&prefix))
      .cloned()
      .collect();
    found.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    Ok(found)
  }

  async fn get_ingredient(&self, id: IngredientId) -> StoreResult<Option<Ingredient>> {
    Ok(self.state.read().ingredients.get(&id).cloned())
  }
}

#[async_trait]
impl RecipeStore for MemoryStore {
  async fn create_recipe(&self, author: UserId, draft: &RecipeDraft) -> StoreResult<RecipeId> {
    let mut state = self.state.write();
    if state.name_taken(author, &draft.name, None) {
      return Err(StoreError::Conflict(format!("recipe {}", draft.name)));
    }
    let id = state.next_id();
    let lines = state.lines_from(draft);
    state.recipes.insert(
      id,
      RecipeRow {
        id,
        author,
        name: draft.name.clone(),
        image: draft.image.clone(),
        text: draft.text.clone(),
        cooking_time: draft.cooking_time,
        created_at: Utc::now(),
        tags: draft.tags.clone(),
        lines,
      },
    );
    Ok(id)
  }

  async fn update_recipe(&self, id: RecipeId, draft: &RecipeDraft) -> StoreResult<bool> {
    let mut state = self.state.write();
    let Some(author) = state.recipes.get(&id).map(|r| r.author) else {
      return Ok(false);
    };
    if state.name_taken(author, &draft.name, Some(id)) {
      return Err(StoreError::Conflict(format!("recipe {}", draft.name)));
    }
    let lines = state.lines_from(draft);
    if let Some(row) = state.recipes.get_mut(&id) {
      row.name = draft.name.clone();
      row.image = draft.image.clone();
      row.text = draft.text.clone();
      row.cooking_time = draft.cooking_time;
      row.tags = draft.tags.clone();
      row.lines = lines;
    }
    Ok(true)
  }

  async fn delete_recipe(&self, id: RecipeId) -> StoreResult<bool> {
    let mut state = self.state.write();
    if state.recipes.remove(&id).is_none() {
      return Ok(false);
    }
    state.favorites.retain(|(_, recipe)| *recipe != id);
    state.cart.retain(|(_, recipe)| *recipe != id);
    Ok(true)
  }

  async fn recipe_author(&self, id: RecipeId) -> StoreResult<Option<UserId>> {
    Ok(self.state.read().recipes.get(&id).map(|r| r.author))
  }

  async fn recipe_summary(&self, id: RecipeId) -> StoreResult<Option<RecipeSummary>> {
    Ok(self.state.read().recipes.get(&id).map(State::summary))
  }

  async fn recipe_details(&self, id: RecipeId, viewer: Option<UserId>) -> StoreResult<Option<RecipeDetails>> {
    let state = self.state.read();
    state.recipes.get(&id).map(|row| state.details(row, viewer)).transpose()
  }

  async fn list_recipes(
    &self,
    filter: &RecipeFilter,
    viewer: Option<UserId>,
    page: PageRequest,
  ) -> StoreResult<Page<RecipeDetails>> {
    let state = self.state.read();
    let mut rows: Vec<&RecipeRow> = state.recipes.values().filter(|r| state.matches(r, filter)).collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    let page = Page::from_items(page, rows);
    let results = page
      .results
      .iter()
      .map(|row| state.details(row, viewer))
      .collect::<StoreResult<Vec<_>>>()?;
    Ok(Page {
      count: page.count,
      page: page.page,
      limit: page.limit,
      results,
    })
  }

  async fn author_recipes(&self, author: UserId, limit: Option<u32>) -> StoreResult<Vec<RecipeSummary>> {
    let state = self.state.read();
    let mut rows: Vec<&RecipeRow> = state.recipes.values().filter(|r| r.author == author).collect();
    rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
    let limit = limit.map_or(rows.len(), |limit| limit as usize);
    Ok(rows.into_iter().take(limit).map(State::summary).collect())
  }

  async fn count_author_recipes(&self, author: UserId) -> StoreResult<u64> {
    Ok(self.state.read().recipes.values().filter(|r| r.author == author).count() as u64)
  }
}

#[async_trait]
impl RelationStore for MemoryStore {
  async fn insert_relation(&self, kind: RelationKind, user: UserId, recipe: RecipeId) -> StoreResult<InsertOutcome> {
    let mut state = self.state.write();
    Ok(if state.relation_mut(kind).insert((user, recipe)) {
      InsertOutcome::Inserted
    } else {
      InsertOutcome::AlreadyPresent
    })
  }

  async fn remove_relation(&self, kind: RelationKind, user: UserId, recipe: RecipeId) -> StoreResult<bool> {
    Ok(self.state.write().relation_mut(kind).remove(&(user, recipe)))
  }

  async fn cart_lines(&self, user: UserId) -> StoreResult<Vec<CartLine>> {
    let state = self.state.read();
    let mut rows: Vec<(IngredientId, i64, CartLine)> = Vec::new();
    for (_, recipe_id) in state.cart.range((user, RecipeId::MIN)..=(user, RecipeId::MAX)) {
      let Some(recipe) = state.recipes.get(recipe_id) else {
        continue;
      };
      for line in &recipe.lines {
        if let Some(ingredient) = state.ingredients.get(&line.ingredient) {
          rows.push((
            ingredient.id,
            line.id,
            CartLine::new(&ingredient.name, &ingredient.measurement_unit, &recipe.name, line.amount),
          ));
        }
      }
    }
    rows.sort_by_key(|(ingredient, line, _)| (*ingredient, *line));
    Ok(rows.into_iter().map(|(_, _, line)| line).collect())
  }
}

#[async_trait]
impl UserStore for MemoryStore {
  async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
    Ok(self.state.read().users.get(&id).cloned())
  }

  async fn list_users(&self, page: PageRequest) -> StoreResult<Page<User>> {
    let users = self.state.read().users.values().cloned().collect();
    Ok(Page::from_items(page, users))
  }

  async fn insert_subscription(&self, follower: UserId, author: UserId) -> StoreResult<InsertOutcome> {
    Ok(if self.state.write().subscriptions.insert((follower, author)) {
      InsertOutcome::Inserted
    } else {
      InsertOutcome::AlreadyPresent
    })
  }

  async fn remove_subscription(&self, follower: UserId, author: UserId) -> StoreResult<bool> {
    Ok(self.state.write().subscriptions.remove(&(follower, author)))
  }

  async fn is_subscribed(&self, follower: UserId, author: UserId) -> StoreResult<bool> {
    Ok(self.state.read().subscriptions.contains(&(follower, author)))
  }

  async fn list_subscriptions(&self, follower: UserId, page: PageRequest) -> StoreResult<Page<User>> {
    let state = self.state.read();
    let authors = state
      .subscriptions
      .range((follower, UserId::MIN)..=(follower, UserId::MAX))
      .filter_map(|(_, author)| state.users.get(author).cloned())
      .collect();
    Ok(Page::from_items(page, authors))
  }
}
