// server/src/db/postgres.rs

//! `Store` over Postgres. Queries are checked at runtime so the crate builds
//! without a live database.

use super::rows::{
  CartLineRow, IngredientRow, RecipeIngredientRow, RecipeRow, RecipeSummaryRow, TagRow, UserRow,
};
use async_trait::async_trait;
use foodgram::model::{
  CartLine, Ingredient, IngredientId, RecipeDetails, RecipeDraft, RecipeFilter, RecipeId, RecipeSummary, Tag, TagId,
  User, UserId, UserView,
};
use foodgram::store::{CatalogStore, InsertOutcome, RecipeStore, RelationStore, StoreError, StoreResult, UserStore};
use foodgram::{Page, PageRequest, RelationKind};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder, Transaction};
use tracing::instrument;

fn map_err(err: sqlx::Error) -> StoreError {
  if let sqlx::Error::Database(db_err) = &err {
    if db_err.is_unique_violation() {
      return StoreError::Conflict(db_err.message().to_string());
    }
  }
  StoreError::backend(err)
}

fn relation_table(kind: RelationKind) -> &'static str {
  match kind {
    RelationKind::Favorite => "favorites",
    RelationKind::ShoppingCart => "shopping_cart",
  }
}

/// `LIKE` pattern matching names that start with `prefix`.
fn prefix_pattern(prefix: &str) -> String {
  let escaped = prefix.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
  format!("{}%", escaped)
}

fn to_count(n: i64) -> u64 {
  u64::try_from(n).unwrap_or(0)
}

fn push_recipe_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &RecipeFilter) {
  qb.push(" WHERE TRUE");
  if let Some(author) = filter.author {
    qb.push(" AND r.author_id = ").push_bind(author);
  }
  if !filter.tags.is_empty() {
    qb.push(
      " AND EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
       WHERE rt.recipe_id = r.id AND t.slug = ANY(",
    )
    .push_bind(filter.tags.clone())
    .push("))");
  }
  if let Some(user) = filter.favorited_by {
    qb.push(" AND EXISTS (SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = ")
      .push_bind(user)
      .push(")");
  }
  if let Some(user) = filter.in_cart_of {
    qb.push(" AND EXISTS (SELECT 1 FROM shopping_cart c WHERE c.recipe_id = r.id AND c.user_id = ")
      .push_bind(user)
      .push(")");
  }
}

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await?;
    Ok(Self::new(pool))
  }

  async fn write_children(
    tx: &mut Transaction<'_, Postgres>,
    recipe_id: RecipeId,
    draft: &RecipeDraft,
  ) -> StoreResult<()> {
    if !draft.ingredients.is_empty() {
      let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) ");
      qb.push_values(&draft.ingredients, |mut row, line| {
        row.push_bind(recipe_id).push_bind(line.id).push_bind(line.amount);
      });
      qb.build().execute(&mut **tx).await.map_err(map_err)?;
    }
    if !draft.tags.is_empty() {
      let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO recipe_tags (recipe_id, tag_id) ");
      qb.push_values(&draft.tags, |mut row, tag_id| {
        row.push_bind(recipe_id).push_bind(*tag_id);
      });
      qb.build().execute(&mut **tx).await.map_err(map_err)?;
    }
    Ok(())
  }

  async fn has_relation(&self, kind: RelationKind, viewer: Option<UserId>, recipe: RecipeId) -> StoreResult<bool> {
    let Some(user) = viewer else {
      return Ok(false);
    };
    let sql = format!(
      "SELECT EXISTS (SELECT 1 FROM {} WHERE user_id = $1 AND recipe_id = $2)",
      relation_table(kind)
    );
    sqlx::query_scalar::<_, bool>(&sql)
      .bind(user)
      .bind(recipe)
      .fetch_one(&self.pool)
      .await
      .map_err(map_err)
  }

  async fn details_for(&self, row: RecipeRow, viewer: Option<UserId>) -> StoreResult<RecipeDetails> {
    let author = self
      .get_user(row.author_id)
      .await?
      .ok_or_else(|| StoreError::Backend(anyhow::anyhow!("recipe {} has no author row", row.id)))?;
    let is_subscribed = match viewer {
      Some(viewer) if viewer != author.id => self.is_subscribed(viewer, author.id).await?,
      _ => false,
    };
    let tags = sqlx::query_as::<_, TagRow>(
      "SELECT t.id, t.name, t.color, t.slug FROM tags t \
       JOIN recipe_tags rt ON rt.tag_id = t.id WHERE rt.recipe_id = $1 ORDER BY t.name",
    )
    .bind(row.id)
    .fetch_all(&self.pool)
    .await
    .map_err(map_err)?;
    let ingredients = sqlx::query_as::<_, RecipeIngredientRow>(
      "SELECT i.id, i.name, i.measurement_unit, ri.amount FROM recipe_ingredients ri \
       JOIN ingredients i ON i.id = ri.ingredient_id WHERE ri.recipe_id = $1 ORDER BY ri.id",
    )
    .bind(row.id)
    .fetch_all(&self.pool)
    .await
    .map_err(map_err)?;

    Ok(RecipeDetails {
      id: row.id,
      tags: tags.into_iter().map(Tag::from).collect(),
      author: UserView { user: author, is_subscribed },
      ingredients: ingredients.into_iter().map(Into::into).collect(),
      is_favorited: self.has_relation(RelationKind::Favorite, viewer, row.id).await?,
      is_in_shopping_cart: self.has_relation(RelationKind::ShoppingCart, viewer, row.id).await?,
      name: row.name,
      image: row.image,
      text: row.text,
      cooking_time: row.cooking_time,
      created_at: row.pub_date,
    })
  }
}

#[async_trait]
impl CatalogStore for PgStore {
  async fn list_tags(&self) -> StoreResult<Vec<Tag>> {
    let rows = sqlx::query_as::<_, TagRow>("SELECT id, name, color, slug FROM tags ORDER BY name")
      .fetch_all(&self.pool)
      .await
      .map_err(map_err)?;
    Ok(rows.into_iter().map(Tag::from).collect())
  }

  async fn get_tag(&self, id: TagId) -> StoreResult<Option<Tag>> {
    let row = sqlx::query_as::<_, TagRow>("SELECT id, name, color, slug FROM tags WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(map_err)?;
    Ok(row.map(Tag::from))
  }

  #[instrument(name = "PgStore::search_ingredients", skip(self))]
  async fn search_ingredients(&self, name_prefix: Option<&str>) -> StoreResult<Vec<Ingredient>> {
    let rows = sqlx::query_as::<_, IngredientRow>(
      "SELECT id, name, measurement_unit FROM ingredients \
       WHERE ($1::TEXT IS NULL OR name ILIKE $1) ORDER BY name, id",
    )
    .bind(name_prefix.map(prefix_pattern))
    .fetch_all(&self.pool)
    .await
    .map_err(map_err)?;
    Ok(rows.into_iter().map(Ingredient::from).collect())
  }

  async fn get_ingredient(&self, id: IngredientId) -> StoreResult<Option<Ingredient>> {
    let row = sqlx::query_as::<_, IngredientRow>("SELECT id, name, measurement_unit FROM ingredients WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(map_err)?;
    Ok(row.map(Ingredient::from))
  }
}

#[async_trait]
impl RecipeStore for PgStore {
  #[instrument(name = "PgStore::create_recipe", skip(self, draft), fields(recipe_name = %draft.name))]
  async fn create_recipe(&self, author: UserId, draft: &RecipeDraft) -> StoreResult<RecipeId> {
    let mut tx = self.pool.begin().await.map_err(map_err)?;
    let id = sqlx::query_scalar::<_, i64>(
      "INSERT INTO recipes (author_id, name, image, text, cooking_time) VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(author)
    .bind(&draft.name)
    .bind(&draft.image)
    .bind(&draft.text)
    .bind(draft.cooking_time)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_err)?;
    Self::write_children(&mut tx, id, draft).await?;
    tx.commit().await.map_err(map_err)?;
    Ok(id)
  }

  #[instrument(name = "PgStore::update_recipe", skip(self, draft))]
  async fn update_recipe(&self, id: RecipeId, draft: &RecipeDraft) -> StoreResult<bool> {
    let mut tx = self.pool.begin().await.map_err(map_err)?;
    let updated = sqlx::query("UPDATE recipes SET name = $2, image = $3, text = $4, cooking_time = $5 WHERE id = $1")
      .bind(id)
      .bind(&draft.name)
      .bind(&draft.image)
      .bind(&draft.text)
      .bind(draft.cooking_time)
      .execute(&mut *tx)
      .await
      .map_err(map_err)?;
    if updated.rows_affected() == 0 {
      return Ok(false);
    }
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
      .bind(id)
      .execute(&mut *tx)
      .await
      .map_err(map_err)?;
    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
      .bind(id)
      .execute(&mut *tx)
      .await
      .map_err(map_err)?;
    Self::write_children(&mut tx, id, draft).await?;
    tx.commit().await.map_err(map_err)?;
    Ok(true)
  }

  #[instrument(name = "PgStore::delete_recipe", skip(self))]
  async fn delete_recipe(&self, id: RecipeId) -> StoreResult<bool> {
    let deleted = sqlx::query("DELETE FROM recipes WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(map_err)?;
    Ok(deleted.rows_affected() > 0)
  }

  async fn recipe_author(&self, id: RecipeId) -> StoreResult<Option<UserId>> {
    sqlx::query_scalar::<_, i64>("SELECT author_id FROM recipes WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(map_err)
  }

  async fn recipe_summary(&self, id: RecipeId) -> StoreResult<Option<RecipeSummary>> {
    let row = sqlx::query_as::<_, RecipeSummaryRow>("SELECT id, name, image, cooking_time FROM recipes WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(map_err)?;
    Ok(row.map(RecipeSummary::from))
  }

  async fn recipe_details(&self, id: RecipeId, viewer: Option<UserId>) -> StoreResult<Option<RecipeDetails>> {
    let row = sqlx::query_as::<_, RecipeRow>(
      "SELECT id, author_id, name, image, text, cooking_time, pub_date FROM recipes WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await
    .map_err(map_err)?;
    match row {
      Some(row) => Ok(Some(self.details_for(row, viewer).await?)),
      None => Ok(None),
    }
  }

  #[instrument(name = "PgStore::list_recipes", skip(self))]
  async fn list_recipes(
    &self,
    filter: &RecipeFilter,
    viewer: Option<UserId>,
    page: PageRequest,
  ) -> StoreResult<Page<RecipeDetails>> {
    let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM recipes r");
    push_recipe_filter(&mut count_qb, filter);
    let count = count_qb
      .build_query_scalar::<i64>()
      .fetch_one(&self.pool)
      .await
      .map_err(map_err)?;

    let mut page_qb = QueryBuilder::<Postgres>::new(
      "SELECT r.id, r.author_id, r.name, r.image, r.text, r.cooking_time, r.pub_date FROM recipes r",
    );
    push_recipe_filter(&mut page_qb, filter);
    page_qb
      .push(" ORDER BY r.name, r.id LIMIT ")
      .push_bind(i64::from(page.limit))
      .push(" OFFSET ")
      .push_bind(page.offset() as i64);
    let rows = page_qb
      .build_query_as::<RecipeRow>()
      .fetch_all(&self.pool)
      .await
      .map_err(map_err)?;

    let mut results = Vec::with_capacity(rows.len());
    for row in rows {
      results.push(self.details_for(row, viewer).await?);
    }
    Ok(Page::new(page, to_count(count), results))
  }

  async fn author_recipes(&self, author: UserId, limit: Option<u32>) -> StoreResult<Vec<RecipeSummary>> {
    let rows = sqlx::query_as::<_, RecipeSummaryRow>(
      "SELECT id, name, image, cooking_time FROM recipes WHERE author_id = $1 \
       ORDER BY pub_date DESC, id DESC LIMIT $2",
    )
    .bind(author)
    .bind(limit.map(i64::from))
    .fetch_all(&self.pool)
    .await
    .map_err(map_err)?;
    Ok(rows.into_iter().map(RecipeSummary::from).collect())
  }

  async fn count_author_recipes(&self, author: UserId) -> StoreResult<u64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM recipes WHERE author_id = $1")
      .bind(author)
      .fetch_one(&self.pool)
      .await
      .map_err(map_err)?;
    Ok(to_count(count))
  }
}

#[async_trait]
impl RelationStore for PgStore {
  #[instrument(name = "PgStore::insert_relation", skip(self))]
  async fn insert_relation(&self, kind: RelationKind, user: UserId, recipe: RecipeId) -> StoreResult<InsertOutcome> {
    let sql = format!(
      "INSERT INTO {} (user_id, recipe_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
      relation_table(kind)
    );
    let inserted = sqlx::query(&sql)
      .bind(user)
      .bind(recipe)
      .execute(&self.pool)
      .await
      .map_err(map_err)?;
    Ok(if inserted.rows_affected() > 0 {
      InsertOutcome::Inserted
    } else {
      InsertOutcome::AlreadyPresent
    })
  }

  #[instrument(name = "PgStore::remove_relation", skip(self))]
  async fn remove_relation(&self, kind: RelationKind, user: UserId, recipe: RecipeId) -> StoreResult<bool> {
    let sql = format!("DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2", relation_table(kind));
    let removed = sqlx::query(&sql)
      .bind(user)
      .bind(recipe)
      .execute(&self.pool)
      .await
      .map_err(map_err)?;
    Ok(removed.rows_affected() > 0)
  }

  #[instrument(name = "PgStore::cart_lines", skip(self))]
  async fn cart_lines(&self, user: UserId) -> StoreResult<Vec<CartLine>> {
    let rows = sqlx::query_as::<_, CartLineRow>(
      "SELECT i.name, i.measurement_unit, r.name AS recipe_name, ri.amount \
       FROM recipe_ingredients ri \
       JOIN ingredients i ON i.id = ri.ingredient_id \
       JOIN recipes r ON r.id = ri.recipe_id \
       JOIN shopping_cart c ON c.recipe_id = ri.recipe_id \
       WHERE c.user_id = $1 \
       ORDER BY i.id, ri.id",
    )
    .bind(user)
    .fetch_all(&self.pool)
    .await
    .map_err(map_err)?;
    Ok(rows.into_iter().map(CartLine::from).collect())
  }
}

#[async_trait]
impl UserStore for PgStore {
  async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(
      "SELECT id, email, username, first_name, last_name, is_admin FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await
    .map_err(map_err)?;
    Ok(row.map(User::from))
  }

  async fn list_users(&self, page: PageRequest) -> StoreResult<Page<User>> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
      .fetch_one(&self.pool)
      .await
      .map_err(map_err)?;
    let rows = sqlx::query_as::<_, UserRow>(
      "SELECT id, email, username, first_name, last_name, is_admin FROM users ORDER BY id LIMIT $1 OFFSET $2",
    )
    .bind(i64::from(page.limit))
    .bind(page.offset() as i64)
    .fetch_all(&self.pool)
    .await
    .map_err(map_err)?;
    Ok(Page::new(page, to_count(count), rows.into_iter().map(User::from).collect()))
  }

  #[instrument(name = "PgStore::insert_subscription", skip(self))]
  async fn insert_subscription(&self, follower: UserId, author: UserId) -> StoreResult<InsertOutcome> {
    let inserted = sqlx::query(
      "INSERT INTO subscriptions (follower_id, author_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(follower)
    .bind(author)
    .execute(&self.pool)
    .await
    .map_err(map_err)?;
    Ok(if inserted.rows_affected() > 0 {
      InsertOutcome::Inserted
    } else {
      InsertOutcome::AlreadyPresent
    })
  }

  #[instrument(name = "PgStore::remove_subscription", skip(self))]
  async fn remove_subscription(&self, follower: UserId, author: UserId) -> StoreResult<bool> {
    let removed = sqlx::query("DELETE FROM subscriptions WHERE follower_id = $1 AND author_id = $2")
      .bind(follower)
      .bind(author)
      .execute(&self.pool)
      .await
      .map_err(map_err)?;
    Ok(removed.rows_affected() > 0)
  }

  async fn is_subscribed(&self, follower: UserId, author: UserId) -> StoreResult<bool> {
    sqlx::query_scalar::<_, bool>(
      "SELECT EXISTS (SELECT 1 FROM subscriptions WHERE follower_id = $1 AND author_id = $2)",
    )
    .bind(follower)
    .bind(author)
    .fetch_one(&self.pool)
    .await
    .map_err(map_err)
  }

  async fn list_subscriptions(&self, follower: UserId, page: PageRequest) -> StoreResult<Page<User>> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscriptions WHERE follower_id = $1")
      .bind(follower)
      .fetch_one(&self.pool)
      .await
      .map_err(map_err)?;
    let rows = sqlx::query_as::<_, UserRow>(
      "SELECT u.id, u.email, u.username, u.first_name, u.last_name, u.is_admin FROM users u \
       JOIN subscriptions s ON s.author_id = u.id WHERE s.follower_id = $1 \
       ORDER BY u.id LIMIT $2 OFFSET $3",
    )
    .bind(follower)
    .bind(i64::from(page.limit))
    .bind(page.offset() as i64)
    .fetch_all(&self.pool)
    .await
    .map_err(map_err)?;
    Ok(Page::new(page, to_count(count), rows.into_iter().map(User::from).collect()))
  }
}
