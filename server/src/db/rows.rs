// server/src/db/rows.rs

//! Row shapes read back from Postgres, converted into the core model.

use foodgram::model::{CartLine, Ingredient, IngredientKey, RecipeIngredient, RecipeSummary, Tag, User};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct UserRow {
  pub id: i64,
  pub email: String,
  pub username: String,
  pub first_name: String,
  pub last_name: String,
  pub is_admin: bool,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User {
      email: row.email,
      id: row.id,
      username: row.username,
      first_name: row.first_name,
      last_name: row.last_name,
      is_admin: row.is_admin,
    }
  }
}

#[derive(Debug, FromRow)]
pub struct TagRow {
  pub id: i64,
  pub name: String,
  pub color: String,
  pub slug: String,
}

impl From<TagRow> for Tag {
  fn from(row: TagRow) -> Self {
    Tag {
      id: row.id,
      name: row.name,
      color: row.color,
      slug: row.slug,
    }
  }
}

#[derive(Debug, FromRow)]
pub struct IngredientRow {
  pub id: i64,
  pub name: String,
  pub measurement_unit: String,
}

impl From<IngredientRow> for Ingredient {
  fn from(row: IngredientRow) -> Self {
    Ingredient {
      id: row.id,
      name: row.name,
      measurement_unit: row.measurement_unit,
    }
  }
}

#[derive(Debug, FromRow)]
pub struct RecipeRow {
  pub id: i64,
  pub author_id: i64,
  pub name: String,
  pub image: String,
  pub text: String,
  pub cooking_time: i32,
  pub pub_date: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct RecipeSummaryRow {
  pub id: i64,
  pub name: String,
  pub image: String,
  pub cooking_time: i32,
}

impl From<RecipeSummaryRow> for RecipeSummary {
  fn from(row: RecipeSummaryRow) -> Self {
    RecipeSummary {
      id: row.id,
      name: row.name,
      image: row.image,
      cooking_time: row.cooking_time,
    }
  }
}

#[derive(Debug, FromRow)]
pub struct RecipeIngredientRow {
  pub id: i64,
  pub name: String,
  pub measurement_unit: String,
  pub amount: i32,
}

impl From<RecipeIngredientRow> for RecipeIngredient {
  fn from(row: RecipeIngredientRow) -> Self {
    RecipeIngredient {
      id: row.id,
      name: row.name,
      measurement_unit: row.measurement_unit,
      amount: row.amount,
    }
  }
}

#[derive(Debug, FromRow)]
pub struct CartLineRow {
  pub name: String,
  pub measurement_unit: String,
  pub recipe_name: String,
  pub amount: i32,
}

impl From<CartLineRow> for CartLine {
  fn from(row: CartLineRow) -> Self {
    CartLine {
      ingredient: IngredientKey::new(row.name, row.measurement_unit),
      recipe_name: row.recipe_name,
      amount: row.amount,
    }
  }
}
