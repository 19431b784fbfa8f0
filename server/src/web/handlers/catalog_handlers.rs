// server/src/web/handlers/catalog_handlers.rs

use crate::errors::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use foodgram::model::{IngredientId, TagId};
use foodgram::store::CatalogStore;
use foodgram::CoreError;
use serde::Deserialize;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct IngredientSearch {
  pub name: Option<String>,
}

#[instrument(name = "handler::list_tags", skip(app_state))]
pub async fn list_tags(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(app_state.store.list_tags().await?))
}

#[instrument(name = "handler::get_tag", skip(app_state))]
pub async fn get_tag(app_state: web::Data<AppState>, path: web::Path<TagId>) -> Result<HttpResponse, AppError> {
  let tag_id = path.into_inner();
  let tag = app_state
    .store
    .get_tag(tag_id)
    .await?
    .ok_or_else(|| CoreError::not_found("Tag", tag_id))?;
  Ok(HttpResponse::Ok().json(tag))
}

#[instrument(name = "handler::list_ingredients", skip(app_state))]
pub async fn list_ingredients(
  app_state: web::Data<AppState>,
  query: web::Query<IngredientSearch>,
) -> Result<HttpResponse, AppError> {
  let prefix = query.name.as_deref().map(str::trim).filter(|p| !p.is_empty());
  Ok(HttpResponse::Ok().json(app_state.store.search_ingredients(prefix).await?))
}

#[instrument(name = "handler::get_ingredient", skip(app_state))]
pub async fn get_ingredient(
  app_state: web::Data<AppState>,
  path: web::Path<IngredientId>,
) -> Result<HttpResponse, AppError> {
  let ingredient_id = path.into_inner();
  let ingredient = app_state
    .store
    .get_ingredient(ingredient_id)
    .await?
    .ok_or_else(|| CoreError::not_found("Ingredient", ingredient_id))?;
  Ok(HttpResponse::Ok().json(ingredient))
}
