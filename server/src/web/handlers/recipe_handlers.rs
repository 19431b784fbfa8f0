// server/src/web/handlers/recipe_handlers.rs

use super::run_workflow;
use crate::errors::AppError;
use crate::pipelines::contexts::RecipeWriteCtxData;
use crate::state::AppState;
use crate::web::extractors::{AuthenticatedUser, MaybeUser};
use crate::web::pagination::{paginated_response, PageParams};
use actix_web::{web, HttpRequest, HttpResponse};
use foodgram::model::{RecipeDraft, RecipeId, User};
use foodgram::recipes::{self, RecipeListQuery};
use foodgram::ContextData;
use tracing::{info, instrument};

fn parse_flag(name: &str, value: &str) -> Result<bool, AppError> {
  match value {
    "1" | "true" | "True" => Ok(true),
    "0" | "false" | "False" => Ok(false),
    other => Err(AppError::BadRequest(format!("Invalid value '{}' for '{}'.", other, name))),
  }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, AppError> {
  value
    .parse::<T>()
    .map_err(|_| AppError::BadRequest(format!("Invalid value '{}' for '{}'.", value, name)))
}

/// Splits the raw listing parameters; `tags` may repeat.
pub fn parse_list_params(pairs: &[(String, String)]) -> Result<(RecipeListQuery, PageParams), AppError> {
  let mut query = RecipeListQuery::default();
  let mut page = PageParams::default();
  for (key, value) in pairs {
    match key.as_str() {
      "author" => query.author = Some(parse_number(key, value)?),
      "tags" => query.tags.push(value.clone()),
      "is_favorited" => query.is_favorited = parse_flag(key, value)?,
      "is_in_shopping_cart" => query.is_in_shopping_cart = parse_flag(key, value)?,
      "page" => page.page = Some(parse_number(key, value)?),
      "limit" => page.limit = Some(parse_number(key, value)?),
      _ => {}
    }
  }
  Ok((query, page))
}

#[instrument(name = "handler::list_recipes", skip(req, app_state, viewer, params))]
pub async fn list_recipes(
  req: HttpRequest,
  app_state: web::Data<AppState>,
  viewer: MaybeUser,
  params: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
  let (query, page) = parse_list_params(&params)?;
  let page_request = page.request(&app_state.config);
  let page = recipes::list_recipes(&*app_state.store, query, viewer.id(), page_request).await?;
  paginated_response(&req, &app_state.config, page)
}

#[instrument(name = "handler::get_recipe", skip(app_state, viewer))]
pub async fn get_recipe(
  app_state: web::Data<AppState>,
  viewer: MaybeUser,
  path: web::Path<RecipeId>,
) -> Result<HttpResponse, AppError> {
  let details = recipes::load_details(&*app_state.store, path.into_inner(), viewer.id()).await?;
  Ok(HttpResponse::Ok().json(details))
}

async fn write_recipe(
  app_state: &AppState,
  actor: User,
  target: Option<RecipeId>,
  draft: RecipeDraft,
) -> Result<RecipeWriteCtxData, AppError> {
  let ctx = RecipeWriteCtxData {
    app_state: app_state.clone(),
    actor,
    target,
    draft,
    recipe_id: None,
    details: None,
  };
  run_workflow(app_state, ContextData::new(ctx)).await
}

#[instrument(
  name = "handler::create_recipe",
  skip(app_state, auth_user, payload),
  fields(user_id = auth_user.0.id, recipe_name = %payload.name)
)]
pub async fn create_recipe(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<RecipeDraft>,
) -> Result<HttpResponse, AppError> {
  let done = write_recipe(&app_state, auth_user.0, None, payload.into_inner()).await?;
  let details = done
    .details
    .ok_or_else(|| AppError::Internal("Recipe created, but its details are unavailable.".to_string()))?;
  info!(recipe_id = details.id, "Recipe created.");
  Ok(HttpResponse::Created().json(details))
}

#[instrument(
  name = "handler::update_recipe",
  skip(app_state, auth_user, payload),
  fields(user_id = auth_user.0.id)
)]
pub async fn update_recipe(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<RecipeId>,
  payload: web::Json<RecipeDraft>,
) -> Result<HttpResponse, AppError> {
  let done = write_recipe(&app_state, auth_user.0, Some(path.into_inner()), payload.into_inner()).await?;
  let details = done
    .details
    .ok_or_else(|| AppError::Internal("Recipe updated, but its details are unavailable.".to_string()))?;
  Ok(HttpResponse::Ok().json(details))
}

#[instrument(name = "handler::delete_recipe", skip(app_state, auth_user), fields(user_id = auth_user.0.id))]
pub async fn delete_recipe(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<RecipeId>,
) -> Result<HttpResponse, AppError> {
  recipes::delete_recipe(&*app_state.store, &auth_user.0, path.into_inner()).await?;
  Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
  }

  #[test]
  fn repeated_tags_accumulate() {
    let (query, page) = parse_list_params(&pairs(&[
      ("tags", "breakfast"),
      ("tags", "dinner"),
      ("is_favorited", "1"),
      ("page", "2"),
    ]))
    .unwrap();
    assert_eq!(query.tags, vec!["breakfast", "dinner"]);
    assert!(query.is_favorited);
    assert!(!query.is_in_shopping_cart);
    assert_eq!(page.page, Some(2));
  }

  #[test]
  fn malformed_values_are_bad_requests() {
    assert!(matches!(
      parse_list_params(&pairs(&[("author", "me")])),
      Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
      parse_list_params(&pairs(&[("is_in_shopping_cart", "yes")])),
      Err(AppError::BadRequest(_))
    ));
  }
}
