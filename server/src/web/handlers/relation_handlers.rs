// server/src/web/handlers/relation_handlers.rs

use super::run_workflow;
use crate::errors::AppError;
use crate::pipelines::contexts::{RelationCtxData, ShoppingListCtxData};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use foodgram::model::RecipeId;
use foodgram::{ContextData, RelationChange, RelationKind};
use tracing::{info, instrument};

/// `attachment` disposition naming the file after `username`; quoting is
/// left to the header type.
fn shopping_list_disposition(username: &str) -> ContentDisposition {
  ContentDisposition {
    disposition: DispositionType::Attachment,
    parameters: vec![DispositionParam::Filename(format!("{}_shopping_list.pdf", username))],
  }
}

async fn change_relation(
  app_state: &AppState,
  auth_user: AuthenticatedUser,
  recipe_id: RecipeId,
  kind: RelationKind,
  change: RelationChange,
) -> Result<HttpResponse, AppError> {
  let ctx = RelationCtxData {
    app_state: app_state.clone(),
    user_id: auth_user.0.id,
    recipe_id,
    kind,
    change,
    summary: None,
  };
  let done = run_workflow(app_state, ContextData::new(ctx)).await?;
  match change {
    RelationChange::Add => {
      let summary = done
        .summary
        .ok_or_else(|| AppError::Internal("Relation added, but the recipe is unavailable.".to_string()))?;
      Ok(HttpResponse::Created().json(summary))
    }
    RelationChange::Remove => Ok(HttpResponse::NoContent().finish()),
  }
}

#[instrument(name = "handler::add_favorite", skip(app_state, auth_user), fields(user_id = auth_user.0.id))]
pub async fn add_favorite(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<RecipeId>,
) -> Result<HttpResponse, AppError> {
  change_relation(&app_state, auth_user, path.into_inner(), RelationKind::Favorite, RelationChange::Add).await
}

#[instrument(name = "handler::remove_favorite", skip(app_state, auth_user), fields(user_id = auth_user.0.id))]
pub async fn remove_favorite(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<RecipeId>,
) -> Result<HttpResponse, AppError> {
  change_relation(&app_state, auth_user, path.into_inner(), RelationKind::Favorite, RelationChange::Remove).await
}

#[instrument(name = "handler::add_to_shopping_cart", skip(app_state, auth_user), fields(user_id = auth_user.0.id))]
pub async fn add_to_shopping_cart(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<RecipeId>,
) -> Result<HttpResponse, AppError> {
  change_relation(&app_state, auth_user, path.into_inner(), RelationKind::ShoppingCart, RelationChange::Add).await
}

#[instrument(
  name = "handler::remove_from_shopping_cart",
  skip(app_state, auth_user),
  fields(user_id = auth_user.0.id)
)]
pub async fn remove_from_shopping_cart(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<RecipeId>,
) -> Result<HttpResponse, AppError> {
  change_relation(
    &app_state,
    auth_user,
    path.into_inner(),
    RelationKind::ShoppingCart,
    RelationChange::Remove,
  )
  .await
}

#[instrument(name = "handler::download_shopping_cart", skip(app_state, auth_user), fields(user_id = auth_user.0.id))]
pub async fn download_shopping_cart(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = auth_user.0;
  let ctx = ShoppingListCtxData::new(app_state.get_ref().clone(), user.id, Utc::now().date_naive());
  let done = run_workflow(&app_state, ContextData::new(ctx)).await?;
  let document = done
    .document
    .ok_or_else(|| AppError::Internal("Shopping list completed without a document.".to_string()))?;

  info!(bytes = document.len(), "Shopping list served.");
  Ok(
    HttpResponse::Ok()
      .content_type("application/pdf")
      .insert_header(shopping_list_disposition(&user.username))
      .body(document),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::http::header::TryIntoHeaderValue;

  #[test]
  fn plain_username_gives_the_expected_header() {
    let value = shopping_list_disposition("bob").try_into_value().unwrap();
    assert_eq!(value, "attachment; filename=\"bob_shopping_list.pdf\"");
  }

  #[test]
  fn quotes_and_backslashes_in_username_are_escaped() {
    let value = shopping_list_disposition("a\"b\\c").try_into_value().unwrap();
    let parsed = ContentDisposition::from_raw(&value).unwrap();
    assert!(parsed.is_attachment());
    assert_eq!(parsed.get_filename(), Some("a\"b\\c_shopping_list.pdf"));
    assert_eq!(parsed.parameters.len(), 1);
  }
}
