// server/src/web/handlers/user_handlers.rs

use super::run_workflow;
use crate::errors::AppError;
use crate::pipelines::contexts::SubscriptionCtxData;
use crate::state::AppState;
use crate::web::extractors::{AuthenticatedUser, MaybeUser};
use crate::web::pagination::{paginated_response, PageParams};
use actix_web::{web, HttpRequest, HttpResponse};
use foodgram::model::UserId;
use foodgram::store::UserStore;
use foodgram::subscription::{list_subscriptions as load_subscriptions, load_author, user_view};
use foodgram::{ContextData, Page, RelationChange};
use serde::Deserialize;
use tracing::instrument;

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionParams {
  pub page: Option<u32>,
  pub limit: Option<u32>,
  pub recipes_limit: Option<u32>,
}

impl SubscriptionParams {
  fn page_params(&self) -> PageParams {
    PageParams {
      page: self.page,
      limit: self.limit,
    }
  }
}

#[instrument(name = "handler::list_users", skip(req, app_state, viewer))]
pub async fn list_users(
  req: HttpRequest,
  app_state: web::Data<AppState>,
  viewer: MaybeUser,
  params: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
  let page_request = params.request(&app_state.config);
  let users = app_state.store.list_users(page_request).await?;
  let mut views = Vec::with_capacity(users.results.len());
  for user in users.results {
    views.push(user_view(&*app_state.store, viewer.id(), user).await?);
  }
  paginated_response(&req, &app_state.config, Page::new(page_request, users.count, views))
}

#[instrument(name = "handler::get_user", skip(app_state, viewer))]
pub async fn get_user(
  app_state: web::Data<AppState>,
  viewer: MaybeUser,
  path: web::Path<UserId>,
) -> Result<HttpResponse, AppError> {
  let user = load_author(&*app_state.store, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(user_view(&*app_state.store, viewer.id(), user).await?))
}

#[instrument(name = "handler::me", skip(app_state, auth_user), fields(user_id = auth_user.0.id))]
pub async fn me(app_state: web::Data<AppState>, auth_user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
  let user = auth_user.0;
  let viewer = Some(user.id);
  Ok(HttpResponse::Ok().json(user_view(&*app_state.store, viewer, user).await?))
}

#[instrument(name = "handler::list_subscriptions", skip(req, app_state, auth_user), fields(user_id = auth_user.0.id))]
pub async fn list_subscriptions(
  req: HttpRequest,
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  params: web::Query<SubscriptionParams>,
) -> Result<HttpResponse, AppError> {
  let page_request = params.page_params().request(&app_state.config);
  let page = load_subscriptions(&*app_state.store, auth_user.0.id, page_request, params.recipes_limit).await?;
  paginated_response(&req, &app_state.config, page)
}

async fn change_subscription(
  app_state: &AppState,
  follower_id: UserId,
  author_id: UserId,
  change: RelationChange,
  recipes_limit: Option<u32>,
) -> Result<SubscriptionCtxData, AppError> {
  let ctx = SubscriptionCtxData {
    app_state: app_state.clone(),
    follower_id,
    author_id,
    change,
    recipes_limit,
    author: None,
    view: None,
  };
  run_workflow(app_state, ContextData::new(ctx)).await
}

#[instrument(name = "handler::subscribe", skip(app_state, auth_user), fields(user_id = auth_user.0.id))]
pub async fn subscribe(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<UserId>,
  params: web::Query<SubscriptionParams>,
) -> Result<HttpResponse, AppError> {
  let done = change_subscription(
    &app_state,
    auth_user.0.id,
    path.into_inner(),
    RelationChange::Add,
    params.recipes_limit,
  )
  .await?;
  let view = done
    .view
    .ok_or_else(|| AppError::Internal("Subscribed, but the author view is unavailable.".to_string()))?;
  Ok(HttpResponse::Created().json(view))
}

#[instrument(name = "handler::unsubscribe", skip(app_state, auth_user), fields(user_id = auth_user.0.id))]
pub async fn unsubscribe(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<UserId>,
) -> Result<HttpResponse, AppError> {
  change_subscription(&app_state, auth_user.0.id, path.into_inner(), RelationChange::Remove, None).await?;
  Ok(HttpResponse::NoContent().finish())
}
