// server/src/web/extractors.rs

//! Caller identity. An upstream auth layer authenticates the request and passes
//! the user id in `X-User-Id`; this layer only resolves it to a stored user.

use crate::errors::AppError;
use crate::state::AppState;
use actix_web::{web, FromRequest, HttpRequest};
use foodgram::model::{User, UserId};
use foodgram::store::UserStore;
use futures_util::future::LocalBoxFuture;
use tracing::warn;

pub const USER_ID_HEADER: &str = "X-User-Id";

fn header_user_id(req: &HttpRequest) -> Result<Option<UserId>, AppError> {
  let Some(value) = req.headers().get(USER_ID_HEADER) else {
    return Ok(None);
  };
  value
    .to_str()
    .ok()
    .and_then(|raw| raw.trim().parse::<UserId>().ok())
    .map(Some)
    .ok_or_else(|| {
      warn!("Identity extractor: malformed {} header.", USER_ID_HEADER);
      AppError::Unauthorized(format!("Malformed {} header.", USER_ID_HEADER))
    })
}

async fn resolve(state: Option<web::Data<AppState>>, user_id: Option<UserId>) -> Result<Option<User>, AppError> {
  let Some(user_id) = user_id else {
    return Ok(None);
  };
  let state = state.ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;
  match state.store.get_user(user_id).await? {
    Some(user) => Ok(Some(user)),
    None => {
      warn!(user_id, "Identity extractor: unknown user.");
      Err(AppError::Unauthorized("Unknown user.".to_string()))
    }
  }
}

/// An identified caller. Missing or unknown identity is a 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let user_id = header_user_id(req);
    Box::pin(async move {
      match resolve(state, user_id?).await? {
        Some(user) => Ok(AuthenticatedUser(user)),
        None => Err(AppError::Unauthorized("Authentication credentials were not provided.".to_string())),
      }
    })
  }
}

/// Anonymous callers are allowed; a header naming an unknown user is still a 401.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
  pub fn id(&self) -> Option<UserId> {
    self.0.as_ref().map(|u| u.id)
  }
}

impl FromRequest for MaybeUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let user_id = header_user_id(req);
    Box::pin(async move { Ok(MaybeUser(resolve(state, user_id?).await?)) })
  }
}
