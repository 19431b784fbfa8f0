// server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use foodgram::{CoreError, PipelineError, StoreError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Core(#[from] CoreError),

  #[error("Authentication required: {0}")]
  Unauthorized(String),

  #[error("Bad request: {0}")]
  BadRequest(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: PipelineError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),

  /// A pipeline returned `Stopped` where the handler needed it to complete.
  #[error("Pipeline execution was halted by a handler.")]
  PipelineHaltedByHandler,
}

impl From<StoreError> for AppError {
  fn from(err: StoreError) -> Self {
    AppError::Core(CoreError::Store(err))
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(other) => AppError::Internal(other.to_string()),
    }
  }
}

impl AppError {
  fn core_status(err: &CoreError) -> StatusCode {
    match err {
      CoreError::EmptyCart
      | CoreError::DuplicateRelation { .. }
      | CoreError::DuplicateSubscription { .. }
      | CoreError::SelfSubscription
      | CoreError::Validation(_) => StatusCode::BAD_REQUEST,
      CoreError::MissingRelation { .. } | CoreError::MissingSubscription { .. } | CoreError::NotFound { .. } => {
        StatusCode::NOT_FOUND
      }
      CoreError::Forbidden { .. } => StatusCode::FORBIDDEN,
      CoreError::Store(_) | CoreError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Core(err) => Self::core_status(err),
      AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Workflow { .. }
      | AppError::Internal(_)
      | AppError::PipelineHaltedByHandler => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::info!(application_error = %self, status = status.as_u16(), "Request rejected");
    }
    let mut response = HttpResponse::build(status);
    match self {
      AppError::Core(CoreError::Validation(fields)) => response.json(fields),
      AppError::Core(CoreError::Store(_)) | AppError::Sqlx(_) => {
        response.json(json!({"errors": "Database operation failed"}))
      }
      AppError::Core(CoreError::Render(_)) => response.json(json!({"errors": "Could not render the document"})),
      AppError::Workflow { .. } | AppError::Config(_) | AppError::Internal(_) | AppError::PipelineHaltedByHandler => {
        response.json(json!({"errors": "An internal error occurred"}))
      }
      other => response.json(json!({"errors": other.to_string()})),
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use foodgram::{FieldErrors, RelationKind};

  #[test]
  fn relation_errors_map_to_client_statuses() {
    let dup = AppError::from(CoreError::DuplicateRelation {
      kind: RelationKind::ShoppingCart,
      recipe_id: 1,
    });
    let missing = AppError::from(CoreError::MissingRelation {
      kind: RelationKind::Favorite,
      recipe_id: 1,
    });
    assert_eq!(dup.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(AppError::from(CoreError::EmptyCart).status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
      AppError::from(CoreError::Forbidden { recipe_id: 3 }).status_code(),
      StatusCode::FORBIDDEN
    );
  }

  #[test]
  fn machinery_failures_are_server_errors() {
    let err = AppError::from(PipelineError::NotRegistered {
      type_name: "Ctx".into(),
    });
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let err = AppError::from(StoreError::Conflict("dup".into()));
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn validation_is_bad_request() {
    let err = AppError::from(CoreError::Validation(FieldErrors::single("name", "required")));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
  }
}
