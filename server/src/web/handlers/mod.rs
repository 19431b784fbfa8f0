// server/src/web/handlers/mod.rs

pub mod catalog_handlers;
pub mod recipe_handlers;
pub mod relation_handlers;
pub mod user_handlers;

use crate::errors::AppError;
use crate::state::AppState;
use foodgram::{ContextData, PipelineResult};

/// Runs the workflow registered for `T` and hands back the final context.
pub(crate) async fn run_workflow<T>(app_state: &AppState, ctx_data: ContextData<T>) -> Result<T, AppError>
where
  T: Clone + Send + Sync + 'static,
{
  match app_state.workflows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => Ok(match ctx_data.try_into_inner() {
      Ok(data) => data,
      Err(shared) => shared.read().clone(),
    }),
    PipelineResult::Stopped => Err(AppError::PipelineHaltedByHandler),
  }
}
