// server/src/pipelines/mod.rs

//! Request workflows, registered once at startup and dispatched by context type.

use crate::errors::AppError;
use foodgram::Registry;

pub mod contexts;

pub mod recipe_pipeline;
pub mod relation_pipeline;
pub mod shopping_list_pipeline;
pub mod subscription_pipeline;

pub fn register_all_pipelines(registry: &Registry<AppError>) {
  tracing::info!("Registering request pipelines...");

  shopping_list_pipeline::register_shopping_list_pipeline(registry);
  relation_pipeline::register_relation_pipeline(registry);
  recipe_pipeline::register_recipe_write_pipeline(registry);
  subscription_pipeline::register_subscription_pipeline(registry);

  tracing::info!("All request pipelines registered.");
}
