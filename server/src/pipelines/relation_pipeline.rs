// server/src/pipelines/relation_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::RelationCtxData;
use foodgram::relation::{apply_relation_change, ensure_recipe_exists};
use foodgram::store::RecipeStore;
use foodgram::{ContextData, CoreError, Pipeline, PipelineControl, Registry, RelationChange};
use std::sync::Arc;
use tracing::info;

pub fn register_relation_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<RelationCtxData, AppError>::new(&[
    ("ensure_recipe_exists", false, None),
    ("apply_relation_change", false, None),
    (
      "load_recipe_summary",
      false,
      Some(Arc::new(|ctx: ContextData<RelationCtxData>| {
        ctx.read().change == RelationChange::Remove
      })),
    ),
  ]);

  p.on_root("ensure_recipe_exists", |ctx_data: ContextData<RelationCtxData>| {
    Box::pin(async move {
      let (store, recipe_id) = {
        let guard = ctx_data.read();
        (guard.app_state.store.clone(), guard.recipe_id)
      };
      ensure_recipe_exists(&*store, recipe_id).await?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("apply_relation_change", |ctx_data: ContextData<RelationCtxData>| {
    Box::pin(async move {
      let (store, kind, change, user_id, recipe_id) = {
        let guard = ctx_data.read();
        (
          guard.app_state.store.clone(),
          guard.kind,
          guard.change,
          guard.user_id,
          guard.recipe_id,
        )
      };
      apply_relation_change(&*store, kind, change, user_id, recipe_id).await?;
      info!(relation = kind.as_str(), ?change, user_id, recipe_id, "Relation Pipeline: state changed.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("load_recipe_summary", |ctx_data: ContextData<RelationCtxData>| {
    Box::pin(async move {
      let (store, recipe_id) = {
        let guard = ctx_data.read();
        (guard.app_state.store.clone(), guard.recipe_id)
      };
      let summary = store
        .recipe_summary(recipe_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Recipe", recipe_id))?;
      ctx_data.write().summary = Some(summary);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  registry.register_pipeline(p);
}
