// server/src/pipelines/recipe_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::RecipeWriteCtxData;
use foodgram::recipes::{authorize_modification, load_details, persist_recipe};
use foodgram::validation::{check_references, validate_draft};
use foodgram::{ContextData, Pipeline, PipelineControl, Registry};
use std::sync::Arc;
use tracing::info;

pub fn register_recipe_write_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<RecipeWriteCtxData, AppError>::new(&[
    ("validate_payload", false, None),
    ("check_references", false, None),
    (
      "authorize_author",
      false,
      Some(Arc::new(|ctx: ContextData<RecipeWriteCtxData>| ctx.read().target.is_none())),
    ),
    ("persist_recipe", false, None),
    ("load_recipe_details", false, None),
  ]);

  p.on_root("validate_payload", |ctx_data: ContextData<RecipeWriteCtxData>| {
    Box::pin(async move {
      let draft = ctx_data.read().draft.clone().normalized();
      validate_draft(&draft)?;
      ctx_data.write().draft = draft;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("check_references", |ctx_data: ContextData<RecipeWriteCtxData>| {
    Box::pin(async move {
      let (store, draft) = {
        let guard = ctx_data.read();
        (guard.app_state.store.clone(), guard.draft.clone())
      };
      check_references(&*store, &draft).await?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("authorize_author", |ctx_data: ContextData<RecipeWriteCtxData>| {
    Box::pin(async move {
      let (store, actor, target) = {
        let guard = ctx_data.read();
        (guard.app_state.store.clone(), guard.actor.clone(), guard.target)
      };
      if let Some(recipe_id) = target {
        authorize_modification(&*store, &actor, recipe_id).await?;
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("persist_recipe", |ctx_data: ContextData<RecipeWriteCtxData>| {
    Box::pin(async move {
      let (store, author, target, draft) = {
        let guard = ctx_data.read();
        (guard.app_state.store.clone(), guard.actor.id, guard.target, guard.draft.clone())
      };
      // Updates keep the original author even when an admin edits.
      let recipe_id = persist_recipe(&*store, author, target, &draft).await?;
      info!(recipe_id, created = target.is_none(), "Recipe Write Pipeline: recipe stored.");
      ctx_data.write().recipe_id = Some(recipe_id);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("load_recipe_details", |ctx_data: ContextData<RecipeWriteCtxData>| {
    Box::pin(async move {
      let (store, viewer, recipe_id) = {
        let guard = ctx_data.read();
        (guard.app_state.store.clone(), guard.actor.id, guard.recipe_id)
      };
      let recipe_id = recipe_id.ok_or_else(|| AppError::Internal("Recipe id missing after persist.".to_string()))?;
      let details = load_details(&*store, recipe_id, Some(viewer)).await?;
      ctx_data.write().details = Some(details);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  registry.register_pipeline(p);
}
