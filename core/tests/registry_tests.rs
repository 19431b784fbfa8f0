// core/tests/registry_tests.rs
mod common;

use common::*;
use foodgram::{ContextData, CoreError, Pipeline, PipelineControl, PipelineError, PipelineResult, Registry};

#[derive(Debug, thiserror::Error)]
enum AppError {
  #[error(transparent)]
  Core(#[from] CoreError),
  #[error(transparent)]
  Pipeline(#[from] PipelineError),
}

#[derive(Clone, Debug, Default)]
struct FavoriteCtx {
  recipe: i64,
  done: bool,
}

#[derive(Clone, Debug, Default)]
struct ListCtx {
  lines: usize,
}

#[tokio::test]
async fn dispatches_by_context_type() {
  setup_tracing();
  let registry = Registry::<AppError>::new();

  let mut favorites = Pipeline::<FavoriteCtx, AppError>::new(&[("apply_relation_change", false, None)]);
  favorites.on_root("apply_relation_change", |ctx: ContextData<FavoriteCtx>| async move {
    ctx.write().done = true;
    Ok::<_, AppError>(PipelineControl::Continue)
  });
  registry.register_pipeline(favorites);

  let mut list = Pipeline::<ListCtx, AppError>::new(&[("collect_cart_lines", false, None)]);
  list.on_root("collect_cart_lines", |ctx: ContextData<ListCtx>| async move {
    ctx.write().lines = 4;
    Ok::<_, AppError>(PipelineControl::Continue)
  });
  registry.register_pipeline(list);

  assert!(registry.is_registered::<FavoriteCtx>());
  assert!(registry.is_registered::<ListCtx>());

  let fav = ContextData::new(FavoriteCtx {
    recipe: 7,
    ..Default::default()
  });
  assert_eq!(registry.run(fav.clone()).await.unwrap(), PipelineResult::Completed);
  assert!(fav.read().done);
  assert_eq!(fav.read().recipe, 7);

  let list = ContextData::new(ListCtx::default());
  registry.run(list.clone()).await.unwrap();
  assert_eq!(list.read().lines, 4);
}

#[tokio::test]
async fn unregistered_context_is_reported() {
  setup_tracing();
  let registry = Registry::<AppError>::new();

  let err = registry.run(ContextData::new(ListCtx::default())).await.unwrap_err();

  match err {
    AppError::Pipeline(PipelineError::NotRegistered { type_name }) => assert!(type_name.contains("ListCtx")),
    other => panic!("Expected NotRegistered, got {:?}", other),
  }
}

#[tokio::test]
async fn handler_errors_reach_the_caller_unchanged() {
  setup_tracing();
  let registry = Registry::<AppError>::new();
  let mut pipeline = Pipeline::<FavoriteCtx, AppError>::new(&[("ensure_recipe_exists", false, None)]);
  pipeline.on_root("ensure_recipe_exists", |ctx: ContextData<FavoriteCtx>| async move {
    let recipe = ctx.read().recipe;
    Err::<PipelineControl, _>(CoreError::not_found("Recipe", recipe))
  });
  registry.register_pipeline(pipeline);

  let err = registry
    .run(ContextData::new(FavoriteCtx {
      recipe: 42,
      ..Default::default()
    }))
    .await
    .unwrap_err();

  assert!(matches!(err, AppError::Core(CoreError::NotFound { id: 42, .. })));
}

#[tokio::test]
async fn default_registry_uses_pipeline_error() {
  setup_tracing();
  let registry: Registry = Registry::default();
  let mut pipeline = Pipeline::<ListCtx, PipelineError>::new(&[("count", false, None)]);
  pipeline.on_root("count", |ctx: ContextData<ListCtx>| async move {
    ctx.write().lines += 1;
    Ok::<_, PipelineError>(PipelineControl::Continue)
  });
  registry.register_pipeline(pipeline);

  let ctx = ContextData::new(ListCtx::default());
  registry.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().lines, 1);
}
