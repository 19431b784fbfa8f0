// server/src/pipelines/subscription_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::SubscriptionCtxData;
use foodgram::subscription::{apply_subscription_change, load_author, subscription_view};
use foodgram::{ContextData, Pipeline, PipelineControl, Registry, RelationChange};
use std::sync::Arc;
use tracing::info;

pub fn register_subscription_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<SubscriptionCtxData, AppError>::new(&[
    ("ensure_author_exists", false, None),
    ("apply_subscription_change", false, None),
    (
      "load_subscription_view",
      false,
      Some(Arc::new(|ctx: ContextData<SubscriptionCtxData>| {
        ctx.read().change == RelationChange::Remove
      })),
    ),
  ]);

  p.on_root("ensure_author_exists", |ctx_data: ContextData<SubscriptionCtxData>| {
    Box::pin(async move {
      let (store, author_id) = {
        let guard = ctx_data.read();
        (guard.app_state.store.clone(), guard.author_id)
      };
      let author = load_author(&*store, author_id).await?;
      ctx_data.write().author = Some(author);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("apply_subscription_change", |ctx_data: ContextData<SubscriptionCtxData>| {
    Box::pin(async move {
      let (store, change, follower_id, author_id) = {
        let guard = ctx_data.read();
        (guard.app_state.store.clone(), guard.change, guard.follower_id, guard.author_id)
      };
      apply_subscription_change(&*store, change, follower_id, author_id).await?;
      info!(?change, follower_id, author_id, "Subscription Pipeline: state changed.");
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("load_subscription_view", |ctx_data: ContextData<SubscriptionCtxData>| {
    Box::pin(async move {
      let (store, follower_id, author, recipes_limit) = {
        let guard = ctx_data.read();
        (
          guard.app_state.store.clone(),
          guard.follower_id,
          guard.author.clone(),
          guard.recipes_limit,
        )
      };
      let author = author.ok_or_else(|| AppError::Internal("Author missing after lookup.".to_string()))?;
      let view = subscription_view(&*store, follower_id, author, recipes_limit).await?;
      ctx_data.write().view = Some(view);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  registry.register_pipeline(p);
}
