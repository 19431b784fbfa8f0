// server/src/pipelines/shopping_list_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::ShoppingListCtxData;
use foodgram::render::{render_shopping_list, ListHeader};
use foodgram::shopping::{build_plan, collect_cart_lines, sum_by_ingredient};
use foodgram::subscription::load_author;
use foodgram::{ContextData, Pipeline, PipelineControl, Registry};
use tracing::info;

pub fn register_shopping_list_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<ShoppingListCtxData, AppError>::new(&[
    ("load_user", false, None),
    ("collect_cart_lines", false, None),
    ("aggregate_totals", false, None),
    ("build_rendering_plan", false, None),
    ("render_document", false, None),
  ]);

  p.on_root("load_user", |ctx_data: ContextData<ShoppingListCtxData>| {
    Box::pin(async move {
      let (store, user_id) = {
        let guard = ctx_data.read();
        (guard.app_state.store.clone(), guard.user_id)
      };
      let user = load_author(&*store, user_id).await?;
      ctx_data.write().user = Some(user);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Fails with EmptyCart, which ends the run before anything is rendered.
  p.on_root("collect_cart_lines", |ctx_data: ContextData<ShoppingListCtxData>| {
    Box::pin(async move {
      let (store, user_id) = {
        let guard = ctx_data.read();
        (guard.app_state.store.clone(), guard.user_id)
      };
      let lines = collect_cart_lines(&*store, user_id).await?;
      info!(user_id, lines = lines.len(), "Shopping List Pipeline: cart collected.");
      ctx_data.write().lines = lines;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("aggregate_totals", |ctx_data: ContextData<ShoppingListCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let totals = sum_by_ingredient(&guard.lines);
      guard.totals = totals;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("build_rendering_plan", |ctx_data: ContextData<ShoppingListCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let plan = build_plan(&guard.lines, &guard.totals);
      guard.plan = Some(plan);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("render_document", |ctx_data: ContextData<ShoppingListCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let (Some(user), Some(plan)) = (guard.user.as_ref(), guard.plan.as_ref()) else {
        return Err(AppError::Internal(
          "Shopping list rendering reached without a user or a plan.".to_string(),
        ));
      };
      let header = ListHeader {
        full_name: user.full_name(),
        date: guard.today,
      };
      let document = render_shopping_list(&header, plan)?;
      info!(bytes = document.len(), "Shopping List Pipeline: document rendered.");
      guard.document = Some(document);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  registry.register_pipeline(p);
}
