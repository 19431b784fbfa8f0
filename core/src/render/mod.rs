// core/src/render/mod.rs

//! Shopping-list document rendering. Layout is a plain value; `pdf` only
//! encodes what `layout` positioned.

mod font;
mod layout;
mod pdf;

pub use layout::{layout, ListHeader, PageLayout, PlacedLine, BODY_FONT_SIZE, BOTTOM_MARGIN, PAGE_TOP};
pub use pdf::encode_pdf;

use crate::error::CoreResult;
use crate::shopping::ShoppingPlan;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum RenderError {
  #[error("Embedded font could not be parsed: {0}")]
  Font(#[from] ttf_parser::FaceParsingError),

  #[error("PDF encoding failed: {0}")]
  Pdf(#[from] lopdf::Error),
}

/// Lays out and encodes the shopping list for `header.full_name`.
#[instrument(name = "render::shopping_list", skip_all, fields(blocks = plan.blocks.len()))]
pub fn render_shopping_list(header: &ListHeader, plan: &ShoppingPlan) -> CoreResult<Vec<u8>> {
  let pages = layout(header, plan);
  let bytes = encode_pdf(&pages)?;
  debug!(pages = pages.len(), bytes = bytes.len(), "Shopping list rendered.");
  Ok(bytes)
}
