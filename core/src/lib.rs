// core/src/lib.rs

//! Foodgram core: recipes, the favorite/shopping-cart relations, subscriptions
//! and the shopping-list document.
//!
//! The interesting part is the shopping list:
//!  - `shopping::collect_cart_lines` reads every ingredient line of every recipe in a cart.
//!  - `shopping::sum_by_ingredient` totals them per (name, unit).
//!  - `shopping::build_plan` regroups the raw lines under the recipes that contributed them.
//!  - `render::render_shopping_list` lays the plan out and encodes it as PDF.
//!
//! Request orchestration runs through `pipeline`, a small named-step workflow
//! engine with a type-keyed `Registry`. Persistence sits behind the `store` traits.

pub mod error;
pub mod model;
pub mod pagination;
pub mod pipeline;
pub mod recipes;
pub mod relation;
pub mod render;
pub mod shopping;
pub mod store;
pub mod subscription;
pub mod validation;

pub use crate::error::{CoreError, CoreResult};
pub use crate::pagination::{Page, PageRequest};
pub use crate::pipeline::{ContextData, Pipeline, PipelineControl, PipelineError, PipelineResult, Registry};
pub use crate::relation::{RelationChange, RelationKind};
pub use crate::store::{MemoryStore, Store, StoreError};
pub use crate::validation::FieldErrors;
