// core/src/pipeline/mod.rs

//! Named-step request workflows over a shared `ContextData`.

mod context_data;
mod control;
mod definition;
mod error;
mod execution;
mod registry;
mod step;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use definition::{Handler, Pipeline};
pub use error::PipelineError;
pub use registry::Registry;
pub use step::{SkipCondition, StepDef};
