//! Pipelines.
//!
//! The module provides a light [pipeline::Pipeline] trait, the [Document] that flows through
//! transformers and filters, and the [extraction] pipeline.
mod document;
pub mod extraction;
#[allow(clippy::module_inception)]
pub mod pipeline;

pub use document::Document;
pub use extraction::MalayalamPipeline;
pub use pipeline::Pipeline;
