//! Malayalam extraction.
mod extractor;
mod pipeline;
mod types;

pub use extractor::Extractor;
pub use pipeline::MalayalamPipeline;
pub use types::{ArchiveOutcome, ArchiveReport, Extraction, ExtractionStats};
