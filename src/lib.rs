//! Malayalam text extraction from Common Crawl WARC archives.
//!
//! The [pipelines::MalayalamPipeline] drives the whole process. Its stages can be used on their own:
//!
//! - [sources]: archive bytes, from disk or HTTP,
//! - [shard]: gzip detection and WARC record framing,
//! - [payload]: HTTP response parsing and charset decoding,
//! - [transformers]: markup stripping,
//! - [filtering]: Malayalam segment extraction and page threshold,
//! - [io]: output files and CSV reports.
pub mod config;
pub mod error;
pub mod filtering;
pub mod io;
pub mod payload;
pub mod pipelines;
pub mod shard;
pub mod sources;
pub mod transformers;
