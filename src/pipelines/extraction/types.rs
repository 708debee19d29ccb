use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;
use crate::filtering::Segment;

/// Counters for one archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// records successfully framed
    pub records: usize,
    /// response records with a valid HTTP message
    pub responses: usize,
    /// responses that passed the document threshold
    pub documents: usize,
    /// responses decoded without a usable declared charset
    pub decode_fallbacks: usize,
    /// responses with replacement characters
    pub lossy_decodes: usize,
    pub segments: usize,
}

/// Segments of one archive, in stream order.
///
/// `stopped` holds the error that ended the record sequence early, if any.
#[derive(Debug)]
pub struct Extraction {
    pub segments: Vec<Segment>,
    pub stats: ExtractionStats,
    pub stopped: Option<Error>,
}

impl Extraction {
    pub fn is_complete(&self) -> bool {
        self.stopped.is_none()
    }
}

#[derive(Debug)]
pub enum ArchiveOutcome {
    /// Every record was read and the output was written.
    Complete,
    /// Reading stopped on the error, what was extracted before was written.
    Partial(Error),
    /// Nothing was written.
    Failed(Error),
}

impl ArchiveOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Partial(_) => "partial",
            Self::Failed(_) => "failed",
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Complete => None,
            Self::Partial(e) | Self::Failed(e) => Some(e),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// What happened to one archive.
#[derive(Debug)]
pub struct ArchiveReport {
    archive: String,
    outcome: ArchiveOutcome,
    output: Option<PathBuf>,
    stats: ExtractionStats,
    input_bytes: u64,
    output_bytes: u64,
    elapsed: Duration,
}

impl ArchiveReport {
    pub fn new(
        archive: String,
        outcome: ArchiveOutcome,
        output: Option<PathBuf>,
        stats: ExtractionStats,
        input_bytes: u64,
        output_bytes: u64,
        elapsed: Duration,
    ) -> Self {
        Self {
            archive,
            outcome,
            output,
            stats,
            input_bytes,
            output_bytes,
            elapsed,
        }
    }

    /// Report for an archive that could not be processed at all.
    pub fn failed(archive: String, error: Error, elapsed: Duration) -> Self {
        Self::new(
            archive,
            ArchiveOutcome::Failed(error),
            None,
            ExtractionStats::default(),
            0,
            0,
            elapsed,
        )
    }

    /// Archive identifier, as found in the paths file.
    pub fn archive(&self) -> &str {
        &self.archive
    }

    pub fn outcome(&self) -> &ArchiveOutcome {
        &self.outcome
    }

    /// Path of the text file, when one was written.
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }

    /// Bytes read from the source (compressed size for gzip archives).
    pub fn input_bytes(&self) -> u64 {
        self.input_bytes
    }

    pub fn output_bytes(&self) -> u64 {
        self.output_bytes
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
