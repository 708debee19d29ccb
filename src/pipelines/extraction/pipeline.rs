//! Malayalam extraction pipeline.
//!
//! Each archive listed in the paths file is processed end to end:
//!
//! 1. its bytes are fetched from the [ByteSource] (and decompressed if needed),
//! 1. records are read one at a time and turned into segments by the [Extractor],
//! 1. segments are written to `<output_dir>/<archive>.txt`.
//!
//! Failures are local to an archive: they end up in the archive's [ArchiveReport]
//! and in the CSV report, and the next archive is processed.
use std::sync::atomic::Ordering;
use std::time::Instant;

use itertools::Itertools;
use log::{debug, error, info, warn};
use rayon::prelude::*;

use super::extractor::Extractor;
use super::types::{ArchiveOutcome, ArchiveReport, Extraction};
use crate::config::{ExtractorConfig, MalformedPolicy};
use crate::error::Error;
use crate::io::writer::output_name;
use crate::io::{ReportWriter, TextWriter};
use crate::pipelines::pipeline::Pipeline;
use crate::shard::open_stream;
use crate::sources::{ByteSource, CountingReader};

pub struct MalayalamPipeline {
    paths: Vec<String>,
    source: Box<dyn ByteSource>,
    config: ExtractorConfig,
}

impl MalayalamPipeline {
    pub fn new(paths: Vec<String>, source: Box<dyn ByteSource>, config: ExtractorConfig) -> Self {
        Self {
            paths,
            source,
            config,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Process a single archive.
    ///
    /// Never fails, errors are stored in the returned report.
    /// A failed archive has no output file, even one left by a previous run.
    pub fn process_archive(
        &self,
        extractor: &Extractor,
        writer: &TextWriter,
        archive: &str,
    ) -> ArchiveReport {
        let report = self.extract_archive(extractor, writer, archive);
        if report.outcome().is_failed() {
            writer.remove(archive);
        }
        report
    }

    /// Output names shared by several archives of the paths list.
    pub fn duplicate_outputs(&self) -> Vec<String> {
        self.paths
            .iter()
            .map(|archive| output_name(archive))
            .duplicates()
            .collect()
    }

    fn extract_archive(
        &self,
        extractor: &Extractor,
        writer: &TextWriter,
        archive: &str,
    ) -> ArchiveReport {
        info!("working on archive: {}", archive);
        let start = Instant::now();

        let (stream, counter) = match self.source.open(archive).and_then(|reader| {
            let reader = CountingReader::new(reader);
            let counter = reader.counter();
            Ok((open_stream(reader)?, counter))
        }) {
            Ok(opened) => opened,
            Err(e) => {
                error!("could not open {}: {}", archive, e);
                return ArchiveReport::failed(archive.to_string(), e, start.elapsed());
            }
        };

        let Extraction {
            segments,
            stats,
            stopped,
        } = extractor.extract(stream);
        let input_bytes = counter.load(Ordering::Relaxed);

        let outcome = match (stopped, self.config.on_malformed) {
            (None, _) => ArchiveOutcome::Complete,
            (Some(e), MalformedPolicy::KeepPartial) => {
                warn!("{}: keeping {} segments read before: {}", archive, segments.len(), e);
                ArchiveOutcome::Partial(e)
            }
            (Some(e), MalformedPolicy::FailArchive) => {
                error!("{}: {}", archive, e);
                return ArchiveReport::new(
                    archive.to_string(),
                    ArchiveOutcome::Failed(e),
                    None,
                    stats,
                    input_bytes,
                    0,
                    start.elapsed(),
                );
            }
        };

        match writer.write(archive, &segments) {
            Ok((path, output_bytes)) => {
                info!(
                    "{}: {} segments from {} documents ({} records)",
                    archive, stats.segments, stats.documents, stats.records
                );
                ArchiveReport::new(
                    archive.to_string(),
                    outcome,
                    Some(path),
                    stats,
                    input_bytes,
                    output_bytes,
                    start.elapsed(),
                )
            }
            Err(e) => {
                error!("{}: {}", archive, e);
                ArchiveReport::new(
                    archive.to_string(),
                    ArchiveOutcome::Failed(e),
                    None,
                    stats,
                    input_bytes,
                    0,
                    start.elapsed(),
                )
            }
        }
    }

    fn process_all(&self, extractor: &Extractor, writer: &TextWriter) -> Result<Vec<ArchiveReport>, Error> {
        let workers = self.config.workers;
        if workers > 1 {
            debug!("using {} workers", workers);
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|e| Error::Custom(format!("could not build thread pool: {}", e)))?;

            // collect keeps input order
            Ok(pool.install(|| {
                self.paths
                    .par_iter()
                    .map(|archive| self.process_archive(extractor, writer, archive))
                    .collect()
            }))
        } else {
            Ok(self
                .paths
                .iter()
                .map(|archive| self.process_archive(extractor, writer, archive))
                .collect())
        }
    }
}

impl Pipeline<Vec<ArchiveReport>> for MalayalamPipeline {
    fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn run(&self) -> Result<Vec<ArchiveReport>, Error> {
        self.config.validate()?;
        let extractor = Extractor::new(&self.config)?;
        let writer = TextWriter::new(&self.config.output_dir);

        info!(
            "extracting {} archives into {:?} (v{})",
            self.paths.len(),
            self.config.output_dir,
            Self::version()
        );

        for name in self.duplicate_outputs() {
            warn!(
                "several archives are written to {}.txt, only one of them will be kept",
                name
            );
        }

        let start = Instant::now();
        let reports = self.process_all(&extractor, &writer)?;

        let mut report_writer = ReportWriter::create(&self.config.output_dir)?;
        report_writer.write_all(&reports)?;

        let count = |status: &str| {
            reports
                .iter()
                .filter(|r| r.outcome().status() == status)
                .count()
        };
        let segments: usize = reports.iter().map(|r| r.stats().segments).sum();
        info!(
            "done in {:.1}s: {} complete, {} partial, {} failed, {} segments",
            start.elapsed().as_secs_f64(),
            count("complete"),
            count("partial"),
            count("failed"),
            segments
        );

        Ok(reports)
    }
}
