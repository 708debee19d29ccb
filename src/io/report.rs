//! CSV extraction reports.
//!
//! Two files are written in the output directory:
//!
//! - [REPORT_FILE], one row per archive,
//! - [ERROR_LOG_FILE], one row per archive that did not complete.
use std::fs::File;
use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;

use crate::error::Error;
use crate::pipelines::extraction::ArchiveReport;

pub const REPORT_FILE: &str = "extraction_info.csv";
pub const ERROR_LOG_FILE: &str = "error_log.csv";

const REPORT_HEADER: [&str; 11] = [
    "archive",
    "status",
    "output",
    "segments",
    "records",
    "responses",
    "decode_fallbacks",
    "input_bytes",
    "output_bytes",
    "seconds",
    "error",
];
const ERROR_HEADER: [&str; 2] = ["archive", "error"];

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    archive: &'a str,
    status: &'static str,
    output: String,
    segments: usize,
    records: usize,
    responses: usize,
    decode_fallbacks: usize,
    input_bytes: u64,
    output_bytes: u64,
    seconds: f64,
    error: String,
}

impl<'a> From<&'a ArchiveReport> for ReportRow<'a> {
    fn from(r: &'a ArchiveReport) -> Self {
        let stats = r.stats();
        Self {
            archive: r.archive(),
            status: r.outcome().status(),
            output: r
                .output()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
            segments: stats.segments,
            records: stats.records,
            responses: stats.responses,
            decode_fallbacks: stats.decode_fallbacks,
            input_bytes: r.input_bytes(),
            output_bytes: r.output_bytes(),
            seconds: r.elapsed().as_secs_f64(),
            error: r.outcome().error().map(describe).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorRow<'a> {
    archive: &'a str,
    error: String,
}

fn describe(e: &Error) -> String {
    format!("{}: {}", e.kind(), e)
}

/// Writes [REPORT_FILE] and [ERROR_LOG_FILE].
///
/// Headers are written on creation, so that an empty run still yields valid files.
pub struct ReportWriter {
    report: csv::Writer<File>,
    errors: csv::Writer<File>,
}

impl ReportWriter {
    /// Create (or truncate) both report files in `dst`.
    pub fn create(dst: &Path) -> Result<Self, Error> {
        std::fs::create_dir_all(dst)?;
        let mut report = WriterBuilder::new()
            .has_headers(false)
            .from_path(dst.join(REPORT_FILE))?;
        let mut errors = WriterBuilder::new()
            .has_headers(false)
            .from_path(dst.join(ERROR_LOG_FILE))?;

        report.write_record(REPORT_HEADER)?;
        errors.write_record(ERROR_HEADER)?;

        Ok(Self { report, errors })
    }

    pub fn write(&mut self, report: &ArchiveReport) -> Result<(), Error> {
        self.report.serialize(ReportRow::from(report))?;
        if let Some(e) = report.outcome().error() {
            self.errors.serialize(ErrorRow {
                archive: report.archive(),
                error: describe(e),
            })?;
        }
        Ok(())
    }

    pub fn write_all<'a, I>(&mut self, reports: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = &'a ArchiveReport>,
    {
        for report in reports {
            self.write(report)?;
        }
        self.flush()
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.report.flush()?;
        self.errors.flush()?;
        Ok(())
    }
}
