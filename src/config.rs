//! Extraction configuration.
//!
//! Every field has a default, so a JSON file only needs the fields it changes:
//!
//! ```json
//! { "min_segment_chars": 5, "on_malformed": "fail_archive" }
//! ```
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::filtering::{MinContent, ScriptFilter};

/// What to do with an archive when a record cannot be framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Write what was extracted before the malformed record.
    #[default]
    KeepPartial,
    /// Write nothing and report the archive as failed.
    FailArchive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Minimum number of Malayalam chars for a run to be kept.
    pub min_segment_chars: usize,
    /// Max consecutive separators inside a run.
    pub separator_tolerance: usize,
    /// Minimum number of Malayalam chars for a page to be kept (0 disables).
    pub min_document_chars: usize,
    pub output_dir: PathBuf,
    /// Encoding label used when no charset is declared.
    pub fallback_encoding: String,
    pub on_malformed: MalformedPolicy,
    /// Number of archives processed concurrently.
    pub workers: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_segment_chars: 3,
            separator_tolerance: 1,
            min_document_chars: 40,
            output_dir: PathBuf::from("extracted"),
            fallback_encoding: "utf-8".to_string(),
            on_malformed: MalformedPolicy::default(),
            workers: 1,
        }
    }
}

impl ExtractorConfig {
    /// Load a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let f = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(f))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde can not.
    pub fn validate(&self) -> Result<(), Error> {
        self.fallback_encoding()?;
        if self.workers == 0 {
            return Err(Error::Config("workers must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Resolve the fallback encoding label.
    pub fn fallback_encoding(&self) -> Result<&'static Encoding, Error> {
        Encoding::for_label(self.fallback_encoding.trim().as_bytes()).ok_or_else(|| {
            Error::Config(format!(
                "unknown fallback encoding {:?}",
                self.fallback_encoding
            ))
        })
    }

    pub fn script_filter(&self) -> ScriptFilter {
        ScriptFilter::new(self.min_segment_chars, self.separator_tolerance)
    }

    pub fn document_filter(&self) -> MinContent {
        MinContent::new(self.min_document_chars)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use encoding_rs::{UTF_8, WINDOWS_1252};

    use super::*;

    #[test]
    fn defaults() {
        let c = ExtractorConfig::default();
        assert_eq!(c.min_segment_chars, 3);
        assert_eq!(c.separator_tolerance, 1);
        assert_eq!(c.on_malformed, MalformedPolicy::KeepPartial);
        assert_eq!(c.fallback_encoding().unwrap(), UTF_8);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json() {
        let c: ExtractorConfig =
            serde_json::from_str(r#"{"min_segment_chars": 5, "on_malformed": "fail_archive", "fallback_encoding": "latin1"}"#)
                .unwrap();
        assert_eq!(c.min_segment_chars, 5);
        assert_eq!(c.separator_tolerance, 1);
        assert_eq!(c.on_malformed, MalformedPolicy::FailArchive);
        assert_eq!(c.fallback_encoding().unwrap(), WINDOWS_1252);
    }

    #[test]
    fn from_path() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"workers": 4, "output_dir": "out"}}"#).unwrap();
        let c = ExtractorConfig::from_path(f.path()).unwrap();
        assert_eq!(c.workers, 4);
        assert_eq!(c.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn invalid_values() {
        let c = ExtractorConfig {
            fallback_encoding: "not-an-encoding".to_string(),
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(Error::Config(_))));

        let c = ExtractorConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }
}
