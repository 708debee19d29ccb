//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use structopt::StructOpt;

use malayalam_extract::config::{ExtractorConfig, MalformedPolicy};
use malayalam_extract::error::Error;
use malayalam_extract::sources::{ByteSource, HttpSource, LocalSource};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "malayalam-extract",
    about = "Malayalam text extraction from Common Crawl WARC archives."
)]
/// Holds every command that is callable by the `malayalam-extract` command.
pub enum MalayalamExtract {
    #[structopt(about = "Extract the archives listed in a paths file")]
    Extract(Extract),
    #[structopt(about = "Print the segments of a single local archive")]
    Strip(Strip),
}

/// Where archives are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Local,
    Http,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "http" => Ok(Self::Http),
            other => Err(format!("unknown source {:?} (expected local or http)", other)),
        }
    }
}

/// Filtering parameters, overriding the configuration file.
#[derive(Debug, StructOpt)]
pub struct FilterArgs {
    #[structopt(long, help = "minimum Malayalam chars in a segment")]
    pub min_segment_chars: Option<usize>,
    #[structopt(long, help = "maximum consecutive separators inside a segment")]
    pub separator_tolerance: Option<usize>,
    #[structopt(long, help = "minimum Malayalam chars in a page (0 disables)")]
    pub min_document_chars: Option<usize>,
    #[structopt(long, help = "encoding used when no charset is declared")]
    pub fallback_encoding: Option<String>,
}

impl FilterArgs {
    pub fn apply(&self, config: &mut ExtractorConfig) {
        if let Some(n) = self.min_segment_chars {
            config.min_segment_chars = n;
        }
        if let Some(n) = self.separator_tolerance {
            config.separator_tolerance = n;
        }
        if let Some(n) = self.min_document_chars {
            config.min_document_chars = n;
        }
        if let Some(label) = &self.fallback_encoding {
            config.fallback_encoding = label.clone();
        }
    }
}

#[derive(Debug, StructOpt)]
/// Extract command and parameters.
/// ```sh
/// malayalam-extract-extract 0.1.0
/// Extract the archives listed in a paths file
///
/// USAGE:
///     malayalam-extract extract [FLAGS] [OPTIONS] <paths-file> <dst>
///
/// FLAGS:
///         --fail-on-malformed    write nothing for archives with a malformed record
///
/// OPTIONS:
///     -t <workers>                 number of archives processed concurrently
///         --source <source>        local or http [default: local]
///         --base <base>            base directory or URL archive paths are relative to
///         --config <config>        JSON configuration file
///         --retries <retries>      [default: 20]
///         --retry-delay <secs>     [default: 10]
///
/// ARGS:
///     <paths-file>    path to warc.paths file
///     <dst>           output directory
/// ```
pub struct Extract {
    #[structopt(parse(from_os_str), help = "path to warc.paths file")]
    pub paths_file: PathBuf,
    #[structopt(parse(from_os_str), help = "output directory")]
    pub dst: PathBuf,
    #[structopt(
        long,
        default_value = "local",
        possible_values = &["local", "http"],
        help = "where archives are read from"
    )]
    pub source: SourceKind,
    #[structopt(long, help = "base directory or URL archive paths are relative to")]
    pub base: Option<String>,
    #[structopt(long, parse(from_os_str), help = "JSON configuration file")]
    pub config: Option<PathBuf>,
    #[structopt(flatten)]
    pub filters: FilterArgs,
    #[structopt(long, help = "write nothing for archives with a malformed record")]
    pub fail_on_malformed: bool,
    #[structopt(short = "t", help = "number of archives processed concurrently")]
    pub workers: Option<usize>,
    #[structopt(long, default_value = "20", help = "HTTP retries per archive")]
    pub retries: usize,
    #[structopt(
        long = "retry-delay",
        default_value = "10",
        help = "seconds between HTTP retries"
    )]
    pub retry_delay: u64,
}

impl Extract {
    /// Configuration file (or defaults) with command line overrides applied.
    pub fn extractor_config(&self) -> Result<ExtractorConfig, Error> {
        let mut config = match &self.config {
            Some(path) => ExtractorConfig::from_path(path)?,
            None => ExtractorConfig::default(),
        };
        self.filters.apply(&mut config);
        if self.fail_on_malformed {
            config.on_malformed = MalformedPolicy::FailArchive;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        config.output_dir = self.dst.clone();

        config.validate()?;
        Ok(config)
    }

    pub fn byte_source(&self) -> Result<Box<dyn ByteSource>, Error> {
        match self.source {
            SourceKind::Local => Ok(Box::new(match &self.base {
                Some(base) => LocalSource::with_base(base),
                None => LocalSource::new(),
            })),
            SourceKind::Http => {
                let base = self
                    .base
                    .as_deref()
                    .unwrap_or(malayalam_extract::sources::BASE_URL);
                Ok(Box::new(HttpSource::with_retries(
                    base,
                    self.retries,
                    Duration::from_secs(self.retry_delay),
                )?))
            }
        }
    }
}

#[derive(Debug, StructOpt)]
/// Strip command and parameters.
pub struct Strip {
    #[structopt(parse(from_os_str), help = "WARC file (.warc or .warc.gz)")]
    pub file: PathBuf,
    #[structopt(flatten)]
    pub filters: FilterArgs,
}

impl Strip {
    pub fn extractor_config(&self) -> Result<ExtractorConfig, Error> {
        let mut config = ExtractorConfig::default();
        self.filters.apply(&mut config);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_args() {
        let opt = MalayalamExtract::from_iter(&[
            "malayalam-extract",
            "extract",
            "warc.paths",
            "out",
            "--min-segment-chars",
            "5",
            "--fail-on-malformed",
            "-t",
            "4",
        ]);
        let e = match opt {
            MalayalamExtract::Extract(e) => e,
            _ => panic!("expected extract"),
        };
        assert_eq!(e.source, SourceKind::Local);
        let config = e.extractor_config().unwrap();
        assert_eq!(config.min_segment_chars, 5);
        assert_eq!(config.separator_tolerance, 1);
        assert_eq!(config.on_malformed, MalformedPolicy::FailArchive);
        assert_eq!(config.workers, 4);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn http_source() {
        let opt = MalayalamExtract::from_iter(&[
            "malayalam-extract",
            "extract",
            "warc.paths",
            "out",
            "--source",
            "http",
            "--retries",
            "2",
        ]);
        match opt {
            MalayalamExtract::Extract(e) => {
                assert_eq!(e.source, SourceKind::Http);
                assert_eq!(e.retries, 2);
                assert!(e.byte_source().is_ok());
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn invalid_encoding() {
        let opt = MalayalamExtract::from_iter(&[
            "malayalam-extract",
            "strip",
            "a.warc",
            "--fallback-encoding",
            "nope",
        ]);
        match opt {
            MalayalamExtract::Strip(s) => assert!(s.extractor_config().is_err()),
            _ => panic!("expected strip"),
        }
    }
}
