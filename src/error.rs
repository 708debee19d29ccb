//! Error enum
use std::fmt;
use std::path::PathBuf;

/// Why a WARC record could not be framed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedKind {
    /// First line of the record is not a `WARC/x.y` version line.
    Version(String),
    /// A header line without a `:` separator.
    HeaderLine(String),
    /// A required header (`Content-Length`, `WARC-Type`) is absent.
    MissingHeader(&'static str),
    /// `Content-Length` is not a non-negative integer.
    ContentLength(String),
    /// End of stream reached inside the header block.
    TruncatedHeader,
    /// End of stream reached before `declared` payload bytes were read.
    TruncatedPayload { declared: u64, read: u64 },
}

impl fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version(line) => write!(f, "invalid version line {:?}", line),
            Self::HeaderLine(line) => write!(f, "invalid header line {:?}", line),
            Self::MissingHeader(name) => write!(f, "missing header {}", name),
            Self::ContentLength(value) => write!(f, "invalid content-length {:?}", value),
            Self::TruncatedHeader => write!(f, "header block truncated"),
            Self::TruncatedPayload { declared, read } => {
                write!(f, "payload truncated ({}/{} bytes)", read, declared)
            }
        }
    }
}

/// A record that could not be parsed, along with its position in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// number of records successfully read before this one.
    pub index: usize,
    pub kind: MalformedKind,
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {}: {}", self.index, self.kind)
    }
}

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    MalformedRecord(MalformedRecord),
    WriteError { path: PathBuf, source: std::io::Error },
    Http(reqwest::Error),
    Url(url::ParseError),
    Csv(csv::Error),
    Serde(serde_json::Error),
    Config(String),
    Custom(String),
}

impl Error {
    /// Short, stable name of the error kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "Io",
            Self::MalformedRecord(_) => "MalformedRecord",
            Self::WriteError { .. } => "WriteError",
            Self::Http(_) => "Http",
            Self::Url(_) => "Url",
            Self::Csv(_) => "Csv",
            Self::Serde(_) => "Serde",
            Self::Config(_) => "Config",
            Self::Custom(_) => "Custom",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {}", e),
            Self::MalformedRecord(m) => write!(f, "malformed record: {}", m),
            Self::WriteError { path, source } => {
                write!(f, "could not write {:?}: {}", path, source)
            }
            Self::Http(e) => write!(f, "http error: {}", e),
            Self::Url(e) => write!(f, "invalid url: {}", e),
            Self::Csv(e) => write!(f, "csv error: {}", e),
            Self::Serde(e) => write!(f, "config parse error: {}", e),
            Self::Config(s) => write!(f, "invalid configuration: {}", s),
            Self::Custom(s) => write!(f, "{}", s),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<MalformedRecord> for Error {
    fn from(e: MalformedRecord) -> Error {
        Error::MalformedRecord(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Http(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Error {
        Error::Url(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Error {
        Error::Csv(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names() {
        let e = Error::from(MalformedRecord {
            index: 2,
            kind: MalformedKind::TruncatedHeader,
        });
        assert_eq!(e.kind(), "MalformedRecord");
        assert_eq!(
            e.to_string(),
            "malformed record: record 2: header block truncated"
        );

        let e = Error::WriteError {
            path: PathBuf::from("out/a.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(e.kind(), "WriteError");
    }
}
