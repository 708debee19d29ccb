//! WARC records.
//!
//! A [Record] is a version line, a header block and a payload whose length
//! matches the `Content-Length` header.
use std::collections::HashMap;
use std::fmt;
use std::io::Write;

use itertools::Itertools;
use warc::WarcHeader;

/// Type of a record, from the `WARC-Type` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    WarcInfo,
    Response,
    Resource,
    Request,
    Metadata,
    Revisit,
    Conversion,
    Continuation,
    Other(String),
}

impl From<&str> for RecordType {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "warcinfo" => Self::WarcInfo,
            "response" => Self::Response,
            "resource" => Self::Resource,
            "request" => Self::Request,
            "metadata" => Self::Metadata,
            "revisit" => Self::Revisit,
            "conversion" => Self::Conversion,
            "continuation" => Self::Continuation,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::WarcInfo => "warcinfo",
            Self::Response => "response",
            Self::Resource => "resource",
            Self::Request => "request",
            Self::Metadata => "metadata",
            Self::Revisit => "revisit",
            Self::Conversion => "conversion",
            Self::Continuation => "continuation",
            Self::Other(s) => s.as_str(),
        };
        write!(f, "{}", s)
    }
}

/// A single framed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    version: String,
    record_type: RecordType,
    headers: HashMap<WarcHeader, String>,
    body: Vec<u8>,
}

impl Record {
    /// Build a `WARC/1.0` record.
    ///
    /// `WARC-Type` and `Content-Length` are derived from `record_type` and `body`,
    /// overriding any value present in `headers`.
    pub fn new(
        record_type: RecordType,
        mut headers: HashMap<WarcHeader, String>,
        body: Vec<u8>,
    ) -> Self {
        headers.insert(WarcHeader::WarcType, record_type.to_string());
        headers.insert(WarcHeader::ContentLength, body.len().to_string());
        Self {
            version: "WARC/1.0".to_string(),
            record_type,
            headers,
            body,
        }
    }

    /// Record built by the reader. Headers are assumed to be consistent with the body.
    pub(crate) fn from_parts(
        version: String,
        record_type: RecordType,
        headers: HashMap<WarcHeader, String>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            version,
            record_type,
            headers,
            body,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    pub fn headers(&self) -> &HashMap<WarcHeader, String> {
        &self.headers
    }

    pub fn header(&self, key: &WarcHeader) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    /// `WARC-Record-ID`, or an empty string.
    pub fn warc_id(&self) -> &str {
        self.header(&WarcHeader::RecordID).unwrap_or_default()
    }

    pub fn target_uri(&self) -> Option<&str> {
        self.header(&WarcHeader::TargetURI)
    }

    /// Declared payload length. Always equal to `body().len()`.
    pub fn content_length(&self) -> u64 {
        self.body.len() as u64
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Serialize the record in WARC framing.
    ///
    /// `WARC-Type` and `Content-Length` come first, other headers are sorted by name.
    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        write!(w, "{}\r\n", self.version)?;
        write!(w, "WARC-Type: {}\r\n", self.record_type)?;
        write!(w, "Content-Length: {}\r\n", self.body.len())?;
        let others = self
            .headers
            .iter()
            .filter(|(k, _)| **k != WarcHeader::WarcType && **k != WarcHeader::ContentLength)
            .map(|(k, v)| (k.to_string(), v))
            .sorted();
        for (k, v) in others {
            write!(w, "{}: {}\r\n", k, v)?;
        }
        w.write_all(b"\r\n")?;
        w.write_all(&self.body)?;
        w.write_all(b"\r\n\r\n")
    }
}
