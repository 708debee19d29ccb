use crate::filtering::Segment;
use crate::payload::{DecodeQuality, HttpMessage};
use crate::shard::Record;

/// A Document is one HTTP response on its way through the pipeline.
///
/// Its content starts as decoded HTML, becomes plain text after [crate::transformers::StripMarkup]
/// and its segments are filled by [crate::filtering::ScriptFilter].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    record_id: String,
    url: Option<String>,
    content: String,
    segments: Vec<Segment>,
    quality: Option<DecodeQuality>,
}

impl Document {
    /// Document with no provenance, mainly useful for tests.
    pub fn new(content: String) -> Self {
        Self {
            record_id: String::new(),
            url: None,
            content,
            segments: Vec::new(),
            quality: None,
        }
    }

    /// Instantiate a Document from a record and its parsed HTTP response.
    pub fn from_message(record: &Record, message: HttpMessage) -> Self {
        let quality = message.quality();
        Self {
            record_id: record.warc_id().to_string(),
            url: record.target_uri().map(String::from),
            content: message.into_body(),
            segments: Vec::new(),
            quality: Some(quality),
        }
    }

    /// get warc record id
    pub fn warc_id(&self) -> &str {
        &self.record_id
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Get a reference to the content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Set the document's content.
    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn set_segments(&mut self, segments: Vec<Segment>) {
        self.segments = segments;
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Malayalam characters over all segments.
    pub fn script_chars(&self) -> usize {
        self.segments.iter().map(Segment::script_chars).sum()
    }

    /// How the body was decoded, if it comes from a response.
    pub fn quality(&self) -> Option<DecodeQuality> {
        self.quality
    }
}
