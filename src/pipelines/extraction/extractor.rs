//! Per-archive extraction.
use std::io::BufRead;

use encoding_rs::Encoding;
use log::debug;

use super::types::{Extraction, ExtractionStats};
use crate::config::ExtractorConfig;
use crate::error::Error;
use crate::filtering::{Filter, MinContent, ScriptFilter};
use crate::payload::{DecodeQuality, HttpMessage};
use crate::pipelines::Document;
use crate::shard::{Record, Shard};
use crate::transformers::{StripMarkup, Transform};

/// Runs the text stages on records: HTTP parsing, markup stripping,
/// script filtering and the document threshold.
#[derive(Debug, Clone)]
pub struct Extractor {
    fallback: &'static Encoding,
    markup: StripMarkup,
    script: ScriptFilter,
    document: MinContent,
}

impl Extractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self, Error> {
        Ok(Self {
            fallback: config.fallback_encoding()?,
            markup: StripMarkup,
            script: config.script_filter(),
            document: config.document_filter(),
        })
    }

    /// Process a single record.
    ///
    /// Returns [None] for non-response records, unparseable payloads
    /// and documents below the threshold.
    pub fn process_record(&self, record: &Record, stats: &mut ExtractionStats) -> Option<Document> {
        let message = HttpMessage::from_record(record, self.fallback)?;
        stats.responses += 1;

        match message.quality() {
            DecodeQuality::Lossy => {
                stats.decode_fallbacks += 1;
                stats.lossy_decodes += 1;
                debug!("record {}: lossy decoding", record.warc_id());
            }
            DecodeQuality::Fallback => {
                stats.decode_fallbacks += 1;
                debug!("record {}: fallback encoding", record.warc_id());
            }
            _ => (),
        }

        let doc = Document::from_message(record, message);
        let doc = self.markup.transform_own(doc);
        let doc = self.script.transform_own(doc);

        if self.document.detect(&doc) {
            stats.documents += 1;
            stats.segments += doc.segments().len();
            Some(doc)
        } else {
            if !doc.segments().is_empty() {
                debug!(
                    "record {}: {} malayalam chars, below threshold",
                    doc.warc_id(),
                    doc.script_chars()
                );
            }
            None
        }
    }

    /// Extract the segments of a whole (decompressed) archive stream.
    ///
    /// Never fails: a read error stops the extraction and is stored in [Extraction::stopped].
    pub fn extract<R: BufRead>(&self, stream: R) -> Extraction {
        let mut shard = Shard::new(stream);
        let mut stats = ExtractionStats::default();
        let mut segments = Vec::new();
        let mut stopped = None;

        for record in shard.by_ref() {
            match record {
                Ok(record) => {
                    stats.records += 1;
                    if let Some(doc) = self.process_record(&record, &mut stats) {
                        segments.extend(doc.into_segments());
                    }
                }
                Err(e) => {
                    debug!("extraction stopped after {} records", stats.records);
                    stopped = Some(e);
                    break;
                }
            }
        }

        Extraction {
            segments,
            stats,
            stopped,
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            fallback: encoding_rs::UTF_8,
            markup: StripMarkup,
            script: ScriptFilter::default(),
            document: MinContent::default(),
        }
    }
}
