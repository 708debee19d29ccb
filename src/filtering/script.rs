//! Malayalam run extraction.
//!
//! Text is scanned char by char. Malayalam characters (and the zero width joiners
//! used inside Malayalam words) extend the current run. Separators (whitespace, common
//! punctuation) are kept inside a run as long as there are no more than `separator_tolerance`
//! of them in a row. Any other character ends the run.
//!
//! Runs whose Malayalam character count is below the minimum are discarded.
//!
//! ```text
//! hello മലയാളം world  -> ["മലയാളം"]
//! ```
use std::fmt;
use std::ops::RangeInclusive;

use super::length::Length;
use super::Filter;
use crate::pipelines::Document;
use crate::transformers::Transform;

/// Malayalam Unicode block.
pub const MALAYALAM: RangeInclusive<char> = '\u{0D00}'..='\u{0D7F}';

const ZWNJ: char = '\u{200C}';
const ZWJ: char = '\u{200D}';

/// Punctuation that does not break a run.
const PUNCTUATION: [char; 22] = [
    '.', ',', ';', ':', '!', '?', '\'', '"', '(', ')', '[', ']', '-', '\u{2013}', '\u{2014}',
    '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{0964}', '\u{0965}', '/',
];

#[inline]
pub fn is_malayalam(c: char) -> bool {
    MALAYALAM.contains(&c)
}

#[inline]
fn is_joiner(c: char) -> bool {
    c == ZWJ || c == ZWNJ
}

#[inline]
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || PUNCTUATION.contains(&c)
}

/// A run of Malayalam text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    text: String,
    script_chars: usize,
}

impl Segment {
    /// Build a segment from already extracted text.
    pub fn new(text: String) -> Self {
        let script_chars = text.chars().filter(|c| is_malayalam(*c)).count();
        Self { text, script_chars }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Number of Malayalam characters, separators and joiners excluded.
    pub fn script_chars(&self) -> usize {
        self.script_chars
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Extracts [Segment]s from plain text.
#[derive(Debug, Clone)]
pub struct ScriptFilter {
    length: Length,
    separator_tolerance: usize,
}

impl ScriptFilter {
    pub fn new(min_segment_chars: usize, separator_tolerance: usize) -> Self {
        Self {
            length: Length::with_min_size(min_segment_chars),
            separator_tolerance,
        }
    }

    pub fn min_segment_chars(&self) -> usize {
        *self.length.min_size()
    }

    pub fn separator_tolerance(&self) -> usize {
        self.separator_tolerance
    }

    /// Get the segments of `text`, in order.
    pub fn segments(&self, text: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut run = String::new();
        let mut script_chars = 0;
        // separators seen since the last Malayalam char
        let mut pending = String::new();
        let mut pending_count = 0;

        for c in text.chars() {
            if is_malayalam(c) || (is_joiner(c) && !run.is_empty()) {
                run.push_str(&pending);
                pending.clear();
                pending_count = 0;
                run.push(c);
                if is_malayalam(c) {
                    script_chars += 1;
                }
            } else if is_separator(c) && !run.is_empty() {
                pending.push(c);
                pending_count += 1;
                if pending_count > self.separator_tolerance {
                    self.close_run(&mut run, &mut script_chars, &mut segments);
                    pending.clear();
                    pending_count = 0;
                }
            } else {
                self.close_run(&mut run, &mut script_chars, &mut segments);
                pending.clear();
                pending_count = 0;
            }
        }
        self.close_run(&mut run, &mut script_chars, &mut segments);

        segments
    }

    /// Push the current run if it is long enough, then reset it.
    fn close_run(&self, run: &mut String, script_chars: &mut usize, segments: &mut Vec<Segment>) {
        if !run.is_empty() {
            let segment = Segment {
                text: std::mem::take(run),
                script_chars: *script_chars,
            };
            if self.length.detect(&segment) {
                segments.push(segment);
            }
        }
        *script_chars = 0;
    }
}

impl Default for ScriptFilter {
    /// Runs need at least 3 Malayalam chars, one separator is tolerated between words.
    fn default() -> Self {
        Self::new(3, 1)
    }
}

impl Transform for ScriptFilter {
    fn transform_own(&self, mut doc: Document) -> Document {
        let segments = self.segments(doc.content());
        doc.set_segments(segments);
        doc
    }
}
