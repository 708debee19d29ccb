//! HTML to plain text.
//!
//! This is not an HTML parser: there is no tree, no attribute handling.
//! Tags are dropped, raw text elements (`<script>`, `<style>`…) are dropped with their content,
//! block-level tags become a space, entities are decoded and whitespace is collapsed.
//!
//! Broken markup never fails: a `<` that does not open a tag, or a tag that is never closed,
//! is kept as text.
use std::borrow::Cow;

use itertools::Itertools;

use super::Transform;
use crate::pipelines::Document;

/// Elements whose content is never visible.
const RAW_TEXT: [&str; 4] = ["script", "style", "noscript", "template"];

const BLOCK: [&str; 41] = [
    "address", "article", "aside", "blockquote", "body", "br", "caption", "dd", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "html", "li", "main", "nav", "ol", "option", "p", "pre",
    "section", "table", "td", "th", "title", "tr", "ul", "img",
];

/// [Transform] that replaces a document's HTML content by its text.
#[derive(Debug, Default, Clone, Copy)]
pub struct StripMarkup;

impl Transform for StripMarkup {
    fn transform_own(&self, mut doc: Document) -> Document {
        let text = strip_markup(doc.content());
        doc.set_content(text);
        doc
    }
}

/// A tag found at some position.
struct Tag<'a> {
    name: &'a str,
    closing: bool,
    /// index right after the closing `>`
    end: usize,
}

/// Strip `html` into whitespace-normalized text.
pub fn strip_markup(html: &str) -> String {
    // ascii lowercasing keeps byte offsets
    let lower = html.to_ascii_lowercase();
    let bytes = html.as_bytes();

    let mut out = String::with_capacity(html.len() / 2);
    let mut text_start = 0;
    let mut i = 0;

    while let Some(offset) = html[i..].find('<') {
        let lt = i + offset;
        out.push_str(&decode_entities(&html[text_start..lt]));

        let rest = &lower[lt..];
        if rest.starts_with("<!--") {
            // unterminated comments hide the rest of the document
            let end = rest[4..].find("-->").map_or(html.len(), |p| lt + 4 + p + 3);
            out.push(' ');
            i = end;
            text_start = end;
            continue;
        }

        match bytes.get(lt + 1).copied() {
            Some(b'!') | Some(b'?') => match rest.find('>') {
                Some(p) => {
                    out.push(' ');
                    i = lt + p + 1;
                    text_start = i;
                }
                None => {
                    i = lt + 1;
                    text_start = lt;
                }
            },
            Some(b'/') | Some(b'a'..=b'z') | Some(b'A'..=b'Z') => match parse_tag(&lower, lt) {
                Some(tag) if !tag.closing && RAW_TEXT.contains(&tag.name) => {
                    let closing = format!("</{}", tag.name);
                    let end = lower[tag.end..]
                        .find(&closing)
                        .and_then(|p| {
                            let close_at = tag.end + p;
                            lower[close_at..].find('>').map(|q| close_at + q + 1)
                        })
                        .unwrap_or(html.len());
                    out.push(' ');
                    i = end;
                    text_start = end;
                }
                Some(tag) => {
                    if BLOCK.contains(&tag.name) {
                        out.push(' ');
                    }
                    i = tag.end;
                    text_start = tag.end;
                }
                // not a tag: `<` is text
                None => {
                    i = lt + 1;
                    text_start = lt;
                }
            },
            _ => {
                i = lt + 1;
                text_start = lt;
            }
        }
    }
    out.push_str(&decode_entities(&html[text_start..]));

    out.split_whitespace().join(" ")
}

/// Parse the tag starting at `start` (which points to a `<`).
///
/// Quoted attribute values may contain `>`.
fn parse_tag(lower: &str, start: usize) -> Option<Tag<'_>> {
    let after = &lower[start + 1..];
    let (closing, after) = match after.strip_prefix('/') {
        Some(a) => (true, a),
        None => (false, after),
    };

    let name_len = after
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':'))
        .unwrap_or(after.len());
    if name_len == 0 || !after.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let name = &after[..name_len];

    let attrs_start = lower.len() - after.len() + name_len;
    let mut quote: Option<u8> = None;
    for (idx, b) in lower.as_bytes()[attrs_start..].iter().copied().enumerate() {
        match (quote, b) {
            (None, b'>') => {
                return Some(Tag {
                    name,
                    closing,
                    end: attrs_start + idx + 1,
                })
            }
            (None, b'"') | (None, b'\'') => quote = Some(b),
            (Some(q), b) if q == b => quote = None,
            _ => (),
        }
    }

    None
}

fn decode_entities(text: &str) -> Cow<'_, str> {
    if text.contains('&') {
        html_escape::decode_html_entities(text)
    } else {
        Cow::Borrowed(text)
    }
}
