//! HTTP response parsing.
use std::collections::HashMap;
use std::io::Read;

use encoding_rs::Encoding;
use flate2::read::{DeflateDecoder, MultiGzDecoder, ZlibDecoder};
use log::debug;

use super::encoding::{self, DecodeQuality};
use crate::shard::{Record, RecordType};

/// An HTTP response rebuilt from a `response` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpMessage {
    status: u16,
    headers: HashMap<String, String>,
    body: String,
    quality: DecodeQuality,
}

impl HttpMessage {
    /// Parse the payload of `record`.
    ///
    /// Returns [None] for records that are not responses or whose payload
    /// does not start with an HTTP status line.
    pub fn from_record(record: &Record, fallback: &'static Encoding) -> Option<Self> {
        if record.record_type() != &RecordType::Response {
            return None;
        }

        let msg = Self::parse(record.body(), fallback);
        if msg.is_none() {
            debug!("{}: no status line, skipping", record.warc_id());
        }
        msg
    }

    /// Parse a raw HTTP response.
    pub fn parse(payload: &[u8], fallback: &'static Encoding) -> Option<Self> {
        let (status_line, mut rest) = split_line(payload);
        let status = parse_status_line(status_line)?;

        let mut headers: HashMap<String, String> = HashMap::new();
        while !rest.is_empty() {
            let (line, next) = split_line(rest);
            rest = next;
            if line.is_empty() {
                break;
            }
            let line = String::from_utf8_lossy(line);
            if let Some((name, value)) = line.split_once(':') {
                let name = name.trim().to_ascii_lowercase();
                let value = value.trim();
                // repeated headers are folded into a single one
                headers
                    .entry(name)
                    .and_modify(|v| {
                        v.push_str(", ");
                        v.push_str(value);
                    })
                    .or_insert_with(|| value.to_string());
            }
        }

        let chunked = headers
            .get("transfer-encoding")
            .map_or(false, |te| te.to_ascii_lowercase().contains("chunked"));
        let body = match chunked {
            true => dechunk(rest).unwrap_or_else(|| {
                debug!("invalid chunked body, keeping it as is");
                rest.to_vec()
            }),
            false => rest.to_vec(),
        };

        let body = match headers.get("content-encoding") {
            Some(ce) => decompress(ce, &body).unwrap_or(body),
            None => body,
        };

        let declared = headers
            .get("content-type")
            .and_then(|ct| encoding::charset_from_content_type(ct));
        let decoded = encoding::decode(&body, declared, fallback);

        Some(Self {
            status,
            headers,
            body: decoded.text,
            quality: decoded.quality,
        })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Header lookup, case insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }

    pub fn quality(&self) -> DecodeQuality {
        self.quality
    }
}

/// Split at the first `\n`, trimming a preceding `\r`.
fn split_line(bytes: &[u8]) -> (&[u8], &[u8]) {
    match bytes.iter().position(|b| *b == b'\n') {
        Some(pos) => {
            let line = &bytes[..pos];
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            (line, &bytes[pos + 1..])
        }
        None => (bytes, &[]),
    }
}

/// `HTTP/1.1 200 OK` -> 200
fn parse_status_line(line: &[u8]) -> Option<u16> {
    let line = std::str::from_utf8(line).ok()?;
    let mut parts = line.split_whitespace();

    let version = parts.next()?.strip_prefix("HTTP/")?;
    if version.is_empty() || !version.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let code = parts.next()?;
    if code.len() != 3 {
        return None;
    }
    code.parse().ok()
}

/// Undo `Transfer-Encoding: chunked`. [None] if the framing is invalid.
///
/// Each chunk is a hex size line (extensions after `;` are ignored), the data and a line break.
/// A zero sized chunk ends the body, trailers are dropped.
/// A body cut before the last chunk keeps the complete chunks.
fn dechunk(mut body: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(body.len());
    while !body.is_empty() {
        let (line, rest) = split_line(body);
        let size = std::str::from_utf8(line).ok()?;
        let size = size.split(';').next()?.trim();
        let size = usize::from_str_radix(size, 16).ok()?;
        if size == 0 {
            break;
        }

        let data = rest.get(..size)?;
        out.extend_from_slice(data);
        let rest = &rest[size..];
        body = if let Some(r) = rest.strip_prefix(b"\r\n") {
            r
        } else if let Some(r) = rest.strip_prefix(b"\n") {
            r
        } else if rest.is_empty() {
            rest
        } else {
            return None;
        };
    }
    Some(out)
}

/// Undo `Content-Encoding`. [None] if unsupported or corrupt.
fn decompress(content_encoding: &str, body: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    let res = match content_encoding.trim().to_ascii_lowercase().as_str() {
        "gzip" | "x-gzip" => MultiGzDecoder::new(body).read_to_end(&mut out),
        "deflate" => {
            // zlib wrapped is what the rfc says, raw deflate is what some servers send
            let res = ZlibDecoder::new(body).read_to_end(&mut out);
            if res.is_err() {
                out.clear();
                DeflateDecoder::new(body).read_to_end(&mut out)
            } else {
                res
            }
        }
        _ => return None,
    };

    match res {
        Ok(_) => Some(out),
        Err(e) => {
            debug!("could not decode {} body: {}", content_encoding, e);
            None
        }
    }
}
