//! Record framing.
//!
//! [WarcReader] walks a [BufRead] and yields [Record]s in stream order.
//! The first framing error is yielded once, after which the iterator is fused:
//! there is no attempt to resynchronize on the next `WARC/` line.
use std::collections::HashMap;
use std::io::{BufRead, Read};

use log::{debug, warn};
use warc::WarcHeader;

use super::record::{Record, RecordType};
use crate::error::{Error, MalformedKind, MalformedRecord};

const VERSION_PREFIX: &[u8] = b"WARC/";

// initial payload buffer, grown by read_to_end if needed.
const MAX_PREALLOC: u64 = 1_048_576;

pub struct WarcReader<R> {
    reader: R,
    index: usize,
    done: bool,
}

impl<R: BufRead> WarcReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            index: 0,
            done: false,
        }
    }

    /// Number of records successfully read so far.
    pub fn records_read(&self) -> usize {
        self.index
    }

    fn malformed(&self, kind: MalformedKind) -> Error {
        Error::MalformedRecord(MalformedRecord {
            index: self.index,
            kind,
        })
    }

    /// Reads a line, `\n` included. An empty buffer means end of stream.
    fn read_line(&mut self) -> Result<Vec<u8>, Error> {
        let mut line = Vec::new();
        self.reader.read_until(b'\n', &mut line)?;
        Ok(line)
    }

    /// Skips blank lines and returns the version line, if any.
    fn read_version(&mut self) -> Result<Option<String>, Error> {
        loop {
            let line = self.read_line()?;
            if line.is_empty() {
                return Ok(None);
            }

            let content = trim_eol(&line);
            if content.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            if content.starts_with(VERSION_PREFIX) {
                if !line.ends_with(b"\n") {
                    return Err(self.malformed(MalformedKind::TruncatedHeader));
                }
                return Ok(Some(String::from_utf8_lossy(content).trim().to_string()));
            }

            // a partial version line at the very end of the stream.
            if !line.ends_with(b"\n") {
                if VERSION_PREFIX.starts_with(content) {
                    return Err(self.malformed(MalformedKind::TruncatedHeader));
                }
                debug!("ignoring {} trailing bytes", line.len());
                return Ok(None);
            }

            let version = String::from_utf8_lossy(content).to_string();
            return Err(self.malformed(MalformedKind::Version(version)));
        }
    }

    /// Reads header lines until the blank line.
    fn read_headers(&mut self) -> Result<HashMap<WarcHeader, String>, Error> {
        let mut headers: HashMap<WarcHeader, String> = HashMap::new();
        let mut last: Option<WarcHeader> = None;

        loop {
            let line = self.read_line()?;
            if !line.ends_with(b"\n") {
                return Err(self.malformed(MalformedKind::TruncatedHeader));
            }

            let content = trim_eol(&line);
            if content.is_empty() {
                return Ok(headers);
            }

            let content = String::from_utf8_lossy(content);

            // folded value
            if content.starts_with(' ') || content.starts_with('\t') {
                if let Some(value) = last.as_ref().and_then(|key| headers.get_mut(key)) {
                    value.push(' ');
                    value.push_str(content.trim());
                    continue;
                }
            }

            match content.split_once(':') {
                Some((name, value)) if !name.trim().is_empty() => {
                    let key = WarcHeader::from(name.trim());
                    headers.insert(key.clone(), value.trim().to_string());
                    last = Some(key);
                }
                _ => {
                    return Err(self.malformed(MalformedKind::HeaderLine(content.to_string())));
                }
            }
        }
    }

    fn read_record(&mut self) -> Result<Option<Record>, Error> {
        let version = match self.read_version()? {
            Some(v) => v,
            None => return Ok(None),
        };

        let headers = self.read_headers()?;

        let length = headers
            .get(&WarcHeader::ContentLength)
            .ok_or_else(|| self.malformed(MalformedKind::MissingHeader("Content-Length")))?;
        let length: u64 = length
            .parse()
            .map_err(|_| self.malformed(MalformedKind::ContentLength(length.clone())))?;

        let record_type = headers
            .get(&WarcHeader::WarcType)
            .map(|t| RecordType::from(t.as_str()))
            .ok_or_else(|| self.malformed(MalformedKind::MissingHeader("WARC-Type")))?;

        let mut body = Vec::with_capacity(length.min(MAX_PREALLOC) as usize);
        let read = (&mut self.reader).take(length).read_to_end(&mut body)? as u64;
        if read < length {
            return Err(self.malformed(MalformedKind::TruncatedPayload {
                declared: length,
                read,
            }));
        }

        Ok(Some(Record::from_parts(version, record_type, headers, body)))
    }
}

impl<R: BufRead> Iterator for WarcReader<R> {
    type Item = Result<Record, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_record() {
            Ok(Some(record)) => {
                self.index += 1;
                Some(Ok(record))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                warn!("stopping after {} records: {}", self.index, e);
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn trim_eol(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
