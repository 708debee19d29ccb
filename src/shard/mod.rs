//! Shard/WARC utils.
//!
//! Common Crawl distributes WARC files as concatenated gzip members,
//! which need a multi gz decoder (such as [MultiGzDecoder]).
//! [Shard] hides this: compressed and plain archives are read the same way.
//!
//! [Shard] implements [Iterator] over contained [Record]s.
pub mod reader;
pub mod record;

use std::io::{BufRead, BufReader, Read};
use std::{fs::File, path::Path};

use flate2::read::MultiGzDecoder;
use log::debug;

use crate::error::Error;
pub use reader::WarcReader;
pub use record::{Record, RecordType};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Boxed stream, either plain or gzip-decoded.
pub type ArchiveStream = Box<dyn BufRead + Send>;

/// Wrap `reader` into a gzip decoder if it starts with the gzip magic bytes.
pub fn open_stream<R: Read + Send + 'static>(reader: R) -> Result<ArchiveStream, Error> {
    let mut reader = BufReader::new(reader);
    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    if is_gzip {
        debug!("gzip stream detected");
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// WARC shard, generic over reader type.
pub struct Shard<T> {
    reader: WarcReader<T>,
}

impl Shard<ArchiveStream> {
    /// Open a (possibly gzipped) WARC file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path)?;
        Ok(Self::new(open_stream(file)?))
    }
}

impl<T: BufRead> Shard<T> {
    pub fn new(reader: T) -> Self {
        Self {
            reader: WarcReader::new(reader),
        }
    }

    /// Number of records successfully read so far.
    pub fn records_read(&self) -> usize {
        self.reader.records_read()
    }
}

impl<R: BufRead> Iterator for Shard<R> {
    type Item = Result<Record, Error>;
    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::{Cursor, Write};

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::{open_stream, Record, RecordType, Shard};

    fn warc_bytes(nb: usize) -> Vec<u8> {
        let mut out = Vec::new();
        for i in 0..nb {
            Record::new(
                RecordType::Response,
                HashMap::new(),
                format!("HTTP/1.1 200 OK\r\n\r\nbody {}", i).into_bytes(),
            )
            .write_to(&mut out)
            .unwrap();
        }
        out
    }

    #[test]
    fn plain_stream() {
        let stream = open_stream(Cursor::new(warc_bytes(3))).unwrap();
        assert_eq!(Shard::new(stream).filter(Result::is_ok).count(), 3);
    }

    #[test]
    fn multi_member_gzip() {
        // one gzip member per record, as in Common Crawl
        let mut compressed = Vec::new();
        let mut plain = Vec::new();
        for i in 0..3 {
            let mut record = Vec::new();
            Record::new(
                RecordType::Response,
                HashMap::new(),
                format!("HTTP/1.1 200 OK\r\n\r\nbody {}", i).into_bytes(),
            )
            .write_to(&mut record)
            .unwrap();
            plain.extend_from_slice(&record);

            let mut enc = GzEncoder::new(Vec::new(), Compression::default());
            enc.write_all(&record).unwrap();
            compressed.extend(enc.finish().unwrap());
        }

        let from_gz: Vec<Record> = Shard::new(open_stream(Cursor::new(compressed)).unwrap())
            .map(|r| r.unwrap())
            .collect();
        let from_plain: Vec<Record> = Shard::new(open_stream(Cursor::new(plain)).unwrap())
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(from_gz.len(), 3);
        assert_eq!(from_gz, from_plain);
    }

    #[test]
    fn from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CC-MAIN-0-00000.warc");
        std::fs::write(&path, warc_bytes(2)).unwrap();
        let shard = Shard::from_path(&path).unwrap();
        assert_eq!(shard.count(), 2);
    }
}
