/*! Archive byte sources

A [ByteSource] turns an archive identifier (usually a line of a Common Crawl `warc.paths` file)
into a stream of raw bytes.

- [LocalSource] reads files, optionally relative to a base directory.
- [HttpSource] fetches archives over HTTP, retrying failed requests.

Sources do not decompress: see [crate::shard::open_stream].
!*/
mod http;
mod local;
mod paths;

use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::Error;
pub use http::{HttpSource, BASE_URL};
pub use local::LocalSource;
pub use paths::{read_paths, read_paths_file};

/// Supplies the raw bytes of one archive.
pub trait ByteSource: Send + Sync {
    /// Open the archive named `id`.
    fn open(&self, id: &str) -> Result<Box<dyn Read + Send>, Error>;
}

/// Reader that counts the bytes read through it.
///
/// The counter is shared so that it can still be read once the reader
/// has been moved into a decoder.
pub struct CountingReader<R> {
    inner: R,
    count: Arc<AtomicU64>,
}

impl<R: Read> CountingReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Handle on the byte counter.
    pub fn counter(&self) -> Arc<AtomicU64> {
        self.count.clone()
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}
