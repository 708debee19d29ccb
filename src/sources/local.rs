use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::debug;

use super::ByteSource;
use crate::error::Error;

/// Reads archives from the filesystem.
///
/// Relative identifiers are resolved against the base directory, if any.
#[derive(Debug, Clone, Default)]
pub struct LocalSource {
    base: Option<PathBuf>,
}

impl LocalSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base<P: AsRef<Path>>(base: P) -> Self {
        Self {
            base: Some(base.as_ref().to_path_buf()),
        }
    }

    /// Path that `id` resolves to.
    pub fn resolve(&self, id: &str) -> PathBuf {
        match &self.base {
            Some(base) => base.join(id),
            None => PathBuf::from(id),
        }
    }
}

impl ByteSource for LocalSource {
    fn open(&self, id: &str) -> Result<Box<dyn Read + Send>, Error> {
        let path = self.resolve(id);
        debug!("opening {:?}", path);
        let f = File::open(&path)?;
        Ok(Box::new(f))
    }
}
