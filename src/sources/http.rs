use std::io::Read;
use std::thread;
use std::time::Duration;

use log::{debug, error, warn};
use reqwest::blocking::Client;
use url::Url;

use super::ByteSource;
use crate::error::Error;

pub const BASE_URL: &str = "https://data.commoncrawl.org/";

/// Fetches archives over HTTP.
///
/// Identifiers are either absolute URLs or paths relative to the base URL.
/// A failed request is retried `retries` times, waiting `retry_delay` between attempts.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base: Url,
    client: Client,
    retries: usize,
    retry_delay: Duration,
}

impl HttpSource {
    /// Source on `base` with default retry settings (20 retries, 10s apart).
    pub fn new(base: &str) -> Result<Self, Error> {
        Self::with_retries(base, 20, Duration::from_secs(10))
    }

    pub fn with_retries(base: &str, retries: usize, retry_delay: Duration) -> Result<Self, Error> {
        // without a trailing slash, join would replace the last path component
        let base = if base.ends_with('/') {
            Url::parse(base)?
        } else {
            Url::parse(&format!("{}/", base))?
        };

        // archives are large, a global timeout would cut transfers
        let client = Client::builder().timeout(None::<Duration>).build()?;

        Ok(Self {
            base,
            client,
            retries,
            retry_delay,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL that `id` resolves to.
    pub fn resolve(&self, id: &str) -> Result<Url, Error> {
        match Url::parse(id) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Ok(self.base.join(id.trim_start_matches('/'))?)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn get(&self, url: &Url) -> Result<reqwest::blocking::Response, reqwest::Error> {
        self.client.get(url.clone()).send()?.error_for_status()
    }
}

impl ByteSource for HttpSource {
    fn open(&self, id: &str) -> Result<Box<dyn Read + Send>, Error> {
        let url = self.resolve(id)?;
        let mut attempt = 0;
        loop {
            debug!("GET {} (attempt {})", url, attempt + 1);
            match self.get(&url) {
                Ok(resp) => return Ok(Box::new(resp)),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    warn!(
                        "request to {} failed ({}), retrying in {:?} [{}/{}]",
                        url, e, self.retry_delay, attempt, self.retries
                    );
                    thread::sleep(self.retry_delay);
                }
                Err(e) => {
                    error!("giving up on {} after {} attempts", url, attempt + 1);
                    return Err(e.into());
                }
            }
        }
    }
}
