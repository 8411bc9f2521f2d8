//! Blocking HTTP transport for metadata fetches and audio streams.

use std::io::{self, Read};
use std::time::Duration;

use thiserror::Error;

use crate::config::HttpSettings;

/// Upper bound on a metadata body; the largest upstream answer is a few KiB.
const MAX_BODY_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("GET {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("reading body of {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: io::Error,
    },
}

/// The plain GET collaborator used by the poller.
pub trait Fetch {
    /// Fetch `url` and return the full body. No retries.
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

/// `Fetch` backed by a shared `ureq::Agent`.
#[derive(Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
}

impl HttpClient {
    pub fn new(settings: &HttpSettings) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(settings.connect_timeout_secs))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(&settings.user_agent)
            .build();
        Self { agent }
    }
}

impl Fetch for HttpClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| TransportError::Request {
                url: url.to_string(),
                source: Box::new(e),
            })?;

        let mut body = Vec::new();
        response
            .into_reader()
            .take(MAX_BODY_BYTES)
            .read_to_end(&mut body)
            .map_err(|e| TransportError::Body {
                url: url.to_string(),
                source: e,
            })?;
        Ok(body)
    }
}

/// Agent for long-lived audio streams: bounded connect and per-read waits, no overall deadline.
pub fn stream_agent(settings: &HttpSettings) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_secs(settings.connect_timeout_secs))
        .timeout_read(Duration::from_secs(settings.stream_read_timeout_secs))
        .user_agent(&settings.user_agent)
        .build()
}
