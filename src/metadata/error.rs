use thiserror::Error;

/// A metadata payload that could not be turned into a track.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The payload does not have the expected shape at all.
    #[error("failed to decode {format} metadata: {source} ({raw})")]
    Malformed {
        format: &'static str,
        #[source]
        source: serde_json::Error,
        /// The raw payload, kept for diagnostics.
        raw: String,
    },
    /// The payload decoded but lists no track.
    #[error("{format} metadata lists no tracks")]
    Empty { format: &'static str },
}

impl ParseError {
    pub(crate) fn malformed(format: &'static str, source: serde_json::Error, raw: &[u8]) -> Self {
        Self::Malformed {
            format,
            source,
            raw: String::from_utf8_lossy(raw).into_owned(),
        }
    }
}
