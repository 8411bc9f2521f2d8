//! Audio-related small types.
//!
//! Commands accepted by the playback thread, the playback state shown to
//! MPRIS, and the errors a playback engine can raise.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCmd {
    /// Release the current stream and start playing the given URL.
    Load(String),
    /// Toggle pause/resume of the current stream.
    TogglePause,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Playing => Self::Paused,
            Self::Paused => Self::Playing,
            Self::Stopped => Self::Stopped,
        }
    }
}

/// Engine failures. All of them end playback: a half-loaded engine is not reused.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    Output(String),
    #[error("could not open stream {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("could not decode stream {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("playback thread panicked")]
    Panicked,
}
