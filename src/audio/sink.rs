//! Utilities for creating `rodio` sinks from stream URLs.
//!
//! The helper here opens the HTTP stream, wraps it for the decoder and
//! prepares a paused `Sink` ready to be started.

use rodio::{Decoder, OutputStream, Sink};

use super::stream::NetworkStream;
use super::types::PlaybackError;

/// Create a paused `Sink` fed by the audio stream at `url`.
pub(super) fn create_stream_sink(
    stream: &OutputStream,
    agent: &ureq::Agent,
    url: &str,
) -> Result<Sink, PlaybackError> {
    let response = agent.get(url).call().map_err(|e| PlaybackError::Connect {
        url: url.to_string(),
        source: Box::new(e),
    })?;

    let hint = format_hint(response.content_type());
    let reader = NetworkStream::new(response.into_reader());

    let mut builder = Decoder::builder().with_data(reader).with_seekable(false);
    if let Some(hint) = hint {
        builder = builder.with_hint(hint);
    }
    let source = builder.build().map_err(|e| PlaybackError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}

/// Container hint for the decoder probe, from the response `Content-Type`.
pub(super) fn format_hint(content_type: &str) -> Option<&'static str> {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "audio/mpeg" | "audio/mp3" | "audio/mpeg3" => Some("mp3"),
        "audio/aac" | "audio/aacp" | "audio/x-aac" => Some("aac"),
        "audio/ogg" | "application/ogg" => Some("ogg"),
        "audio/flac" | "audio/x-flac" => Some("flac"),
        _ => None,
    }
}
