//! Stream playback.
//!
//! A dedicated thread owns the playback engine and the one live stream
//! session. It takes `AudioCmd`s over a channel, swaps sessions on `Load`
//! (old one released before the new one plays) and ends, triggering the
//! shared shutdown, when the stream runs dry or the engine fails.

mod engine;
mod player;
mod sink;
mod stream;
mod thread;
mod types;

pub use engine::{PlaybackEngine, RodioEngine};
pub use player::AudioPlayer;
pub use stream::NetworkStream;
pub use types::{AudioCmd, PlaybackError, PlaybackState};

#[cfg(test)]
mod tests;
