use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::sink::create_stream_sink;
use super::types::PlaybackError;

/// What the playback thread needs from an audio backend.
pub trait PlaybackEngine {
    type Handle;

    /// Open `url` and prepare it, paused.
    fn load(&mut self, url: &str) -> Result<Self::Handle, PlaybackError>;
    fn play(&mut self, handle: &Self::Handle) -> Result<(), PlaybackError>;
    fn pause(&mut self, handle: &Self::Handle, paused: bool);
    /// Stop and drop a handle. Called before the next `play`.
    fn release(&mut self, handle: Self::Handle);
    /// The stream ran dry (server closed it or the decoder hit the end).
    fn finished(&self, handle: &Self::Handle) -> bool;
}

/// `rodio` output device plus the HTTP agent used to open streams.
pub struct RodioEngine {
    stream: OutputStream,
    agent: ureq::Agent,
}

impl RodioEngine {
    pub fn open(agent: ureq::Agent) -> Result<Self, PlaybackError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would
        // scribble over the live block.
        stream.log_on_drop(false);
        Ok(Self { stream, agent })
    }
}

impl PlaybackEngine for RodioEngine {
    type Handle = Sink;

    fn load(&mut self, url: &str) -> Result<Sink, PlaybackError> {
        create_stream_sink(&self.stream, &self.agent, url)
    }

    fn play(&mut self, handle: &Sink) -> Result<(), PlaybackError> {
        handle.play();
        Ok(())
    }

    fn pause(&mut self, handle: &Sink, paused: bool) {
        if paused {
            handle.pause();
        } else {
            handle.play();
        }
    }

    fn release(&mut self, handle: Sink) {
        handle.stop();
    }

    fn finished(&self, handle: &Sink) -> bool {
        handle.empty()
    }
}
