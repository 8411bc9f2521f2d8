use std::sync::Mutex;
use std::thread::JoinHandle;

use crossbeam_channel::{SendError, Sender};

use crate::shutdown::Shutdown;

use super::engine::{PlaybackEngine, RodioEngine};
use super::thread::spawn_playback_thread;
use super::types::{AudioCmd, PlaybackError};

/// Handle to the playback thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<Result<(), PlaybackError>>>>,
}

impl AudioPlayer {
    /// Start the playback thread on the default output device.
    pub fn spawn(agent: ureq::Agent, shutdown: Shutdown) -> Self {
        Self::with_engine(move || RodioEngine::open(agent), shutdown)
    }

    pub fn with_engine<E, F>(open: F, shutdown: Shutdown) -> Self
    where
        E: PlaybackEngine + 'static,
        F: FnOnce() -> Result<E, PlaybackError> + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::unbounded::<AudioCmd>();
        let handle = spawn_playback_thread(open, rx, shutdown);
        Self {
            tx,
            join: Mutex::new(Some(handle)),
        }
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    pub fn sender(&self) -> Sender<AudioCmd> {
        self.tx.clone()
    }

    /// Wait for the playback thread and return how it ended.
    pub fn join(&self) -> Result<(), PlaybackError> {
        let handle = self
            .join
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        match handle {
            Some(h) => h.join().unwrap_or(Err(PlaybackError::Panicked)),
            None => Ok(()),
        }
    }
}
