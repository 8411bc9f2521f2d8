//! One-shot shutdown broadcast shared by every thread.
//!
//! The signal is a channel that never carries a message: triggering drops
//! the only sender, which disconnects every cloned receiver at once. Each
//! blocking `select!` in the player includes `recv(shutdown.signal())`.

use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

#[derive(Clone)]
pub struct Shutdown {
    trigger: Arc<Mutex<Option<Sender<Infallible>>>>,
    signal: Receiver<Infallible>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::bounded(0);
        Self {
            trigger: Arc::new(Mutex::new(Some(tx))),
            signal: rx,
        }
    }

    /// Close the signal. Returns `true` for the call that actually closed it.
    pub fn trigger(&self) -> bool {
        let mut slot = self.trigger.lock().unwrap_or_else(|e| e.into_inner());
        slot.take().is_some()
    }

    /// Receiver that becomes ready (disconnected) once shutdown is triggered.
    pub fn signal(&self) -> &Receiver<Infallible> {
        &self.signal
    }

    pub fn is_triggered(&self) -> bool {
        matches!(self.signal.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Sleep for at most `timeout`; `true` when woken by shutdown.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        matches!(
            self.signal.recv_timeout(timeout),
            Err(RecvTimeoutError::Disconnected)
        )
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
