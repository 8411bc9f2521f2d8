use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, select};
use tracing::{debug, error, info};

use crate::shutdown::Shutdown;

use super::engine::PlaybackEngine;
use super::types::{AudioCmd, PlaybackError};

/// How often the thread checks whether the stream ran dry.
const END_CHECK_INTERVAL: Duration = Duration::from_millis(200);

struct Session<H> {
    handle: H,
    url: String,
    paused: bool,
    ended: bool,
}

/// Owns the engine and the single live session.
pub(super) struct PlaybackTask<E: PlaybackEngine> {
    engine: E,
    session: Option<Session<E::Handle>>,
}

impl<E: PlaybackEngine> PlaybackTask<E> {
    pub(super) fn new(engine: E) -> Self {
        Self {
            engine,
            session: None,
        }
    }

    pub(super) fn handle(&mut self, cmd: AudioCmd) -> Result<(), PlaybackError> {
        match cmd {
            AudioCmd::Load(url) => self.switch_to(url),
            AudioCmd::TogglePause => {
                self.toggle_pause();
                Ok(())
            }
        }
    }

    /// Release the current session, then load and start `url`.
    pub(super) fn switch_to(&mut self, url: String) -> Result<(), PlaybackError> {
        self.release();

        info!(%url, "loading stream");
        let handle = self.engine.load(&url)?;
        if let Err(e) = self.engine.play(&handle) {
            self.engine.release(handle);
            return Err(e);
        }

        self.session = Some(Session {
            handle,
            url,
            paused: false,
            ended: false,
        });
        Ok(())
    }

    /// Flip pause on the current session; returns the new paused flag.
    pub(super) fn toggle_pause(&mut self) -> Option<bool> {
        let session = self.session.as_mut()?;
        session.paused = !session.paused;
        self.engine.pause(&session.handle, session.paused);
        debug!(url = %session.url, paused = session.paused, "toggled pause");
        Some(session.paused)
    }

    /// `true` exactly once per load, when the playing stream has run dry.
    pub(super) fn poll_finished(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.ended || session.paused || !self.engine.finished(&session.handle) {
            return false;
        }
        session.ended = true;
        true
    }

    pub(super) fn release(&mut self) {
        if let Some(old) = self.session.take() {
            debug!(url = %old.url, "releasing stream");
            self.engine.release(old.handle);
        }
    }

    #[cfg(test)]
    pub(super) fn engine(&self) -> &E {
        &self.engine
    }
}

/// Spawn the playback thread. The engine is built inside the thread by `open`
/// because audio output handles are not `Send` on every platform.
///
/// The thread ends on shutdown, on end-of-stream, or on an engine error; in
/// every case it releases the session first and then triggers shutdown.
pub(super) fn spawn_playback_thread<E, F>(
    open: F,
    rx: Receiver<AudioCmd>,
    shutdown: Shutdown,
) -> JoinHandle<Result<(), PlaybackError>>
where
    E: PlaybackEngine + 'static,
    F: FnOnce() -> Result<E, PlaybackError> + Send + 'static,
{
    thread::spawn(move || {
        let engine = match open() {
            Ok(engine) => engine,
            Err(e) => {
                error!(error = %e, "audio engine failed to start");
                shutdown.trigger();
                return Err(e);
            }
        };

        let mut task = PlaybackTask::new(engine);
        let result = run(&mut task, &rx, &shutdown);
        task.release();

        if let Err(ref e) = result {
            error!(error = %e, "playback stopped");
        }
        shutdown.trigger();
        result
    })
}

fn run<E: PlaybackEngine>(
    task: &mut PlaybackTask<E>,
    rx: &Receiver<AudioCmd>,
    shutdown: &Shutdown,
) -> Result<(), PlaybackError> {
    loop {
        select! {
            recv(rx) -> msg => match msg {
                Ok(cmd) => task.handle(cmd)?,
                Err(_) => return Ok(()),
            },
            recv(shutdown.signal()) -> _ => return Ok(()),
            default(END_CHECK_INTERVAL) => {
                if task.poll_finished() {
                    info!("stream ended");
                    return Ok(());
                }
            }
        }
    }
}
