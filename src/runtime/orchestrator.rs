use std::time::Duration;

use chrono::Utc;
use crossbeam_channel::{Receiver, Sender, select};
use tracing::{debug, info};

use crate::audio::{AudioCmd, PlaybackState};
use crate::catalog::{Catalog, Station};
use crate::keys::ControlCmd;
use crate::mpris::MprisHandle;
use crate::shutdown::Shutdown;

/// Where the orchestrator sends its decisions.
pub trait Fanout {
    fn load(&mut self, url: String);
    fn toggle_pause(&mut self);
    /// Publish the active station to the poller.
    fn publish(&mut self, station: Station);
    fn playback_changed(&mut self, state: PlaybackState);
}

/// Channel-backed fan-out to the playback thread, the poller and MPRIS.
pub struct ChannelFanout {
    pub audio: Sender<AudioCmd>,
    pub sources: Sender<Station>,
    pub mpris: Option<MprisHandle>,
}

impl Fanout for ChannelFanout {
    fn load(&mut self, url: String) {
        if self.audio.send(AudioCmd::Load(url)).is_err() {
            debug!("playback thread gone, dropping load");
        }
    }

    fn toggle_pause(&mut self) {
        if self.audio.send(AudioCmd::TogglePause).is_err() {
            debug!("playback thread gone, dropping pause");
        }
    }

    fn publish(&mut self, station: Station) {
        if self.sources.send(station).is_err() {
            debug!(%station, "poller gone, dropping publication");
        }
    }

    fn playback_changed(&mut self, state: PlaybackState) {
        if let Some(mpris) = &self.mpris {
            mpris.set_playback(state);
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the catalog cursor and turns control commands into playback and poll messages.
pub struct Orchestrator {
    catalog: Catalog,
    cursor: usize,
    playback: PlaybackState,
}

impl Orchestrator {
    pub fn new(catalog: Catalog, start: usize) -> Self {
        let cursor = start % catalog.len();
        Self {
            catalog,
            cursor,
            playback: PlaybackState::Stopped,
        }
    }

    pub fn current(&self) -> Station {
        self.catalog.station(self.cursor)
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    /// Play the station under the cursor, exactly like a switch.
    pub fn start(&mut self, out: &mut impl Fanout) {
        self.switch(out);
    }

    pub fn handle(&mut self, cmd: ControlCmd, out: &mut impl Fanout) -> Flow {
        match cmd {
            ControlCmd::Next => {
                self.cursor = self.catalog.next(self.cursor);
                self.switch(out);
            }
            ControlCmd::Prev => {
                self.cursor = self.catalog.previous(self.cursor);
                self.switch(out);
            }
            ControlCmd::PlayPause => self.toggle(out),
            ControlCmd::Play if self.playback == PlaybackState::Paused => self.toggle(out),
            ControlCmd::Pause if self.playback == PlaybackState::Playing => self.toggle(out),
            ControlCmd::Play | ControlCmd::Pause => {}
            ControlCmd::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Re-publish the current station; the poller's debounce absorbs it.
    pub fn on_tick(&self, out: &mut impl Fanout) {
        out.publish(self.current());
    }

    /// Load the new stream first, then tell the poller.
    fn switch(&mut self, out: &mut impl Fanout) {
        let station = self.current();
        info!(%station, index = self.cursor, "switching station");
        out.load(station.stream_url(Utc::now()));
        out.publish(station);
        self.playback = PlaybackState::Playing;
        out.playback_changed(self.playback);
    }

    fn toggle(&mut self, out: &mut impl Fanout) {
        if self.playback == PlaybackState::Stopped {
            return;
        }
        out.toggle_pause();
        self.playback = self.playback.toggled();
        out.playback_changed(self.playback);
    }
}

/// Main loop: actions, ticks and shutdown. Returns once shutdown is triggered.
pub fn run(
    orchestrator: &mut Orchestrator,
    actions: &Receiver<ControlCmd>,
    tick: Duration,
    shutdown: &Shutdown,
    out: &mut impl Fanout,
) {
    orchestrator.start(out);
    let ticker = crossbeam_channel::tick(tick);

    loop {
        select! {
            recv(actions) -> msg => {
                let flow = match msg {
                    Ok(cmd) => orchestrator.handle(cmd, out),
                    Err(_) => Flow::Quit,
                };
                if flow == Flow::Quit {
                    info!("quit requested");
                    shutdown.trigger();
                    return;
                }
            }
            recv(ticker) -> _ => orchestrator.on_tick(out),
            recv(shutdown.signal()) -> _ => return,
        }
    }
}
