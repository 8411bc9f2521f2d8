//! Metadata poller.
//!
//! Runs on its own thread and owns the [`PollState`] and the console. It
//! wakes when a station is published on its queue or when the queue stays
//! quiet for one poll interval. A fetch only happens when the station just
//! changed or the last successful fetch is at least one interval old; every
//! wake redraws the block so the countdown keeps moving.

use std::thread::{self, JoinHandle};
use std::time::Instant;

use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, select};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::catalog::Station;
use crate::config::{ParseFailurePolicy, PollSettings};
use crate::display::{View, render_lines};
use crate::http::Fetch;
use crate::metadata::ParseError;
use crate::notify::TrackSink;
use crate::shutdown::Shutdown;
use crate::ui::Console;

mod state;

pub use state::PollState;

#[derive(Debug, Error)]
pub enum PollError {
    #[error("metadata from {station} is unreadable: {source}")]
    Parse {
        station: Station,
        #[source]
        source: ParseError,
    },
}

pub struct Poller<F, C> {
    fetch: F,
    console: C,
    sinks: Vec<Box<dyn TrackSink + Send>>,
    settings: PollSettings,
    show_controls: bool,
    state: PollState,
}

impl<F: Fetch, C: Console> Poller<F, C> {
    pub fn new(fetch: F, console: C, settings: PollSettings, show_controls: bool) -> Self {
        Self {
            fetch,
            console,
            sinks: Vec::new(),
            settings,
            show_controls,
            state: PollState::default(),
        }
    }

    /// Register a sink told about every title change.
    pub fn add_sink(&mut self, sink: impl TrackSink + Send + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Handle one wake-up: an optional published station, then a fetch if due, then a redraw.
    pub fn wake(
        &mut self,
        published: Option<Station>,
        now: Instant,
        wall: DateTime<Utc>,
    ) -> Result<(), PollError> {
        if let Some(station) = published {
            if self.state.activate(station) {
                info!(%station, "source changed");
                self.render(wall);
            }
        }

        let result = match self.state.active() {
            Some(station) if self.state.fetch_due(now, self.settings.interval()) => {
                self.fetch(station, now, wall)
            }
            _ => Ok(()),
        };

        self.render(wall);
        result
    }

    fn fetch(
        &mut self,
        station: Station,
        now: Instant,
        wall: DateTime<Utc>,
    ) -> Result<(), PollError> {
        let url = station.metadata_url(wall);
        debug!(%station, %url, "fetching metadata");

        let body = match self.fetch.get(&url) {
            Ok(body) if body.is_empty() => {
                warn!(%station, "empty metadata response");
                self.state.set_status(format!("empty response from {station}"));
                return Ok(());
            }
            Ok(body) => body,
            Err(e) => {
                warn!(%station, error = %e, "metadata fetch failed");
                self.state.set_status(e.to_string());
                return Ok(());
            }
        };

        match station.parse(&body) {
            Ok(track) => {
                self.state.mark_fetched(now);
                self.state.clear_status();
                if self.state.replace_track(track) {
                    let track = self.state.current();
                    info!(%station, title = %track.title, artist = %track.artist, "now playing");
                    for sink in &mut self.sinks {
                        sink.track_changed(station, track);
                    }
                }
                Ok(())
            }
            Err(source) => match self.settings.on_parse_error {
                ParseFailurePolicy::Fatal => {
                    self.state
                        .set_status(format!("unreadable metadata from {station}"));
                    Err(PollError::Parse { station, source })
                }
                ParseFailurePolicy::Log => {
                    warn!(%station, error = %source, "unreadable metadata, keeping last track");
                    self.state.mark_fetched(now);
                    self.state
                        .set_status(format!("unreadable metadata from {station}"));
                    Ok(())
                }
            },
        }
    }

    fn render(&mut self, wall: DateTime<Utc>) {
        let view = View {
            station: self.state.active(),
            track: self.state.current(),
            loaded: self.state.has_fetched(),
            status: self.state.status(),
            show_controls: self.show_controls,
        };
        let lines = render_lines(&view, wall);
        if let Err(e) = self.console.show(&lines) {
            debug!(error = %e, "console draw failed");
        }
    }

    /// Block on the source queue until shutdown, the queue closing, or a fatal error.
    pub fn run(&mut self, sources: &Receiver<Station>, shutdown: &Shutdown) -> Result<(), PollError> {
        self.render(Utc::now());
        loop {
            let published = select! {
                recv(sources) -> msg => match msg {
                    Ok(station) => Some(station),
                    Err(_) => return Ok(()),
                },
                recv(shutdown.signal()) -> _ => return Ok(()),
                default(self.settings.interval()) => None,
            };
            self.wake(published, Instant::now(), Utc::now())?;
        }
    }

    fn close(&mut self) {
        if let Err(e) = self.console.close() {
            debug!(error = %e, "console close failed");
        }
    }
}

/// Run `poller` on its own thread. A fatal error triggers shutdown before the thread returns it.
pub fn spawn_poller<F, C>(
    mut poller: Poller<F, C>,
    sources: Receiver<Station>,
    shutdown: Shutdown,
) -> JoinHandle<Result<(), PollError>>
where
    F: Fetch + Send + 'static,
    C: Console + Send + 'static,
{
    thread::spawn(move || {
        let result = poller.run(&sources, &shutdown);
        if let Err(ref e) = result {
            error!(error = %e, "poller stopped");
            shutdown.trigger();
        }
        poller.close();
        result
    })
}

#[cfg(test)]
mod tests;
