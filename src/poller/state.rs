use std::time::{Duration, Instant};

use crate::catalog::Station;
use crate::metadata::TrackInfo;

/// Mutable poll state. Only the poller thread touches it.
#[derive(Debug, Default)]
pub struct PollState {
    last_fetched_at: Option<Instant>,
    current: TrackInfo,
    active: Option<Station>,
    status: Option<String>,
}

impl PollState {
    /// Make `station` active. A different station resets the track and makes a fetch due.
    pub fn activate(&mut self, station: Station) -> bool {
        if self.active == Some(station) {
            return false;
        }
        *self = Self {
            active: Some(station),
            ..Self::default()
        };
        true
    }

    /// Debounce: fetch when nothing was fetched yet or `interval` has passed.
    pub fn fetch_due(&self, now: Instant, interval: Duration) -> bool {
        match self.last_fetched_at {
            None => true,
            Some(at) => now.saturating_duration_since(at) >= interval,
        }
    }

    pub fn mark_fetched(&mut self, now: Instant) {
        self.last_fetched_at = Some(now);
    }

    /// Replace the current track; `true` when the title changed to a non-empty one.
    pub fn replace_track(&mut self, track: TrackInfo) -> bool {
        let changed = !track.title.is_empty() && track.title != self.current.title;
        self.current = track;
        changed
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn active(&self) -> Option<Station> {
        self.active
    }

    pub fn current(&self) -> &TrackInfo {
        &self.current
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn has_fetched(&self) -> bool {
        self.last_fetched_at.is_some()
    }
}
