use chrono::{DateTime, Duration as ChronoDuration, Utc};

/// Normalized "now playing" snapshot for one fetch.
///
/// Unknown fields keep their zero value: empty strings, a `0.0` duration
/// (unknown or unbounded) and no start time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackInfo {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Track length in seconds; `0.0` when unknown.
    pub duration_secs: f64,
    pub started_at: Option<DateTime<Utc>>,
}

impl TrackInfo {
    /// Track made of free text only, as sent by sources without structure.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn has_duration(&self) -> bool {
        self.duration_secs > 0.0
    }

    /// Wall-clock time the track should end, when both start and length are known.
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        if !self.has_duration() {
            return None;
        }
        let started_at = self.started_at?;
        let millis = (self.duration_secs * 1000.0).round() as i64;
        started_at.checked_add_signed(ChronoDuration::milliseconds(millis))
    }

    /// Whole seconds left before `ends_at`, possibly negative once the track overran.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> Option<i64> {
        self.ends_at().map(|end| (end - now).num_seconds())
    }
}
