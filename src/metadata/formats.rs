use serde::Deserialize;

use super::error::ParseError;
use super::fields::{from_epoch_millis, parse_iso_duration, parse_offset_datetime, parse_wrapped_epoch};
use super::track::TrackInfo;

/// Separator used by sources that publish one free-text "now playing" field.
const SEGMENT_SEPARATOR: &str = " - ";

/// The upstream metadata shapes a station can publish.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WireFormat {
    /// `{"nowplaying": "Album - Title - Artist"}` (RadioBoss).
    Delimited,
    /// A recently-played list, newest first (SAM Cloud history).
    History,
    /// A single object with a `current-track` sub-object (Live365).
    KeyedCurrent,
    /// A paginated `results` collection, newest first (Streemlion).
    PagedResults,
}

impl WireFormat {
    pub fn label(self) -> &'static str {
        match self {
            Self::Delimited => "now-playing text",
            Self::History => "play history",
            Self::KeyedCurrent => "current track",
            Self::PagedResults => "paged history",
        }
    }

    /// Normalize a raw payload in this format.
    pub fn parse(self, raw: &[u8]) -> Result<TrackInfo, ParseError> {
        match self {
            Self::Delimited => parse_delimited(raw),
            Self::History => parse_history(raw),
            Self::KeyedCurrent => parse_keyed_current(raw),
            Self::PagedResults => parse_paged(raw),
        }
    }

    fn decode<'a, T: Deserialize<'a>>(self, raw: &'a [u8]) -> Result<T, ParseError> {
        serde_json::from_slice(raw).map_err(|e| ParseError::malformed(self.label(), e, raw))
    }
}

#[derive(Debug, Default, Deserialize)]
struct NowPlayingText {
    #[serde(default, rename = "nowplaying")]
    now_playing: Option<String>,
}

fn parse_delimited(raw: &[u8]) -> Result<TrackInfo, ParseError> {
    let resp: NowPlayingText = WireFormat::Delimited.decode(raw)?;
    Ok(split_now_playing(&resp.now_playing.unwrap_or_default()))
}

/// Map `Album - Title - Artist`; anything with fewer segments is a bare title.
pub(crate) fn split_now_playing(text: &str) -> TrackInfo {
    let segments: Vec<&str> = text.split(SEGMENT_SEPARATOR).collect();
    if segments.len() < 3 {
        return TrackInfo::titled(text);
    }

    TrackInfo {
        album: segments[0].to_string(),
        title: segments[1].to_string(),
        artist: segments[2].to_string(),
        ..TrackInfo::default()
    }
}

#[derive(Debug, Deserialize)]
struct HistoryItem {
    #[serde(default, rename = "Title")]
    title: Option<String>,
    #[serde(default, rename = "Album")]
    album: Option<String>,
    #[serde(default, rename = "Artist")]
    artist: Option<String>,
    #[serde(default, rename = "Duration")]
    duration: Option<String>,
    #[serde(default, rename = "DatePlayed")]
    date_played: Option<String>,
}

fn parse_history(raw: &[u8]) -> Result<TrackInfo, ParseError> {
    let items: Vec<HistoryItem> = WireFormat::History.decode(raw)?;

    // An empty history is a quiet station, not an error.
    let Some(current) = items.into_iter().next() else {
        return Ok(TrackInfo::default());
    };

    Ok(TrackInfo {
        title: current.title.unwrap_or_default(),
        artist: current.artist.unwrap_or_default(),
        album: current.album.unwrap_or_default(),
        duration_secs: current.duration.as_deref().map(parse_iso_duration).unwrap_or(0.0),
        started_at: current.date_played.as_deref().and_then(parse_wrapped_epoch),
    })
}

#[derive(Debug, Default, Deserialize)]
struct CurrentTrackResponse {
    #[serde(default, rename = "current-track")]
    current_track: Option<CurrentTrack>,
}

#[derive(Debug, Default, Deserialize)]
struct CurrentTrack {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

fn parse_keyed_current(raw: &[u8]) -> Result<TrackInfo, ParseError> {
    let resp: CurrentTrackResponse = WireFormat::KeyedCurrent.decode(raw)?;
    let track = resp.current_track.unwrap_or_default();

    Ok(TrackInfo {
        title: track.title.unwrap_or_default(),
        artist: track.artist.unwrap_or_default(),
        album: String::new(),
        duration_secs: track.duration.filter(|d| d.is_finite() && *d > 0.0).unwrap_or(0.0),
        started_at: track.start.as_deref().and_then(parse_offset_datetime),
    })
}

#[derive(Debug, Deserialize)]
struct PagedHistory {
    #[serde(default)]
    results: Vec<PagedItem>,
}

#[derive(Debug, Deserialize)]
struct PagedItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author: Option<String>,
    /// Milliseconds.
    #[serde(default)]
    length: Option<f64>,
    /// Epoch milliseconds.
    #[serde(default)]
    ts: Option<f64>,
}

fn parse_paged(raw: &[u8]) -> Result<TrackInfo, ParseError> {
    let page: PagedHistory = WireFormat::PagedResults.decode(raw)?;

    let Some(current) = page.results.into_iter().next() else {
        return Err(ParseError::Empty {
            format: WireFormat::PagedResults.label(),
        });
    };

    Ok(TrackInfo {
        title: current.title.unwrap_or_default(),
        artist: current.author.unwrap_or_default(),
        album: String::new(),
        duration_secs: current
            .length
            .filter(|ms| ms.is_finite() && *ms > 0.0)
            .map(|ms| ms / 1000.0)
            .unwrap_or(0.0),
        started_at: current
            .ts
            .filter(|ms| ms.is_finite() && *ms > 0.0)
            .and_then(|ms| from_epoch_millis(ms as i64)),
    })
}
