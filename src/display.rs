//! Text formatting for the live block and for notifications.

use chrono::{DateTime, Utc};

use crate::catalog::Station;
use crate::metadata::TrackInfo;

const KEY_HELP: &str = "[n/l/→] next | [p/h/←] previous | [space] play/pause | [q] quit";

/// Everything the live block shows at one instant.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub station: Option<Station>,
    pub track: &'a TrackInfo,
    /// At least one fetch for `station` succeeded.
    pub loaded: bool,
    pub status: Option<&'a str>,
    pub show_controls: bool,
}

/// Summary and body of a "track changed" notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub summary: String,
    pub body: String,
}

/// `MM:SS`, or `H:MM:SS` from one hour up. Negative values clamp to zero.
pub fn format_clock(secs: i64) -> String {
    let secs = secs.max(0);
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// One line for a track: `title - artist [album] (remaining / total)`.
pub fn track_line(track: &TrackInfo, now: DateTime<Utc>) -> String {
    let mut line = track.title.clone();
    if !track.artist.is_empty() {
        line.push_str(" - ");
        line.push_str(&track.artist);
    }
    if !track.album.is_empty() {
        line.push_str(" [");
        line.push_str(&track.album);
        line.push(']');
    }

    if track.has_duration() {
        let total = format_clock(track.duration_secs.floor() as i64);
        match track.remaining_secs(now) {
            Some(remaining) if remaining > 0 => {
                line.push_str(&format!(" ({} / {total})", format_clock(remaining)));
            }
            _ => line.push_str(&format!(" ({total})")),
        }
    }
    line
}

pub fn render_lines(view: &View<'_>, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = Vec::with_capacity(4);

    match view.station {
        None => lines.push("Waiting for a station…".to_string()),
        Some(station) => {
            lines.push(format!("♪ {}", station.name()));
            if view.loaded || !view.track.title.is_empty() {
                lines.push(track_line(view.track, now));
            } else {
                lines.push(format!("Loading {}…", station.name()));
            }
        }
    }

    if let Some(status) = view.status {
        lines.push(format!("Error: {status}"));
    }
    if view.show_controls {
        lines.push(KEY_HELP.to_string());
    }
    lines
}

/// Title as summary; artist as body, or the station name when the artist is unknown.
pub fn notification(station: Station, track: &TrackInfo) -> Notification {
    let body = if track.artist.is_empty() {
        station.name().to_string()
    } else {
        track.artist.clone()
    };
    Notification {
        summary: track.title.clone(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn full_track() -> TrackInfo {
        TrackInfo {
            title: "Song".to_string(),
            artist: "Band".to_string(),
            album: "Record".to_string(),
            duration_secs: 200.0,
            started_at: Some(at(1_000)),
        }
    }

    #[test]
    fn clock_switches_to_hours_at_one_hour() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(75), "01:15");
        assert_eq!(format_clock(3599), "59:59");
        assert_eq!(format_clock(3600), "1:00:00");
        assert_eq!(format_clock(3930), "1:05:30");
        assert_eq!(format_clock(-5), "00:00");
    }

    #[test]
    fn zero_duration_has_no_time_segment() {
        let track = TrackInfo {
            artist: "Band".to_string(),
            ..TrackInfo::titled("Song")
        };
        assert_eq!(track_line(&track, at(0)), "Song - Band");
    }

    #[test]
    fn running_track_shows_remaining_and_total() {
        assert_eq!(
            track_line(&full_track(), at(1_050)),
            "Song - Band [Record] (02:30 / 03:20)"
        );
    }

    #[test]
    fn overrun_track_shows_total_only() {
        assert_eq!(
            track_line(&full_track(), at(1_200)),
            "Song - Band [Record] (03:20)"
        );
        assert_eq!(
            track_line(&full_track(), at(5_000)),
            "Song - Band [Record] (03:20)"
        );
    }

    #[test]
    fn unknown_start_shows_total_only() {
        let track = TrackInfo {
            started_at: None,
            ..full_track()
        };
        assert_eq!(track_line(&track, at(0)), "Song - Band [Record] (03:20)");
    }

    #[test]
    fn album_without_artist() {
        let track = TrackInfo {
            album: "Record".to_string(),
            ..TrackInfo::titled("Song")
        };
        assert_eq!(track_line(&track, at(0)), "Song [Record]");
    }

    #[test]
    fn block_shows_loading_until_first_fetch() {
        let track = TrackInfo::default();
        let view = View {
            station: Some(Station::SpaDay),
            track: &track,
            loaded: false,
            status: None,
            show_controls: false,
        };
        assert_eq!(
            render_lines(&view, at(0)),
            vec!["♪ Spa Day".to_string(), "Loading Spa Day…".to_string()]
        );
    }

    #[test]
    fn block_includes_status_and_help() {
        let track = TrackInfo::titled("Song");
        let view = View {
            station: Some(Station::WdwnTunes),
            track: &track,
            loaded: true,
            status: Some("timed out"),
            show_controls: true,
        };
        let lines = render_lines(&view, at(0));
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "Song");
        assert_eq!(lines[2], "Error: timed out");
        assert_eq!(lines[3], KEY_HELP);
    }

    #[test]
    fn notification_falls_back_to_station_name() {
        let n = notification(Station::DParkResort, &TrackInfo::titled("Song"));
        assert_eq!(n.summary, "Song");
        assert_eq!(n.body, "DPark Radio Resort");

        let n = notification(Station::DParkResort, &full_track());
        assert_eq!(n.body, "Band");
    }
}
