use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};

use super::*;
use crate::http::TransportError;
use crate::metadata::TrackInfo;

type Shared<T> = Arc<Mutex<T>>;

/// Answers GETs from a script; repeats the last answer when the script runs out.
#[derive(Clone, Default)]
struct ScriptedFetch {
    answers: Shared<VecDeque<Result<Vec<u8>, String>>>,
    urls: Shared<Vec<String>>,
}

impl ScriptedFetch {
    fn answering(answers: Vec<Result<&str, &str>>) -> Self {
        let fetch = Self::default();
        *fetch.answers.lock().unwrap() = answers
            .into_iter()
            .map(|a| a.map(|b| b.as_bytes().to_vec()).map_err(str::to_string))
            .collect();
        fetch
    }

    fn gets(&self) -> usize {
        self.urls.lock().unwrap().len()
    }
}

impl Fetch for ScriptedFetch {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.urls.lock().unwrap().push(url.to_string());
        let mut answers = self.answers.lock().unwrap();
        let answer = if answers.len() > 1 {
            answers.pop_front()
        } else {
            answers.front().cloned()
        };
        match answer {
            Some(Ok(body)) => Ok(body),
            Some(Err(msg)) => Err(TransportError::Body {
                url: url.to_string(),
                source: io::Error::other(msg),
            }),
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Clone, Default)]
struct RecordingConsole {
    frames: Shared<Vec<Vec<String>>>,
}

impl RecordingConsole {
    fn last(&self) -> Vec<String> {
        self.frames.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl Console for RecordingConsole {
    fn show(&mut self, lines: &[String]) -> io::Result<()> {
        self.frames.lock().unwrap().push(lines.to_vec());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct RecordingSink {
    changes: Shared<Vec<(Station, String)>>,
}

impl TrackSink for RecordingSink {
    fn track_changed(&mut self, station: Station, track: &TrackInfo) {
        self.changes
            .lock()
            .unwrap()
            .push((station, track.title.clone()));
    }
}

const SONG_A: &str = r#"{"nowplaying":"Album A - Song A - Artist A"}"#;
const SONG_B: &str = r#"{"nowplaying":"Album B - Song B - Artist B"}"#;

struct Harness {
    poller: Poller<ScriptedFetch, RecordingConsole>,
    fetch: ScriptedFetch,
    console: RecordingConsole,
    sink: RecordingSink,
}

fn harness(answers: Vec<Result<&str, &str>>, policy: ParseFailurePolicy) -> Harness {
    let fetch = ScriptedFetch::answering(answers);
    let console = RecordingConsole::default();
    let sink = RecordingSink::default();
    let settings = PollSettings {
        interval_secs: 5,
        on_parse_error: policy,
    };
    let mut poller = Poller::new(fetch.clone(), console.clone(), settings, false);
    poller.add_sink(sink.clone());
    Harness {
        poller,
        fetch,
        console,
        sink,
    }
}

fn wall() -> chrono::DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

#[test]
fn two_ticks_inside_the_interval_fetch_once() {
    let mut h = harness(vec![Ok(SONG_A)], ParseFailurePolicy::Fatal);
    let t0 = Instant::now();

    h.poller
        .wake(Some(Station::DParkChristmas), t0, wall())
        .unwrap();
    let first = h.console.last();

    h.poller
        .wake(Some(Station::DParkChristmas), t0 + Duration::from_secs(2), wall())
        .unwrap();
    let second = h.console.last();

    assert_eq!(h.fetch.gets(), 1);
    assert_eq!(first, second);
    assert_eq!(first[1], "Song A - Artist A [Album A]");
}

#[test]
fn fetches_again_once_the_interval_has_passed() {
    let mut h = harness(vec![Ok(SONG_A), Ok(SONG_B)], ParseFailurePolicy::Fatal);
    let t0 = Instant::now();

    h.poller.wake(Some(Station::DParkChristmas), t0, wall()).unwrap();
    h.poller.wake(None, t0 + Duration::from_secs(5), wall()).unwrap();

    assert_eq!(h.fetch.gets(), 2);
    assert_eq!(h.poller.state().current().title, "Song B");
}

#[test]
fn new_station_forces_a_fetch_and_resets_the_track() {
    let mut h = harness(vec![Ok(SONG_A), Err("offline")], ParseFailurePolicy::Fatal);
    let t0 = Instant::now();

    h.poller.wake(Some(Station::DParkChristmas), t0, wall()).unwrap();
    h.poller
        .wake(Some(Station::DParkResort), t0 + Duration::from_secs(1), wall())
        .unwrap();

    assert_eq!(h.fetch.gets(), 2);
    assert_eq!(h.poller.state().active(), Some(Station::DParkResort));
    assert_eq!(h.poller.state().current(), &TrackInfo::default());
    assert_eq!(h.console.last()[1], "Loading DPark Radio Resort…");
}

#[test]
fn wake_without_station_only_renders() {
    let mut h = harness(vec![Ok(SONG_A)], ParseFailurePolicy::Fatal);
    h.poller.wake(None, Instant::now(), wall()).unwrap();

    assert_eq!(h.fetch.gets(), 0);
    assert_eq!(h.console.last(), vec!["Waiting for a station…".to_string()]);
}

#[test]
fn empty_body_keeps_track_and_retries_next_wake() {
    let mut h = harness(vec![Ok(SONG_A), Ok(""), Ok(SONG_A)], ParseFailurePolicy::Fatal);
    let t0 = Instant::now();

    h.poller.wake(Some(Station::DParkBackground), t0, wall()).unwrap();
    h.poller.wake(None, t0 + Duration::from_secs(5), wall()).unwrap();

    assert_eq!(h.poller.state().current().title, "Song A");
    assert_eq!(
        h.poller.state().status(),
        Some("empty response from DPark Radio Background")
    );
    assert!(h.console.last().iter().any(|l| l.starts_with("Error: empty response")));

    // Failed attempt did not count as a fetch, so the next wake tries again.
    h.poller.wake(None, t0 + Duration::from_secs(6), wall()).unwrap();
    assert_eq!(h.fetch.gets(), 3);
    assert_eq!(h.poller.state().status(), None);
}

#[test]
fn transport_error_is_shown_and_not_fatal() {
    let mut h = harness(vec![Err("connection refused")], ParseFailurePolicy::Fatal);
    h.poller
        .wake(Some(Station::SpaDay), Instant::now(), wall())
        .unwrap();

    let status = h.poller.state().status().unwrap();
    assert!(status.contains("connection refused"));
    assert!(!h.poller.state().has_fetched());
}

#[test]
fn fatal_policy_returns_parse_error() {
    let mut h = harness(vec![Ok("<html>")], ParseFailurePolicy::Fatal);
    let err = h
        .poller
        .wake(Some(Station::SorcerMain), Instant::now(), wall())
        .unwrap_err();

    assert!(matches!(
        err,
        PollError::Parse {
            station: Station::SorcerMain,
            source: ParseError::Malformed { .. }
        }
    ));
}

#[test]
fn log_policy_keeps_last_track_and_backs_off() {
    let mut h = harness(vec![Ok(SONG_A), Ok("<html>")], ParseFailurePolicy::Log);
    let t0 = Instant::now();

    h.poller.wake(Some(Station::DParkResort), t0, wall()).unwrap();
    h.poller.wake(None, t0 + Duration::from_secs(5), wall()).unwrap();
    assert_eq!(h.poller.state().current().title, "Song A");
    assert!(h.poller.state().status().is_some());

    // The failed parse counts as a fetch: no new GET inside the interval.
    h.poller.wake(None, t0 + Duration::from_secs(6), wall()).unwrap();
    assert_eq!(h.fetch.gets(), 2);
}

#[test]
fn empty_paged_results_follow_the_parse_policy() {
    let mut h = harness(vec![Ok(r#"{"results":[]}"#)], ParseFailurePolicy::Fatal);
    let err = h
        .poller
        .wake(Some(Station::SpaDay), Instant::now(), wall())
        .unwrap_err();
    assert!(matches!(
        err,
        PollError::Parse {
            source: ParseError::Empty { .. },
            ..
        }
    ));
}

#[test]
fn one_notification_per_title_change() {
    let mut h = harness(
        vec![Ok(SONG_A), Ok(SONG_A), Ok(SONG_B), Ok(SONG_B)],
        ParseFailurePolicy::Fatal,
    );
    let t0 = Instant::now();

    for i in 0..4 {
        let published = (i == 0).then_some(Station::DParkChristmas);
        h.poller
            .wake(published, t0 + Duration::from_secs(5 * i), wall())
            .unwrap();
    }

    assert_eq!(h.fetch.gets(), 4);
    assert_eq!(
        *h.sink.changes.lock().unwrap(),
        vec![
            (Station::DParkChristmas, "Song A".to_string()),
            (Station::DParkChristmas, "Song B".to_string()),
        ]
    );
}

#[test]
fn run_exits_on_shutdown() {
    let h = harness(vec![Ok(SONG_A)], ParseFailurePolicy::Fatal);
    let (tx, rx) = crossbeam_channel::unbounded();
    let shutdown = Shutdown::new();

    let handle = spawn_poller(h.poller, rx, shutdown.clone());
    tx.send(Station::DParkChristmas).unwrap();
    std::thread::sleep(Duration::from_millis(50));
    shutdown.trigger();

    assert!(handle.join().unwrap().is_ok());
    assert!(h.fetch.gets() >= 1);
}

#[test]
fn fatal_error_in_thread_triggers_shutdown() {
    let h = harness(vec![Ok("not json")], ParseFailurePolicy::Fatal);
    let (tx, rx) = crossbeam_channel::unbounded();
    let shutdown = Shutdown::new();

    let handle = spawn_poller(h.poller, rx, shutdown.clone());
    tx.send(Station::WdwnTunes).unwrap();

    assert!(handle.join().unwrap().is_err());
    assert!(shutdown.is_triggered());
}
