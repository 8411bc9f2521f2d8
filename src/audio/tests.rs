use std::io::{Cursor, ErrorKind, Read, Seek, SeekFrom};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::engine::PlaybackEngine;
use super::sink::format_hint;
use super::stream::NetworkStream;
use super::thread::PlaybackTask;
use super::types::{AudioCmd, PlaybackError, PlaybackState};
use super::AudioPlayer;
use crate::shutdown::Shutdown;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Load(String),
    Play(u32),
    Pause(u32, bool),
    Release(u32),
}

/// Engine that records every call; handles are sequence numbers.
#[derive(Default)]
struct FakeEngine {
    calls: Arc<Mutex<Vec<Call>>>,
    next_id: u32,
    fail_load: bool,
    drained: Arc<Mutex<bool>>,
}

impl PlaybackEngine for FakeEngine {
    type Handle = u32;

    fn load(&mut self, url: &str) -> Result<u32, PlaybackError> {
        self.calls.lock().unwrap().push(Call::Load(url.to_string()));
        if self.fail_load {
            return Err(PlaybackError::Decode {
                url: url.to_string(),
                reason: "not audio".to_string(),
            });
        }
        self.next_id += 1;
        Ok(self.next_id)
    }

    fn play(&mut self, handle: &u32) -> Result<(), PlaybackError> {
        self.calls.lock().unwrap().push(Call::Play(*handle));
        Ok(())
    }

    fn pause(&mut self, handle: &u32, paused: bool) {
        self.calls.lock().unwrap().push(Call::Pause(*handle, paused));
    }

    fn release(&mut self, handle: u32) {
        self.calls.lock().unwrap().push(Call::Release(handle));
    }

    fn finished(&self, _handle: &u32) -> bool {
        *self.drained.lock().unwrap()
    }
}

fn calls(engine: &FakeEngine) -> Vec<Call> {
    engine.calls.lock().unwrap().clone()
}

#[test]
fn switch_releases_old_handle_before_playing_new_one() {
    let mut task = PlaybackTask::new(FakeEngine::default());
    task.switch_to("http://a".to_string()).unwrap();
    task.switch_to("http://b".to_string()).unwrap();

    assert_eq!(
        calls(task.engine()),
        vec![
            Call::Load("http://a".to_string()),
            Call::Play(1),
            Call::Release(1),
            Call::Load("http://b".to_string()),
            Call::Play(2),
        ]
    );
}

#[test]
fn failed_load_leaves_no_session() {
    let engine = FakeEngine {
        fail_load: true,
        ..FakeEngine::default()
    };
    let mut task = PlaybackTask::new(engine);
    let err = task.switch_to("http://bad".to_string()).unwrap_err();
    assert!(matches!(err, PlaybackError::Decode { .. }));
    assert_eq!(task.toggle_pause(), None);
}

#[test]
fn toggle_pause_flips_and_reaches_engine() {
    let mut task = PlaybackTask::new(FakeEngine::default());
    assert_eq!(task.toggle_pause(), None);

    task.handle(AudioCmd::Load("http://a".to_string())).unwrap();
    assert_eq!(task.toggle_pause(), Some(true));
    assert_eq!(task.toggle_pause(), Some(false));
    assert!(calls(task.engine()).ends_with(&[Call::Pause(1, true), Call::Pause(1, false)]));
}

#[test]
fn end_of_stream_is_reported_once_per_load() {
    let engine = FakeEngine::default();
    let drained = engine.drained.clone();
    let mut task = PlaybackTask::new(engine);

    assert!(!task.poll_finished());
    task.switch_to("http://a".to_string()).unwrap();
    assert!(!task.poll_finished());

    *drained.lock().unwrap() = true;
    assert!(task.poll_finished());
    assert!(!task.poll_finished());

    task.switch_to("http://b".to_string()).unwrap();
    assert!(task.poll_finished());
}

#[test]
fn paused_stream_is_not_finished() {
    let engine = FakeEngine::default();
    let drained = engine.drained.clone();
    let mut task = PlaybackTask::new(engine);
    task.switch_to("http://a".to_string()).unwrap();
    task.toggle_pause();

    *drained.lock().unwrap() = true;
    assert!(!task.poll_finished());
}

#[test]
fn release_is_a_noop_without_session() {
    let mut task = PlaybackTask::new(FakeEngine::default());
    task.release();
    task.switch_to("http://a".to_string()).unwrap();
    task.release();
    task.release();
    assert_eq!(
        calls(task.engine()),
        vec![
            Call::Load("http://a".to_string()),
            Call::Play(1),
            Call::Release(1),
        ]
    );
}

#[test]
fn thread_releases_session_on_shutdown() {
    let engine = FakeEngine::default();
    let log = engine.calls.clone();
    let shutdown = Shutdown::new();

    let player = AudioPlayer::with_engine(move || Ok(engine), shutdown.clone());
    player.send(AudioCmd::Load("http://a".to_string())).unwrap();

    // Wait for the load to land before shutting down.
    for _ in 0..100 {
        if log.lock().unwrap().contains(&Call::Play(1)) {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    shutdown.trigger();

    assert!(player.join().is_ok());
    assert_eq!(log.lock().unwrap().last(), Some(&Call::Release(1)));
}

#[test]
fn end_of_stream_triggers_shutdown() {
    let engine = FakeEngine::default();
    let drained = engine.drained.clone();
    let shutdown = Shutdown::new();

    let player = AudioPlayer::with_engine(move || Ok(engine), shutdown.clone());
    player.send(AudioCmd::Load("http://a".to_string())).unwrap();
    *drained.lock().unwrap() = true;

    assert!(shutdown.wait_timeout(Duration::from_secs(5)));
    assert!(player.join().is_ok());
}

#[test]
fn engine_error_is_returned_and_triggers_shutdown() {
    let shutdown = Shutdown::new();
    let player = AudioPlayer::with_engine(
        || -> Result<FakeEngine, PlaybackError> { Err(PlaybackError::Output("none".into())) },
        shutdown.clone(),
    );

    assert!(matches!(player.join(), Err(PlaybackError::Output(_))));
    assert!(shutdown.is_triggered());
}

#[test]
fn network_stream_reads_and_tracks_position() {
    let mut s = NetworkStream::new(Box::new(Cursor::new(b"abcdef".to_vec())));
    let mut buf = [0u8; 4];
    assert_eq!(s.read(&mut buf).unwrap(), 4);
    assert_eq!(s.position(), 4);

    assert_eq!(s.seek(SeekFrom::Current(0)).unwrap(), 4);
    assert_eq!(s.seek(SeekFrom::Start(4)).unwrap(), 4);
    assert_eq!(
        s.seek(SeekFrom::Start(0)).unwrap_err().kind(),
        ErrorKind::Unsupported
    );
    assert_eq!(
        s.seek(SeekFrom::End(0)).unwrap_err().kind(),
        ErrorKind::Unsupported
    );
}

#[test]
fn content_type_maps_to_decoder_hint() {
    assert_eq!(format_hint("audio/mpeg"), Some("mp3"));
    assert_eq!(format_hint("audio/aacp"), Some("aac"));
    assert_eq!(format_hint(" Audio/OGG "), Some("ogg"));
    assert_eq!(format_hint("text/html"), None);
}

#[test]
fn playback_state_toggles_between_playing_and_paused() {
    assert_eq!(PlaybackState::Playing.toggled(), PlaybackState::Paused);
    assert_eq!(PlaybackState::Paused.toggled(), PlaybackState::Playing);
    assert_eq!(PlaybackState::Stopped.toggled(), PlaybackState::Stopped);
}
