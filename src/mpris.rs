//! MPRIS service on the session bus.
//!
//! Method calls become `ControlCmd`s on the action queue. Now-playing data
//! reaches the service through `MprisHandle`, which only sends updates; the
//! MPRIS thread applies them to the interface it owns and emits
//! `PropertiesChanged`.

use std::collections::HashMap;
use std::time::Duration;

use async_io::{Timer, block_on};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use tracing::{debug, warn};
use zbus::{Connection, interface};
use zvariant::{OwnedValue, Value};

use crate::audio::PlaybackState;
use crate::catalog::Station;
use crate::keys::ControlCmd;
use crate::metadata::TrackInfo;
use crate::notify::TrackSink;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.stream_player";
const UPDATE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub enum MprisUpdate {
    Track { station: Station, track: TrackInfo },
    Playback(PlaybackState),
}

#[derive(Debug, Default, Clone)]
struct NowPlaying {
    station: Option<Station>,
    track: TrackInfo,
}

/// Sending side of the MPRIS thread. Cheap to clone.
#[derive(Clone)]
pub struct MprisHandle {
    updates: Sender<MprisUpdate>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        let _ = self.updates.send(MprisUpdate::Playback(playback));
    }
}

impl TrackSink for MprisHandle {
    fn track_changed(&mut self, station: Station, track: &TrackInfo) {
        let _ = self.updates.send(MprisUpdate::Track {
            station,
            track: track.clone(),
        });
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No window to raise.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "Stream Player"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    playback: PlaybackState,
    now: NowPlaying,
}

impl PlayerIface {
    fn new(tx: Sender<ControlCmd>) -> Self {
        Self {
            tx,
            playback: PlaybackState::Stopped,
            now: NowPlaying::default(),
        }
    }

    /// Apply one update; `true` when `Metadata` changed, `false` for `PlaybackStatus`.
    fn apply(&mut self, update: MprisUpdate) -> bool {
        match update {
            MprisUpdate::Track { station, track } => {
                self.now = NowPlaying {
                    station: Some(station),
                    track,
                };
                true
            }
            MprisUpdate::Playback(playback) => {
                self.playback = playback;
                false
            }
        }
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        match self.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let track = &self.now.track;

        let title = match self.now.station {
            Some(station) if track.title.is_empty() => station.name().to_string(),
            _ => track.title.clone(),
        };
        insert(&mut map, "xesam:title", Value::from(title));

        if !track.artist.is_empty() {
            insert(&mut map, "xesam:artist", Value::from(vec![track.artist.clone()]));
        }
        if !track.album.is_empty() {
            insert(&mut map, "xesam:album", Value::from(track.album.clone()));
        }
        if track.has_duration() {
            let micros = (track.duration_secs * 1_000_000.0).round() as i64;
            insert(&mut map, "mpris:length", Value::from(micros));
        }
        if let Some(station) = self.now.station {
            insert(&mut map, "xesam:comment", Value::from(vec![station.name().to_string()]));
        }
        map
    }
}

fn insert(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
    if let Ok(v) = OwnedValue::try_from(value) {
        map.insert(key.to_string(), v);
    }
}

/// Start the MPRIS service on a detached thread.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let (updates_tx, updates_rx) = crossbeam_channel::unbounded::<MprisUpdate>();

    std::thread::spawn(move || {
        block_on(async move {
            if let Err(e) = serve(tx, updates_rx).await {
                warn!(error = %e, "MPRIS service unavailable");
            }
        });
    });

    MprisHandle {
        updates: updates_tx,
    }
}

async fn serve(tx: Sender<ControlCmd>, updates: Receiver<MprisUpdate>) -> zbus::Result<()> {
    let connection = Connection::session().await?;
    connection.request_name(BUS_NAME).await?;

    let object_server = connection.object_server();
    object_server
        .at(OBJECT_PATH, RootIface { tx: tx.clone() })
        .await?;
    object_server
        .at(OBJECT_PATH, PlayerIface::new(tx))
        .await?;

    let player = object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await?;

    loop {
        Timer::after(UPDATE_POLL).await;

        let mut pending = Vec::new();
        loop {
            match updates.try_recv() {
                Ok(update) => pending.push(update),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }
        if pending.is_empty() {
            continue;
        }

        let (mut metadata_changed, mut status_changed) = (false, false);
        {
            let mut iface = player.get_mut().await;
            for update in pending {
                if iface.apply(update) {
                    metadata_changed = true;
                } else {
                    status_changed = true;
                }
            }
        }

        let iface = player.get().await;
        let emitter = player.signal_emitter();
        if metadata_changed {
            if let Err(e) = iface.metadata_changed(emitter).await {
                debug!(error = %e, "MPRIS metadata signal failed");
            }
        }
        if status_changed {
            if let Err(e) = iface.playback_status_changed(emitter).await {
                debug!(error = %e, "MPRIS status signal failed");
            }
        }
    }
}
