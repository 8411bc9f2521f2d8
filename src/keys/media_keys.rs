use std::thread;

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;
use tracing::{debug, info};

use super::ControlCmd;

/// Name we register under when grabbing the keys.
const APPLICATION: &str = "stream-player";

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("media keys unavailable: {0}")]
    Subscribe(#[from] zbus::Error),
    #[error("media key listener exited before subscribing")]
    Gone,
}

#[zbus::proxy(
    interface = "org.gnome.SettingsDaemon.MediaKeys",
    default_service = "org.gnome.SettingsDaemon.MediaKeys",
    default_path = "/org/gnome/SettingsDaemon/MediaKeys"
)]
trait MediaKeys {
    fn grab_media_player_keys(&self, application: &str, time: u32) -> zbus::Result<()>;

    #[zbus(signal)]
    fn media_player_key_pressed(&self, application: String, key: String) -> zbus::Result<()>;
}

/// Map a GNOME key name to a command.
pub(super) fn map_media_key(key: &str) -> Option<ControlCmd> {
    match key {
        "Next" => Some(ControlCmd::Next),
        "Previous" => Some(ControlCmd::Prev),
        "Play" => Some(ControlCmd::PlayPause),
        "Pause" | "Stop" => Some(ControlCmd::Pause),
        _ => None,
    }
}

/// Grab the media keys on a detached thread.
///
/// The returned receiver yields exactly one subscribe result. After a
/// successful subscribe the thread blocks on the signal stream for the rest
/// of the process and forwards every recognised key to `tx`.
pub fn spawn_media_keys(tx: Sender<ControlCmd>) -> Receiver<Result<(), KeyError>> {
    let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);

    thread::spawn(move || {
        if let Err(e) = listen(&tx, &ready_tx) {
            let _ = ready_tx.send(Err(e));
        }
    });

    ready_rx
}

fn listen(
    tx: &Sender<ControlCmd>,
    ready: &Sender<Result<(), KeyError>>,
) -> Result<(), KeyError> {
    let connection = zbus::blocking::Connection::session()?;
    let proxy = MediaKeysProxyBlocking::new(&connection)?;
    proxy.grab_media_player_keys(APPLICATION, 0)?;
    let presses = proxy.receive_media_player_key_pressed()?;

    let _ = ready.send(Ok(()));
    info!("media keys grabbed");

    for press in presses {
        let Ok(args) = press.args() else {
            continue;
        };
        debug!(key = %args.key(), "media key pressed");
        if let Some(cmd) = map_media_key(args.key()) {
            if tx.send(cmd).is_err() {
                break;
            }
        }
    }
    Ok(())
}
