use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

use crate::shutdown::Shutdown;

use super::ControlCmd;

const INPUT_POLL: Duration = Duration::from_millis(100);

/// Map one key press to a command.
pub(super) fn map_key(key: KeyEvent) -> Option<ControlCmd> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ControlCmd::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('l') | KeyCode::Right => Some(ControlCmd::Next),
        KeyCode::Char('p') | KeyCode::Char('h') | KeyCode::Left => Some(ControlCmd::Prev),
        KeyCode::Char(' ') => Some(ControlCmd::PlayPause),
        KeyCode::Char('q') | KeyCode::Esc => Some(ControlCmd::Quit),
        _ => None,
    }
}

/// Read keys from the raw-mode terminal until shutdown.
pub fn spawn_terminal_keys(tx: Sender<ControlCmd>, shutdown: Shutdown) -> JoinHandle<()> {
    thread::spawn(move || {
        if let Err(e) = read_keys(&tx, &shutdown) {
            warn!(error = %e, "terminal input stopped");
        }
    })
}

fn read_keys(tx: &Sender<ControlCmd>, shutdown: &Shutdown) -> io::Result<()> {
    while !shutdown.is_triggered() {
        if !event::poll(INPUT_POLL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if let Some(cmd) = map_key(key) {
                if tx.send(cmd).is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}
