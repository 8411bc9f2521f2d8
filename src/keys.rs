//! Control inputs: terminal keys and GNOME media keys.
//!
//! Every listener runs on its own thread and forwards `ControlCmd`s to the
//! orchestrator's action queue. MPRIS method calls feed the same queue.

mod media_keys;
mod terminal;

pub use media_keys::{KeyError, spawn_media_keys};
pub use terminal::spawn_terminal_keys;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControlCmd {
    Next,
    Prev,
    PlayPause,
    Play,
    Pause,
    Quit,
}
