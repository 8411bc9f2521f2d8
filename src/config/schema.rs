use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/stream-player/config.toml` or `~/.config/stream-player/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `STREAM_PLAYER__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub poll: PollSettings,
    pub http: HttpSettings,
    pub notifications: NotificationSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    /// Minimum time between two metadata requests to the same station (seconds).
    pub interval_secs: u64,
    /// What to do when a station answers with metadata we cannot decode.
    pub on_parse_error: ParseFailurePolicy,
}

impl PollSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            on_parse_error: ParseFailurePolicy::Fatal,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseFailurePolicy {
    /// Stop the player: the upstream changed its contract.
    #[serde(alias = "exit", alias = "quit")]
    Fatal,
    /// Log it and keep showing the last known track.
    #[serde(alias = "warn", alias = "ignore", alias = "keep-going")]
    Log,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// TCP connect timeout for every request (seconds).
    pub connect_timeout_secs: u64,
    /// Overall timeout for a metadata request (seconds).
    pub timeout_secs: u64,
    /// Per-read timeout on an audio stream (seconds). Streams have no overall timeout.
    pub stream_read_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            timeout_secs: 30,
            stream_read_timeout_secs: 30,
            user_agent: concat!("stream-player/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Send a desktop notification when the title changes.
    pub enabled: bool,
    pub app_name: String,
    /// Icon name or path handed to the notification daemon.
    pub icon: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            app_name: "Stream Player".to_string(),
            icon: "audio-x-generic".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Read single-key commands from the terminal.
    pub terminal_keys: bool,
    /// Grab the GNOME media keys over D-Bus.
    pub media_keys: bool,
    /// Refuse to start when the media keys cannot be grabbed.
    pub require_media_keys: bool,
    /// Expose an MPRIS player on the session bus.
    pub mpris: bool,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            terminal_keys: true,
            media_keys: true,
            require_media_keys: false,
            mpris: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// How often the current station is re-published to the poller (milliseconds).
    pub tick_ms: u64,
    /// Show the key help line under the now-playing block.
    pub show_controls: bool,
}

impl UiSettings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            show_controls: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. `info` or `stream_player=debug`.
    pub level: String,
    /// Log file; defaults to `stream-player.log` in the temp directory.
    pub file: Option<PathBuf>,
}

impl LoggingSettings {
    pub fn file_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("stream-player.log"))
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
