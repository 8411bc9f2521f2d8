use std::env;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, anyhow};
use crossbeam_channel::{Receiver, Sender};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::{error, info, warn};

use crate::audio::AudioPlayer;
use crate::catalog::{Catalog, Station};
use crate::config::Settings;
use crate::http::{self, HttpClient};
use crate::keys::{self, ControlCmd, KeyError};
use crate::mpris::{self, MprisHandle};
use crate::notify::DesktopNotifier;
use crate::poller::{Poller, spawn_poller};
use crate::shutdown::Shutdown;
use crate::ui::LiveConsole;

mod orchestrator;
mod settings;
mod startup;

use orchestrator::{ChannelFanout, Orchestrator};

/// How long to wait for the media-key listener to report its subscription.
const MEDIA_KEYS_TIMEOUT: Duration = Duration::from_secs(5);

pub fn run() -> anyhow::Result<()> {
    let (settings, warning) = settings::load_settings();
    let log_path = startup::init_logging(&settings.logging)?;
    if let Some(msg) = warning {
        warn!("{msg}");
    }
    info!(log = %log_path.display(), "starting");

    let catalog = Catalog::default();
    let start = startup::start_index(env::args().nth(1).as_deref(), catalog.len())?;

    let shutdown = Shutdown::new();
    let (control_tx, control_rx) = crossbeam_channel::unbounded::<ControlCmd>();

    if settings.controls.media_keys {
        subscribe_media_keys(&control_tx, settings.controls.require_media_keys)?;
    }
    let mpris = settings
        .controls
        .mpris
        .then(|| mpris::spawn_mpris(control_tx.clone()));

    let audio = AudioPlayer::spawn(http::stream_agent(&settings.http), shutdown.clone());

    enable_raw_mode().context("enabling raw terminal mode")?;
    let played = play(
        &settings,
        catalog,
        start,
        &shutdown,
        control_tx,
        &control_rx,
        mpris,
        &audio,
    );

    shutdown.trigger();
    let playback = audio.join();
    let _ = disable_raw_mode();
    println!();

    let result = played.and(playback.map_err(anyhow::Error::from));
    match &result {
        Ok(()) => info!("stopped"),
        Err(e) => error!(error = %format!("{e:#}"), "stopped with error"),
    }
    result
}

fn subscribe_media_keys(tx: &Sender<ControlCmd>, required: bool) -> anyhow::Result<()> {
    let ready = keys::spawn_media_keys(tx.clone());
    let outcome = ready
        .recv_timeout(MEDIA_KEYS_TIMEOUT)
        .unwrap_or(Err(KeyError::Gone));

    match outcome {
        Ok(()) => Ok(()),
        Err(e) if required => Err(e).context("media keys are required by controls.require_media_keys"),
        Err(e) => {
            warn!(error = %e, "continuing without media keys");
            Ok(())
        }
    }
}

/// Everything that needs the raw-mode terminal: the live block, key input
/// and the orchestrator loop. Returns once shutdown was triggered.
#[allow(clippy::too_many_arguments)]
fn play(
    settings: &Settings,
    catalog: Catalog,
    start: usize,
    shutdown: &Shutdown,
    control_tx: Sender<ControlCmd>,
    control_rx: &Receiver<ControlCmd>,
    mpris: Option<MprisHandle>,
    audio: &AudioPlayer,
) -> anyhow::Result<()> {
    let console = LiveConsole::new().context("opening the terminal")?;
    let mut poller = Poller::new(
        HttpClient::new(&settings.http),
        console,
        settings.poll.clone(),
        settings.ui.show_controls,
    );
    if settings.notifications.enabled {
        match DesktopNotifier::connect(settings.notifications.clone()) {
            Ok(notifier) => poller.add_sink(notifier),
            Err(e) => warn!(error = %e, "desktop notifications unavailable"),
        }
    }
    if let Some(handle) = &mpris {
        poller.add_sink(handle.clone());
    }

    let (sources_tx, sources_rx) = crossbeam_channel::unbounded::<Station>();
    let poller = spawn_poller(poller, sources_rx, shutdown.clone());

    let terminal_keys: Option<JoinHandle<()>> = settings
        .controls
        .terminal_keys
        .then(|| keys::spawn_terminal_keys(control_tx.clone(), shutdown.clone()));
    drop(control_tx);

    let mut out = ChannelFanout {
        audio: audio.sender(),
        sources: sources_tx,
        mpris,
    };
    let mut orchestrator = Orchestrator::new(catalog, start);
    orchestrator::run(
        &mut orchestrator,
        control_rx,
        settings.ui.tick(),
        shutdown,
        &mut out,
    );

    shutdown.trigger();
    drop(out);
    if let Some(handle) = terminal_keys {
        let _ = handle.join();
    }
    poller
        .join()
        .map_err(|_| anyhow!("poller thread panicked"))?
        .map_err(anyhow::Error::from)
}
