//! Countdown controller service
//!
//! Architecture:
//! - ControllerHandle: cloneable front end that sends commands
//! - ControllerService: background task that owns the countdown and the sound cache
//! - Tick source: a spawned interval task, aborted whenever the countdown stops
//!
//! Network work runs in its own spawned tasks and reports back through the
//! command channel, so a tick is never held up by the asset store.
mod handle;


pub use handle::ControllerHandle;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use timer_sounds_core::{ClientStateFile, Countdown, Tick, format_hms, pick_random};

use crate::api::SoundApi;
use crate::player::Player;

const TICK_PERIOD: Duration = Duration::from_secs(1);

// ─────────────────────────────────────────────────────────────────────────────
// Commands & Events
// ─────────────────────────────────────────────────────────────────────────────

/// Messages sent to the service by the handle and by its own helper tasks
#[derive(Debug)]
pub enum ControllerCommand {
    Start,
    Pause,
    Toggle,
    Reset,
    BeginEdit,
    CommitEdit(String),
    /// One second elapsed on the tick source with this generation
    Tick(u64),
    Refresh,
    Upload(Vec<PathBuf>),
    Delete(String),
    /// A list fetch finished; `seq` orders it against other fetches
    SoundsLoaded { seq: u64, sounds: Vec<String> },
    Snapshot(oneshot::Sender<ControllerSnapshot>),
    Shutdown,
}

/// Notifications for whoever drives the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The countdown reached zero and restarted. `sound` is what was picked
    /// for playback, if any sound was known.
    Expired { sound: Option<String> },
    SoundsUpdated(Vec<String>),
    /// Server acknowledgement of an upload or delete. Failures are only logged.
    Notice(String),
}

/// Point-in-time view of the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSnapshot {
    pub countdown: Countdown,
    pub sounds: Vec<String>,
}

pub struct ControllerOptions {
    pub initial_secs: u32,
    /// Pause between a successful upload and the list refresh
    pub refresh_delay: Duration,
    /// Sound names remembered from the previous session
    pub cached_sounds: Vec<String>,
    pub state_file: Option<ClientStateFile>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Controller Service
// ─────────────────────────────────────────────────────────────────────────────

pub struct ControllerService {
    countdown: Countdown,
    sounds: Vec<String>,
    refresh_delay: Duration,
    state_file: Option<ClientStateFile>,
    api: Arc<dyn SoundApi>,
    player: Arc<dyn Player>,
    events_tx: mpsc::Sender<ControllerEvent>,
    cmd_rx: mpsc::Receiver<ControllerCommand>,
    cmd_tx: mpsc::Sender<ControllerCommand>,
    tick_handle: Option<JoinHandle<()>>,
    /// Bumped for every tick source so ticks queued by an aborted one are dropped
    tick_generation: u64,
    /// Handed out to list fetches in the order they are issued
    refresh_seq: Arc<AtomicU64>,
    /// Newest fetch applied to `sounds`; older results arriving late are dropped
    applied_refresh: u64,
}

impl ControllerService {
    /// Create a new controller and return a handle to communicate with it
    pub fn new(
        options: ControllerOptions,
        api: Arc<dyn SoundApi>,
        player: Arc<dyn Player>,
        events_tx: mpsc::Sender<ControllerEvent>,
    ) -> (Self, ControllerHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let service = Self {
            countdown: Countdown::new(options.initial_secs),
            sounds: options.cached_sounds,
            refresh_delay: options.refresh_delay,
            state_file: options.state_file,
            api,
            player,
            events_tx,
            cmd_rx,
            cmd_tx: cmd_tx.clone(),
            tick_handle: None,
            tick_generation: 0,
            refresh_seq: Arc::new(AtomicU64::new(0)),
            applied_refresh: 0,
        };

        (service, ControllerHandle::new(cmd_tx))
    }

    /// Run the service event loop until `Shutdown`
    pub async fn run(mut self) {
        tracing::debug!(
            initial = self.countdown.initial_secs(),
            cached_sounds = self.sounds.len(),
            "controller starting"
        );
        self.refresh();

        while let Some(cmd) = self.cmd_rx.recv().await {
            match cmd {
                ControllerCommand::Start => {
                    self.countdown.start();
                }
                ControllerCommand::Pause => {
                    self.countdown.pause();
                }
                ControllerCommand::Toggle => {
                    self.countdown.toggle();
                }
                ControllerCommand::Reset => self.countdown.reset(),
                ControllerCommand::BeginEdit => {
                    if !self.countdown.begin_edit() {
                        tracing::debug!("edit refused while running");
                    }
                }
                ControllerCommand::CommitEdit(input) => {
                    if let Some(secs) = self.countdown.commit_edit(&input) {
                        tracing::info!(duration = %format_hms(secs), "countdown duration changed");
                    }
                }
                ControllerCommand::Tick(generation) => self.on_tick(generation),
                ControllerCommand::Refresh => self.refresh(),
                ControllerCommand::Upload(paths) => self.upload(paths),
                ControllerCommand::Delete(name) => self.delete(name),
                ControllerCommand::SoundsLoaded { seq, sounds } => self.sounds_loaded(seq, sounds),
                ControllerCommand::Snapshot(reply) => {
                    let _ = reply.send(self.snapshot());
                }
                ControllerCommand::Shutdown => {
                    self.stop_ticker();
                    break;
                }
            }
            self.sync_ticker();
        }

        tracing::debug!("controller stopped");
    }

    fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            countdown: self.countdown.clone(),
            sounds: self.sounds.clone(),
        }
    }

    fn emit(&self, event: ControllerEvent) {
        if let Err(e) = self.events_tx.try_send(event) {
            tracing::debug!(error = %e, "dropping controller event");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tick source
    // ─────────────────────────────────────────────────────────────────────────

    /// Exactly one tick source while running, none otherwise
    fn sync_ticker(&mut self) {
        match (self.countdown.is_running(), self.tick_handle.is_some()) {
            (true, false) => self.start_ticker(),
            (false, true) => self.stop_ticker(),
            _ => {}
        }
    }

    fn start_ticker(&mut self) {
        self.tick_generation += 1;
        let generation = self.tick_generation;
        let cmd_tx = self.cmd_tx.clone();

        self.tick_handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                if cmd_tx.send(ControllerCommand::Tick(generation)).await.is_err() {
                    break;
                }
            }
        }));
    }

    fn stop_ticker(&mut self) {
        if let Some(handle) = self.tick_handle.take() {
            handle.abort();
        }
    }

    fn on_tick(&mut self, generation: u64) {
        if generation != self.tick_generation {
            return;
        }
        if self.countdown.tick() == Tick::Expired {
            self.on_expired();
        }
    }

    fn on_expired(&mut self) {
        let sound = pick_random(&self.sounds).cloned();
        tracing::info!(sound = ?sound, "countdown expired");

        if let Some(name) = sound.clone() {
            let api = self.api.clone();
            let player = self.player.clone();
            tokio::spawn(async move {
                match api.fetch(&name).await {
                    Ok(bytes) => player.play(&name, bytes),
                    Err(e) => tracing::warn!(sound = %name, error = %e, "failed to fetch sound"),
                }
            });
        }

        self.emit(ControllerEvent::Expired { sound });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sound list
    // ─────────────────────────────────────────────────────────────────────────

    fn refresh(&self) {
        tokio::spawn(reload_sounds(self.reloader()));
    }

    fn reloader(&self) -> Reloader {
        Reloader {
            api: self.api.clone(),
            cmd_tx: self.cmd_tx.clone(),
            seq: self.refresh_seq.clone(),
        }
    }

    fn upload(&self, paths: Vec<PathBuf>) {
        let reloader = self.reloader();
        let events_tx = self.events_tx.clone();
        let delay = self.refresh_delay;

        tokio::spawn(async move {
            let count = paths.len();
            match reloader.api.upload(paths).await {
                Ok(message) => {
                    tracing::info!(count, "upload finished");
                    let _ = events_tx.try_send(ControllerEvent::Notice(message));
                    tokio::time::sleep(delay).await;
                    reload_sounds(reloader).await;
                }
                Err(e) => tracing::warn!(count, error = %e, "upload failed"),
            }
        });
    }

    fn delete(&self, name: String) {
        let reloader = self.reloader();
        let events_tx = self.events_tx.clone();

        tokio::spawn(async move {
            match reloader.api.delete(&name).await {
                Ok(message) => {
                    tracing::info!(sound = %name, "deleted sound");
                    let _ = events_tx.try_send(ControllerEvent::Notice(message));
                    reload_sounds(reloader).await;
                }
                Err(e) => tracing::warn!(sound = %name, error = %e, "delete failed"),
            }
        });
    }

    fn sounds_loaded(&mut self, seq: u64, sounds: Vec<String>) {
        if seq <= self.applied_refresh {
            tracing::debug!(seq, applied = self.applied_refresh, "dropping stale sound list");
            return;
        }
        self.applied_refresh = seq;

        tracing::debug!(count = sounds.len(), "sound list refreshed");
        self.sounds = sounds;

        if let Some(state_file) = &self.state_file
            && let Err(e) = state_file.save_sounds(&self.sounds)
        {
            tracing::warn!(path = %state_file.path().display(), error = %e, "failed to persist sound list");
        }

        self.emit(ControllerEvent::SoundsUpdated(self.sounds.clone()));
    }
}

/// What a spawned task needs to fetch the list and report back
struct Reloader {
    api: Arc<dyn SoundApi>,
    cmd_tx: mpsc::Sender<ControllerCommand>,
    seq: Arc<AtomicU64>,
}

/// Fetch the current list and hand it back to the controller
async fn reload_sounds(reloader: Reloader) {
    let seq = reloader.seq.fetch_add(1, Ordering::SeqCst) + 1;
    match reloader.api.list().await {
        Ok(sounds) => {
            let _ = reloader
                .cmd_tx
                .send(ControllerCommand::SoundsLoaded { seq, sounds })
                .await;
        }
        Err(e) => tracing::warn!(seq, error = %e, "failed to refresh sound list"),
    }
}
