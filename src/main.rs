use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use timer_sounds::commands;
use timer_sounds::repl::readline;
use timer_sounds::{ControllerHandle, ControllerOptions, ControllerService, HttpSoundApi, RodioPlayer};
use timer_sounds_core::logging::{self, LogPolicy};
use timer_sounds_core::{ClientStateFile, CountdownPhase, StoredConfig, parse_hms};
use timer_sounds_types::{ClientConfig, ClientState};

#[derive(Parser)]
#[command(version, about = "Countdown timer that plays a random uploaded sound")]
struct Args {
    /// Asset store base URL (overrides the config file)
    #[arg(short, long)]
    server: Option<String>,

    /// Initial countdown as HH:MM:SS
    #[arg(short, long)]
    duration: Option<String>,

    /// Playback volume, 0-100
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    volume: Option<u8>,
}

impl Args {
    fn apply(&self, config: &mut ClientConfig) -> Result<(), String> {
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if let Some(duration) = &self.duration {
            config.initial_duration_secs =
                parse_hms(duration).map_err(|e| format!("--duration: {e}"))?;
        }
        if let Some(volume) = self.volume {
            config.volume = volume;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();
    let _log_guard = logging::init(LogPolicy::CLIENT);

    let mut config = ClientConfig::load();
    args.apply(&mut config)?;

    let state_file = ClientStateFile::default_location()
        .map_err(|e| tracing::warn!(error = %e, "client state disabled"))
        .ok();
    let state = load_state(state_file.as_ref());

    if !state.tutorial_seen {
        println!("{}\n", commands::WELCOME);
        if let Some(file) = &state_file
            && let Err(e) = file.mark_tutorial_seen()
        {
            tracing::warn!(error = %e, "failed to save tutorial flag");
        }
    }

    let api = HttpSoundApi::new(&config.server_url).map_err(|e| e.to_string())?;
    let player = RodioPlayer::new(config.volume);
    let (events_tx, mut events_rx) = mpsc::channel(64);

    let options = ControllerOptions {
        initial_secs: config.initial_duration_secs,
        refresh_delay: Duration::from_millis(config.refresh_delay_ms),
        cached_sounds: state.sounds,
        state_file,
    };
    let (service, handle) =
        ControllerService::new(options, Arc::new(api), Arc::new(player), events_tx);
    let service_task = tokio::spawn(service.run());

    tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            println!("\n{}", commands::describe_event(&event));
        }
    });

    tracing::info!(server = %config.server_url, "client started");

    loop {
        let line = read_input().await?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &handle).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => println!("{err}"),
        }
    }

    handle.shutdown().await?;
    let _ = service_task.await;
    Ok(())
}

fn load_state(state_file: Option<&ClientStateFile>) -> ClientState {
    let Some(file) = state_file else {
        return ClientState::default();
    };
    file.load().unwrap_or_else(|e| {
        tracing::warn!(path = %file.path().display(), error = %e, "failed to read client state");
        ClientState::default()
    })
}

async fn read_input() -> Result<String, String> {
    tokio::task::spawn_blocking(readline)
        .await
        .map_err(|e| e.to_string())?
}

#[derive(Parser)]
#[command(name = "timer-sounds", about = "Timer Sounds commands")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Start or pause
    Toggle,
    /// Stop and restore the full duration
    Reset,
    /// Set a new duration (HH:MM:SS); without a value the next line is read
    Edit { value: Option<String> },
    /// Show the countdown
    Status,
    /// List known sounds
    Sounds,
    /// Re-fetch the sound list from the server
    Refresh,
    /// Upload sound files
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Delete a sound by name
    Delete { name: String },
    Exit,
}

async fn respond(line: &str, handle: &ControllerHandle) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "timer-sounds".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::Start) => {
            handle.start().await?;
            commands::show_status(handle).await?;
        }
        Some(Commands::Pause) => {
            handle.pause().await?;
            commands::show_status(handle).await?;
        }
        Some(Commands::Toggle) => {
            handle.toggle().await?;
            commands::show_status(handle).await?;
        }
        Some(Commands::Reset) => {
            handle.reset().await?;
            commands::show_status(handle).await?;
        }
        Some(Commands::Edit { value }) => {
            handle.begin_edit().await?;
            // Refused while running, same as any other no-op command
            if handle.snapshot().await?.countdown.phase() != CountdownPhase::Editing {
                return Ok(false);
            }
            let value = match value {
                Some(value) => value,
                None => {
                    println!("new duration (HH:MM:SS):");
                    read_input().await?
                }
            };
            commands::edit(handle, &value).await?;
        }
        Some(Commands::Status) => commands::show_status(handle).await?,
        Some(Commands::Sounds) => commands::list_sounds(handle).await?,
        Some(Commands::Refresh) => handle.refresh().await?,
        Some(Commands::Upload { paths }) => commands::upload(handle, paths).await?,
        Some(Commands::Delete { name }) => commands::delete(handle, &name).await?,
        Some(Commands::Exit) => {
            commands::exit()?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
