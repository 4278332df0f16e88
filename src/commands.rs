use std::io::Write;
use std::path::PathBuf;

use timer_sounds_core::{Countdown, CountdownPhase, format_hms};

use crate::controller::{ControllerEvent, ControllerHandle, ControllerSnapshot};

const PROGRESS_WIDTH: usize = 30;

pub const WELCOME: &str = "\
Welcome to Timer Sounds!
  - `edit 00:05:00` sets the countdown, `start` / `pause` / `reset` control it
  - every time it reaches zero a random sound from the server plays
  - `upload <files>` adds sounds, `sounds` lists them, `delete <name>` removes one
Type `help` for the full command list.";

pub async fn show_status(handle: &ControllerHandle) -> Result<(), String> {
    let snapshot = handle.snapshot().await?;
    println!("{}", status_line(&snapshot));
    Ok(())
}

pub async fn list_sounds(handle: &ControllerHandle) -> Result<(), String> {
    let snapshot = handle.snapshot().await?;
    print_sounds(&snapshot.sounds);
    Ok(())
}

/// Commit an edit started with [`ControllerHandle::begin_edit`]. Input that
/// is not a valid duration leaves the countdown as it was.
pub async fn edit(handle: &ControllerHandle, value: &str) -> Result<(), String> {
    handle.commit_edit(value.trim()).await?;
    show_status(handle).await
}

pub async fn upload(handle: &ControllerHandle, paths: Vec<PathBuf>) -> Result<(), String> {
    if paths.is_empty() {
        return Err("upload needs at least one file".to_string());
    }
    let count = paths.len();
    handle.upload(paths).await?;
    println!("uploading {count} file(s)...");
    Ok(())
}

pub async fn delete(handle: &ControllerHandle, name: &str) -> Result<(), String> {
    handle.delete(name).await?;
    println!("deleting {name}...");
    Ok(())
}

pub fn exit() -> Result<(), String> {
    writeln!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}

/// One line per controller event, for the background printer
pub fn describe_event(event: &ControllerEvent) -> String {
    match event {
        ControllerEvent::Expired { sound: Some(name) } => format!("time's up! playing {name}"),
        ControllerEvent::Expired { sound: None } => "time's up! (no sounds uploaded)".to_string(),
        ControllerEvent::SoundsUpdated(sounds) => format!("{} sound(s) available", sounds.len()),
        ControllerEvent::Notice(message) => message.clone(),
    }
}

pub fn status_line(snapshot: &ControllerSnapshot) -> String {
    let countdown = &snapshot.countdown;
    let state = match countdown.phase() {
        CountdownPhase::Idle => "paused",
        CountdownPhase::Running => "running",
        CountdownPhase::Editing => "editing",
    };
    format!(
        "{} [{}] {} / {}",
        state,
        progress_bar(countdown),
        countdown.display(),
        format_hms(countdown.initial_secs())
    )
}

fn progress_bar(countdown: &Countdown) -> String {
    let filled = ((countdown.progress() * PROGRESS_WIDTH as f32).round() as usize).min(PROGRESS_WIDTH);
    format!("{}{}", "#".repeat(filled), "-".repeat(PROGRESS_WIDTH - filled))
}

fn print_sounds(sounds: &[String]) {
    if sounds.is_empty() {
        println!("No sounds uploaded");
        return;
    }
    for name in sounds {
        println!("  {name}");
    }
    println!("\nTotal: {} sounds", sounds.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(initial_secs: u32, elapsed: u32) -> Countdown {
        let mut countdown = Countdown::new(initial_secs);
        countdown.start();
        for _ in 0..elapsed {
            countdown.tick();
        }
        countdown
    }

    #[test]
    fn test_status_line() {
        let snapshot = ControllerSnapshot {
            countdown: running(90, 45),
            sounds: Vec::new(),
        };
        let line = status_line(&snapshot);
        assert!(line.starts_with("running ["));
        assert!(line.ends_with("00:00:45 / 00:01:30"));
        assert_eq!(line.matches('#').count(), PROGRESS_WIDTH / 2);
    }

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(&Countdown::new(60)), "#".repeat(PROGRESS_WIDTH));
        assert_eq!(progress_bar(&running(60, 58)).matches('#').count(), 1);
        assert_eq!(progress_bar(&running(60, 30)).len(), PROGRESS_WIDTH);
    }

    #[test]
    fn test_describe_event() {
        let event = ControllerEvent::Expired {
            sound: Some("1-bell.mp3".to_string()),
        };
        assert_eq!(describe_event(&event), "time's up! playing 1-bell.mp3");
        assert_eq!(
            describe_event(&ControllerEvent::SoundsUpdated(vec!["a".into(), "b".into()])),
            "2 sound(s) available"
        );
    }
}
