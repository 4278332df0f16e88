//! Tests for Countdown transitions
//!
//! Verifies tick/expiry behavior, edit handling and the remaining-time bounds.

use super::{Countdown, CountdownPhase, Tick};

fn assert_bounds(countdown: &Countdown) {
    assert!(countdown.initial_secs() > 0);
    assert!(countdown.remaining_secs() <= countdown.initial_secs());
}

#[test]
fn test_new_countdown_is_idle_and_full() {
    let countdown = Countdown::new(60);
    assert_eq!(countdown.phase(), CountdownPhase::Idle);
    assert_eq!(countdown.remaining_secs(), 60);
    assert_eq!(countdown.display(), "00:01:00");
    assert_eq!(countdown.progress(), 1.0);
}

#[test]
fn test_zero_duration_is_bumped() {
    let countdown = Countdown::new(0);
    assert_eq!(countdown.initial_secs(), 1);
    assert_bounds(&countdown);
}

#[test]
fn test_three_ticks_expire_once_and_restart() {
    let mut countdown = Countdown::new(3);
    assert!(countdown.start());

    let ticks: Vec<Tick> = (0..3).map(|_| countdown.tick()).collect();
    assert_eq!(
        ticks,
        vec![
            Tick::Counted { remaining: 2 },
            Tick::Counted { remaining: 1 },
            Tick::Expired,
        ]
    );
    assert_eq!(ticks.iter().filter(|t| **t == Tick::Expired).count(), 1);
    assert_eq!(countdown.remaining_secs(), 3);
    assert!(countdown.is_running());
}

#[test]
fn test_expires_every_period_while_running() {
    let mut countdown = Countdown::new(2);
    countdown.start();

    let expiries = (0..10).filter(|_| countdown.tick() == Tick::Expired).count();
    assert_eq!(expiries, 5);
    assert_bounds(&countdown);
}

#[test]
fn test_tick_ignored_unless_running() {
    let mut countdown = Countdown::new(10);
    assert_eq!(countdown.tick(), Tick::Ignored);
    assert_eq!(countdown.remaining_secs(), 10);

    countdown.begin_edit();
    assert_eq!(countdown.tick(), Tick::Ignored);
}

#[test]
fn test_pause_keeps_remaining() {
    let mut countdown = Countdown::new(10);
    countdown.start();
    countdown.tick();
    countdown.tick();

    assert!(countdown.pause());
    assert_eq!(countdown.phase(), CountdownPhase::Idle);
    assert_eq!(countdown.remaining_secs(), 8);
    assert!(!countdown.pause(), "second pause is a no-op");

    assert!(countdown.start());
    assert_eq!(countdown.tick(), Tick::Counted { remaining: 7 });
}

#[test]
fn test_toggle_flips_running() {
    let mut countdown = Countdown::new(5);
    assert!(countdown.toggle());
    assert!(countdown.is_running());
    assert!(!countdown.toggle());
    assert_eq!(countdown.phase(), CountdownPhase::Idle);
}

#[test]
fn test_reset_from_any_phase() {
    let mut countdown = Countdown::new(5);
    countdown.start();
    countdown.tick();
    countdown.reset();
    assert_eq!(countdown.phase(), CountdownPhase::Idle);
    assert_eq!(countdown.remaining_secs(), 5);

    countdown.begin_edit();
    countdown.reset();
    assert_eq!(countdown.phase(), CountdownPhase::Idle);
}

#[test]
fn test_edit_refused_while_running() {
    let mut countdown = Countdown::new(5);
    countdown.start();
    assert!(!countdown.begin_edit());
    assert!(countdown.is_running());
    assert_eq!(countdown.commit_edit("00:00:30"), None);
    assert_eq!(countdown.initial_secs(), 5);
}

#[test]
fn test_start_refused_while_editing() {
    let mut countdown = Countdown::new(5);
    countdown.begin_edit();
    assert!(!countdown.start());
    assert!(!countdown.toggle());
    assert_eq!(countdown.phase(), CountdownPhase::Editing);
}

#[test]
fn test_commit_valid_edit_sets_both_durations() {
    let mut countdown = Countdown::new(60);
    countdown.start();
    countdown.tick();
    countdown.pause();

    assert!(countdown.begin_edit());
    assert_eq!(countdown.commit_edit("00:01:30"), Some(90));
    assert_eq!(countdown.initial_secs(), 90);
    assert_eq!(countdown.remaining_secs(), 90);
    assert_eq!(countdown.phase(), CountdownPhase::Idle);
}

#[test]
fn test_commit_invalid_edit_is_silently_discarded() {
    let mut countdown = Countdown::new(60);
    countdown.start();
    countdown.tick();
    countdown.pause();
    let before = countdown.clone();

    for input in ["abc", "00:00:00", "1:2", "-1:00:00"] {
        assert!(countdown.begin_edit());
        assert_eq!(countdown.commit_edit(input), None, "input {input:?}");
        assert_eq!(countdown, before);
    }
}

#[test]
fn test_remaining_stays_in_bounds_across_random_walk() {
    let mut countdown = Countdown::new(4);
    let script = [
        "start", "tick", "tick", "edit", "pause", "edit", "commit:00:00:02", "start", "tick",
        "tick", "tick", "reset", "toggle", "tick", "toggle", "edit", "commit:nope", "start",
        "tick", "tick", "tick", "tick", "tick",
    ];

    for step in script {
        match step {
            "start" => {
                countdown.start();
            }
            "pause" => {
                countdown.pause();
            }
            "toggle" => {
                countdown.toggle();
            }
            "reset" => countdown.reset(),
            "tick" => {
                countdown.tick();
            }
            "edit" => {
                countdown.begin_edit();
            }
            other => {
                let input = other.strip_prefix("commit:").unwrap();
                countdown.commit_edit(input);
            }
        }
        assert_bounds(&countdown);
    }
    assert_eq!(countdown.initial_secs(), 2);
}
