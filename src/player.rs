//! Sound playback for expired countdowns
//!
//! Playback is fire-and-forget: every sound gets its own thread and output
//! stream, and failures are logged rather than surfaced to the countdown.

use std::io::Cursor;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device available")]
    NoDevice(#[from] rodio::StreamError),

    #[error("failed to open audio sink")]
    Sink(#[from] rodio::PlayError),

    #[error("unsupported or corrupt audio data")]
    Decode(#[from] rodio::decoder::DecoderError),
}

/// Something that can play one downloaded sound
pub trait Player: Send + Sync {
    fn play(&self, name: &str, bytes: Vec<u8>);
}

/// Plays sounds on the default output device via rodio
#[derive(Debug, Clone)]
pub struct RodioPlayer {
    volume: u8,
}

impl RodioPlayer {
    pub fn new(volume: u8) -> Self {
        Self {
            volume: volume.min(100),
        }
    }

    fn play_blocking(bytes: Vec<u8>, volume: u8) -> Result<(), PlaybackError> {
        use rodio::{Decoder, OutputStream, Sink};

        let (_stream, stream_handle) = OutputStream::try_default()?;
        let source = Decoder::new(Cursor::new(bytes))?;
        let sink = Sink::try_new(&stream_handle)?;

        sink.set_volume(volume as f32 / 100.0);
        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}

impl Player for RodioPlayer {
    fn play(&self, name: &str, bytes: Vec<u8>) {
        let name = name.to_string();
        let volume = self.volume;
        std::thread::spawn(move || {
            if let Err(e) = Self::play_blocking(bytes, volume) {
                tracing::warn!(sound = %name, error = %e, "playback failed");
            }
        });
    }
}
