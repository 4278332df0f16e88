//! Shared wire and configuration types for Timer Sounds
//!
//! This crate contains the serializable types shared between the asset store
//! service (timer-sounds-server), the core library and the countdown client.

use serde::{Deserialize, Serialize};

/// Application name used for config and log locations
pub const APP_NAME: &str = "timer-sounds";

/// Multipart field that carries uploaded files
pub const UPLOAD_FIELD: &str = "sounds";

/// Default cap on files accepted by a single upload
pub const MAX_FILES_PER_UPLOAD: usize = 20;

// ─────────────────────────────────────────────────────────────────────────────
// Wire Types
// ─────────────────────────────────────────────────────────────────────────────

/// `{ "message": ... }` body used for acknowledgments and errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a successful `GET /random`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomResponse {
    pub file: String,
}

/// Human-readable messages returned by the service
pub mod messages {
    pub const UPLOADED: &str = "Files uploaded successfully";
    pub const DELETED: &str = "File deleted successfully";
    pub const NOT_FOUND: &str = "File not found";
    pub const NO_SOUNDS: &str = "No sounds available";
    pub const DELETE_FAILED: &str = "Failed to delete file";
    pub const STORAGE_FAILED: &str = "Storage operation failed";
}

// ─────────────────────────────────────────────────────────────────────────────
// Server Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Asset store service settings
///
/// Persistence lives in timer-sounds-core (`StoredConfig`), command-line
/// overrides in the server binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Flat directory holding every uploaded sound
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    #[serde(default = "default_max_files")]
    pub max_files_per_upload: usize,

    /// Request body limit for uploads, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_max_files() -> usize {
    MAX_FILES_PER_UPLOAD
}

fn default_max_upload_bytes() -> usize {
    64 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            upload_dir: default_upload_dir(),
            max_files_per_upload: default_max_files(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client Configuration & State
// ─────────────────────────────────────────────────────────────────────────────

/// Countdown client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the asset store service
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Countdown length used until the user edits it
    #[serde(default = "default_initial_duration")]
    pub initial_duration_secs: u32,

    /// Playback volume (0-100)
    #[serde(default = "default_volume")]
    pub volume: u8,

    /// Delay between a successful upload and the list refresh
    #[serde(default = "default_refresh_delay_ms")]
    pub refresh_delay_ms: u64,
}

fn default_server_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_initial_duration() -> u32 {
    60
}

fn default_volume() -> u8 {
    100
}

fn default_refresh_delay_ms() -> u64 {
    300
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            initial_duration_secs: default_initial_duration(),
            volume: default_volume(),
            refresh_delay_ms: default_refresh_delay_ms(),
        }
    }
}

/// Client-side persisted state, rewritten whenever it changes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    #[serde(default)]
    pub tutorial_seen: bool,

    /// Last known asset names, used until the next refresh arrives
    #[serde(default)]
    pub sounds: Vec<String>,
}
