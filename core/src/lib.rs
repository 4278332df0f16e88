pub mod assets;
pub mod context;
pub mod countdown;
pub mod logging;

// Re-exports for convenience
pub use assets::{
    AssetStore, FsAssetStore, MemoryAssetStore, StoreError, UploadedFile, asset_name,
    is_valid_name, pick_random,
};
pub use context::{ClientStateFile, ConfigError, StoredConfig};
pub use countdown::{Countdown, CountdownPhase, Tick, TimeParseError, format_hms, parse_hms};
