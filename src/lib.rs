pub mod api;
pub mod commands;
pub mod controller;
pub mod player;
pub mod repl;

pub use api::{ApiClientError, HttpSoundApi, SoundApi};
pub use controller::{
    ControllerEvent, ControllerHandle, ControllerOptions, ControllerService, ControllerSnapshot,
};
pub use player::{Player, RodioPlayer};
pub use repl::readline;
