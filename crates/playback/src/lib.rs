mod config;
mod controller;
mod error;
mod events;
mod monitor;
mod player;
mod runtime;
mod state;

pub mod simulated;

pub use config::{PlaybackConfig, PlaybackConfigPatch};
pub use controller::{PlaybackController, PlaybackControllerBuilder, PlaybackOutcome};
pub use error::*;
pub use events::{PlaybackEvent, StopReason};
pub use player::{PlayerError, PlayerState, VideoPlayer};
pub use runtime::{NoopRuntime, PlaybackRuntime};
pub use state::{PlaybackState, SegmentRange};
