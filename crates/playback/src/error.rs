use std::time::Duration;

use crate::PlayerError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid segment times: start={start}, end={end}")]
    InvalidSegment { start: f64, end: f64 },
    #[error("invalid playback rate: {0}")]
    InvalidPlaybackRate(f64),
    #[error("invalid playback config: {0}")]
    InvalidConfig(&'static str),
    #[error("playback timeout: player did not start within {0:?}")]
    PlaybackTimeout(Duration),
    #[error("player error: {0}")]
    Player(#[from] PlayerError),
}

pub type Result<T> = std::result::Result<T, Error>;
