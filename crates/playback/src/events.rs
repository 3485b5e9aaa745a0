use crate::{PlaybackState, PlayerState};

/// Which stop condition ended a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub enum StopReason {
    /// Reported time came within the accuracy window of the segment end.
    ReachedEnd,
    /// Wall-clock time for the segment at the current speed ran out while
    /// the reported time lagged behind.
    DurationElapsed,
    /// Reported time is already past the end by more than the buffer
    /// tolerance, i.e. earlier ticks were missed.
    Overran,
    /// The player paused or ended on its own.
    PlayerStopped(PlayerState),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(tag = "type")]
pub enum PlaybackEvent {
    #[serde(rename = "stateChanged")]
    StateChanged { state: PlaybackState },
    #[serde(rename = "drift")]
    Drift { expected: f64, actual: f64 },
    #[serde(rename = "segmentCompleted")]
    Completed { reason: StopReason },
    #[serde(rename = "playbackFailed")]
    Failed { error: String },
}
