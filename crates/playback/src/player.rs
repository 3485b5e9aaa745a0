pub type PlayerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Player states as reported by embedded video players (the numeric codes
/// are the ones the YouTube IFrame API uses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub enum PlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl PlayerState {
    pub fn code(self) -> i32 {
        match self {
            Self::Unstarted => -1,
            Self::Ended => 0,
            Self::Playing => 1,
            Self::Paused => 2,
            Self::Buffering => 3,
            Self::Cued => 5,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Unstarted),
            0 => Some(Self::Ended),
            1 => Some(Self::Playing),
            2 => Some(Self::Paused),
            3 => Some(Self::Buffering),
            5 => Some(Self::Cued),
            _ => None,
        }
    }

    /// Paused or ended: the player will not advance on its own.
    pub fn is_stopped(self) -> bool {
        matches!(self, Self::Paused | Self::Ended)
    }
}

/// Capability surface of an embedded video player.
///
/// Implementations are usually thin wrappers over a player that lives
/// elsewhere (an iframe, a native view). Calls are expected to return
/// quickly; state changes such as "now playing" are observed by polling
/// [`VideoPlayer::state`], never awaited.
///
/// A player handle is owned by exactly one
/// [`crate::PlaybackController`]. Driving the same underlying player from
/// two controllers is a contract violation: their seeks and pauses will
/// interleave.
pub trait VideoPlayer: Send + Sync + 'static {
    fn current_time(&self) -> Result<f64, PlayerError>;
    fn state(&self) -> Result<PlayerState, PlayerError>;
    fn seek_to(&self, seconds: f64, allow_seek_ahead: bool) -> Result<(), PlayerError>;
    fn play(&self) -> Result<(), PlayerError>;
    fn pause(&self) -> Result<(), PlayerError>;
    fn set_playback_rate(&self, rate: f64) -> Result<(), PlayerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for code in [-1, 0, 1, 2, 3, 5] {
            assert_eq!(PlayerState::from_code(code).unwrap().code(), code);
        }
        assert_eq!(PlayerState::from_code(4), None);
    }
}
