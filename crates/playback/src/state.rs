/// Snapshot of what the controller is doing. Handed out by value; mutating
/// a snapshot has no effect on the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub is_playing: bool,
    /// End of the segment being played, `0` when idle.
    pub target_end_time: f64,
    /// Player time at which playback actually began. Starts out as the
    /// requested start and is replaced once the player reports playing,
    /// since seeking usually lands a little off target.
    pub actual_start_time: f64,
}

impl PlaybackState {
    pub fn idle() -> Self {
        Self::default()
    }
}

/// The part of a transcript segment the controller cares about.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct SegmentRange {
    pub start: f64,
    pub end: f64,
}

impl SegmentRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Both times must be finite and `start` non-negative. `end > start`
    /// is not enforced: an inverted range simply stops on the first check.
    pub fn validate(&self) -> crate::Result<()> {
        if self.start.is_finite() && self.end.is_finite() && self.start >= 0.0 {
            Ok(())
        } else {
            Err(crate::Error::InvalidSegment {
                start: self.start,
                end: self.end,
            })
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl From<(f64, f64)> for SegmentRange {
    fn from((start, end): (f64, f64)) -> Self {
        Self::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_non_finite_and_negative() {
        assert!(SegmentRange::new(10.0, 12.0).validate().is_ok());
        assert!(SegmentRange::new(0.0, 0.0).validate().is_ok());

        for (start, end) in [(f64::NAN, 1.0), (0.0, f64::INFINITY), (-0.5, 1.0)] {
            let err = SegmentRange::new(start, end).validate().unwrap_err();
            assert!(err.to_string().starts_with("invalid segment times"));
        }
    }

    #[test]
    fn state_serializes_camel_case() {
        let state = PlaybackState {
            is_playing: true,
            target_end_time: 12.0,
            actual_start_time: 10.02,
        };
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["isPlaying"], true);
        assert_eq!(json["targetEndTime"], 12.0);
        assert_eq!(json["actualStartTime"], 10.02);
    }
}
