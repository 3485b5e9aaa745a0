use std::time::Duration;

use crate::{PlaybackConfig, PlayerState, SegmentRange, StopReason};

/// Stop-condition bookkeeping for one segment once the player is playing.
///
/// Embedded players report time late and in jumps, and background tabs
/// throttle timers, so no single condition is reliable on its own. Any one
/// of four ends the segment:
///
/// 1. overrun: reported time is past `end + buffer_tolerance`
/// 2. reached: reported time is within `time_accuracy` of `end`
/// 3. elapsed: wall-clock time for `end - actual_start` at the current
///    speed has passed (covers players that under-report time)
/// 4. the player paused or ended by itself
pub(crate) struct Monitor {
    end: f64,
    actual_start: f64,
    speed: f64,
    expected: Duration,
    time_accuracy: f64,
    buffer_tolerance: f64,
    drift_threshold: f64,
}

impl Monitor {
    pub(crate) fn new(segment: &SegmentRange, actual_start: f64, config: &PlaybackConfig) -> Self {
        let remaining = (segment.end - actual_start).max(0.0) / config.playback_speed;

        Self {
            end: segment.end,
            actual_start,
            speed: config.playback_speed,
            expected: Duration::try_from_secs_f64(remaining).unwrap_or(Duration::MAX),
            time_accuracy: config.time_accuracy,
            buffer_tolerance: config.buffer_tolerance,
            drift_threshold: config.drift_threshold,
        }
    }

    pub(crate) fn expected_duration(&self) -> Duration {
        self.expected
    }

    pub(crate) fn check(
        &self,
        current_time: f64,
        state: PlayerState,
        elapsed: Duration,
    ) -> Option<StopReason> {
        if current_time > self.end + self.buffer_tolerance {
            Some(StopReason::Overran)
        } else if current_time >= self.end - self.time_accuracy {
            Some(StopReason::ReachedEnd)
        } else if elapsed >= self.expected {
            Some(StopReason::DurationElapsed)
        } else if state.is_stopped() {
            Some(StopReason::PlayerStopped(state))
        } else {
            None
        }
    }

    /// Where the player should be after `elapsed`, if the reported time is
    /// further than the drift threshold from it.
    pub(crate) fn drift(&self, current_time: f64, elapsed: Duration) -> Option<f64> {
        let expected = self.actual_start + elapsed.as_secs_f64() * self.speed;
        ((current_time - expected).abs() > self.drift_threshold).then_some(expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(start: f64, end: f64, actual_start: f64, speed: f64) -> Monitor {
        let config = PlaybackConfig {
            playback_speed: speed,
            ..Default::default()
        };
        Monitor::new(&SegmentRange::new(start, end), actual_start, &config)
    }

    #[test]
    fn expected_duration_uses_actual_start_and_speed() {
        assert_eq!(monitor(10.0, 12.0, 10.0, 1.0).expected_duration(), Duration::from_secs(2));
        assert_eq!(monitor(10.0, 12.0, 10.5, 1.0).expected_duration(), Duration::from_millis(1500));
        assert_eq!(monitor(10.0, 12.0, 10.0, 2.0).expected_duration(), Duration::from_secs(1));
        assert_eq!(monitor(10.0, 12.0, 13.0, 1.0).expected_duration(), Duration::ZERO);
        assert_eq!(monitor(0.0, 1e300, 0.0, 1.0).expected_duration(), Duration::MAX);
    }

    #[test]
    fn keeps_going_mid_segment() {
        let m = monitor(10.0, 12.0, 10.0, 1.0);
        assert_eq!(m.check(11.0, PlayerState::Playing, Duration::from_secs(1)), None);
        assert_eq!(m.check(11.0, PlayerState::Buffering, Duration::from_secs(1)), None);
    }

    #[test]
    fn each_condition_fires() {
        let m = monitor(10.0, 12.0, 10.0, 1.0);
        let early = Duration::from_millis(500);

        assert_eq!(m.check(11.96, PlayerState::Playing, early), Some(StopReason::ReachedEnd));
        assert_eq!(m.check(12.5, PlayerState::Playing, early), Some(StopReason::Overran));
        assert_eq!(
            m.check(11.0, PlayerState::Playing, Duration::from_secs(2)),
            Some(StopReason::DurationElapsed)
        );
        assert_eq!(
            m.check(11.0, PlayerState::Paused, early),
            Some(StopReason::PlayerStopped(PlayerState::Paused))
        );
        assert_eq!(
            m.check(11.0, PlayerState::Ended, early),
            Some(StopReason::PlayerStopped(PlayerState::Ended))
        );
    }

    #[test]
    fn within_tolerance_past_end_is_reached_not_overrun() {
        let m = monitor(10.0, 12.0, 10.0, 1.0);
        assert_eq!(
            m.check(12.2, PlayerState::Playing, Duration::from_millis(100)),
            Some(StopReason::ReachedEnd)
        );
    }

    #[test]
    fn drift_reported_beyond_threshold() {
        let m = monitor(10.0, 12.0, 10.0, 1.0);
        assert_eq!(m.drift(11.1, Duration::from_secs(1)), None);
        let expected = m.drift(10.5, Duration::from_secs(1)).unwrap();
        approx::assert_relative_eq!(expected, 11.0);
    }
}
