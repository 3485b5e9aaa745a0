use std::time::Duration;

const DEFAULT_PLAYBACK_SPEED: f64 = 1.0;
const DEFAULT_TIME_ACCURACY: f64 = 0.05;
const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_millis(25);
const DEFAULT_START_POLL_INTERVAL: Duration = Duration::from_millis(100);
const DEFAULT_PLAYBACK_TIMEOUT: Duration = Duration::from_millis(5000);
const DEFAULT_BUFFER_TOLERANCE: f64 = 0.3;
const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(50);
const DEFAULT_DRIFT_THRESHOLD: f64 = 0.2;

/// Tuning knobs for [`crate::PlaybackController`].
///
/// Times measured on the video timeline are in seconds (`f64`); polling and
/// timeout periods are wall-clock [`Duration`]s, written as milliseconds in
/// JSON (`checkIntervalMs`, …).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybackConfig {
    pub playback_speed: f64,
    /// How close to the end, in seconds, counts as having reached it.
    pub time_accuracy: f64,
    #[serde(rename = "checkIntervalMs", with = "millis")]
    pub check_interval: Duration,
    #[serde(rename = "startPollIntervalMs", with = "millis")]
    pub start_poll_interval: Duration,
    #[serde(rename = "playbackTimeoutMs", with = "millis")]
    pub playback_timeout: Duration,
    /// How far past the end, in seconds, before a missed stop is forced.
    pub buffer_tolerance: f64,
    /// Pause between stopping the player and reporting completion.
    #[serde(rename = "settleDelayMs", with = "millis")]
    pub settle_delay: Duration,
    pub drift_threshold: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            playback_speed: DEFAULT_PLAYBACK_SPEED,
            time_accuracy: DEFAULT_TIME_ACCURACY,
            check_interval: DEFAULT_CHECK_INTERVAL,
            start_poll_interval: DEFAULT_START_POLL_INTERVAL,
            playback_timeout: DEFAULT_PLAYBACK_TIMEOUT,
            buffer_tolerance: DEFAULT_BUFFER_TOLERANCE,
            settle_delay: DEFAULT_SETTLE_DELAY,
            drift_threshold: DEFAULT_DRIFT_THRESHOLD,
        }
    }
}

impl PlaybackConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if !is_valid_rate(self.playback_speed) {
            return Err(crate::Error::InvalidPlaybackRate(self.playback_speed));
        }

        let tolerances = [
            (self.time_accuracy, "timeAccuracy must be a non-negative number"),
            (self.buffer_tolerance, "bufferTolerance must be a non-negative number"),
            (self.drift_threshold, "driftThreshold must be a non-negative number"),
        ];
        for (value, message) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(crate::Error::InvalidConfig(message));
            }
        }

        let periods = [
            (self.check_interval, "checkIntervalMs must be positive"),
            (self.start_poll_interval, "startPollIntervalMs must be positive"),
            (self.playback_timeout, "playbackTimeoutMs must be positive"),
        ];
        for (value, message) in periods {
            if value.is_zero() {
                return Err(crate::Error::InvalidConfig(message));
            }
        }

        Ok(())
    }

    /// Returns a copy with every field set in `patch` overwritten.
    pub fn patched(&self, patch: &PlaybackConfigPatch) -> Self {
        Self {
            playback_speed: patch.playback_speed.unwrap_or(self.playback_speed),
            time_accuracy: patch.time_accuracy.unwrap_or(self.time_accuracy),
            check_interval: patch.check_interval.unwrap_or(self.check_interval),
            start_poll_interval: patch.start_poll_interval.unwrap_or(self.start_poll_interval),
            playback_timeout: patch.playback_timeout.unwrap_or(self.playback_timeout),
            buffer_tolerance: patch.buffer_tolerance.unwrap_or(self.buffer_tolerance),
            settle_delay: patch.settle_delay.unwrap_or(self.settle_delay),
            drift_threshold: patch.drift_threshold.unwrap_or(self.drift_threshold),
        }
    }
}

/// Partial update for [`PlaybackConfig`]; unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybackConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playback_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_accuracy: Option<f64>,
    #[serde(
        rename = "checkIntervalMs",
        with = "millis::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub check_interval: Option<Duration>,
    #[serde(
        rename = "startPollIntervalMs",
        with = "millis::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_poll_interval: Option<Duration>,
    #[serde(
        rename = "playbackTimeoutMs",
        with = "millis::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub playback_timeout: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_tolerance: Option<f64>,
    #[serde(
        rename = "settleDelayMs",
        with = "millis::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub settle_delay: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drift_threshold: Option<f64>,
}

pub(crate) fn is_valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }

    pub mod option {
        use std::time::Duration;

        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<Duration>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Duration>, D::Error> {
            Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
        }
    }
}
