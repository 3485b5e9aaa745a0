//! A deterministic in-process [`VideoPlayer`].
//!
//! Time is taken from the tokio clock, so under a paused test runtime the
//! player advances exactly as far as the runtime's virtual time does. The
//! CLI uses it to dry-run a dictation session without a real embed.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::time::Instant;

use crate::{PlayerError, PlayerState, VideoPlayer};

struct Inner {
    state: PlayerState,
    /// Media position at `anchor` (or the frozen position when not playing).
    position: f64,
    anchor: Option<Instant>,
    requested_at: Option<Instant>,
    rate: f64,
}

pub struct SimulatedPlayer {
    inner: Mutex<Inner>,
    duration: f64,
    start_delay: Duration,
    never_starts: bool,
    fail_seek: bool,
    fail_rate: bool,
    reporting_factor: f64,
    play_calls: AtomicUsize,
    pause_calls: AtomicUsize,
    seek_calls: AtomicUsize,
}

impl SimulatedPlayer {
    /// A cued video of `duration` seconds that starts playing as soon as
    /// `play` is called.
    pub fn new(duration: f64) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: PlayerState::Cued,
                position: 0.0,
                anchor: None,
                requested_at: None,
                rate: 1.0,
            }),
            duration,
            start_delay: Duration::ZERO,
            never_starts: false,
            fail_seek: false,
            fail_rate: false,
            reporting_factor: 1.0,
            play_calls: AtomicUsize::new(0),
            pause_calls: AtomicUsize::new(0),
            seek_calls: AtomicUsize::new(0),
        }
    }

    /// Stay in BUFFERING for `delay` after `play` before reporting PLAYING.
    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    /// Ignore `play` entirely, like an embed whose autoplay is blocked.
    pub fn never_starts(mut self) -> Self {
        self.never_starts = true;
        self
    }

    /// Fail every `seek_to`, like a player whose iframe was detached.
    pub fn failing_seek(mut self) -> Self {
        self.fail_seek = true;
        self
    }

    /// Reject every `set_playback_rate`.
    pub fn failing_rate_change(mut self) -> Self {
        self.fail_rate = true;
        self
    }

    /// Report only `factor` of the time actually played, like a player that
    /// stalls while claiming to play.
    pub fn with_reporting_factor(mut self, factor: f64) -> Self {
        self.reporting_factor = factor;
        self
    }

    pub fn play_calls(&self) -> usize {
        self.play_calls.load(Ordering::SeqCst)
    }

    pub fn pause_calls(&self) -> usize {
        self.pause_calls.load(Ordering::SeqCst)
    }

    pub fn seek_calls(&self) -> usize {
        self.seek_calls.load(Ordering::SeqCst)
    }

    /// Pause from inside the player (the viewer clicked the embed), without
    /// counting as a [`VideoPlayer::pause`] call.
    pub fn interrupt(&self) {
        let mut inner = self.lock();
        self.freeze(&mut inner, Instant::now(), PlayerState::Paused);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply the transitions that happen on their own: buffering finishing
    /// and the video running out.
    fn advance(&self, inner: &mut Inner, now: Instant) {
        if inner.state == PlayerState::Buffering {
            if let Some(requested_at) = inner.requested_at {
                let ready_at = requested_at + self.start_delay;
                if now >= ready_at {
                    inner.state = PlayerState::Playing;
                    inner.anchor = Some(ready_at);
                    inner.requested_at = None;
                }
            }
        }

        if inner.state == PlayerState::Playing && self.position_at(inner, now) >= self.duration {
            inner.position = self.duration;
            inner.anchor = None;
            inner.state = PlayerState::Ended;
        }
    }

    fn position_at(&self, inner: &Inner, now: Instant) -> f64 {
        match (inner.state, inner.anchor) {
            (PlayerState::Playing, Some(anchor)) => {
                inner.position + now.saturating_duration_since(anchor).as_secs_f64() * inner.rate
            }
            _ => inner.position,
        }
    }

    fn freeze(&self, inner: &mut Inner, now: Instant, state: PlayerState) {
        self.advance(inner, now);
        if inner.state == PlayerState::Ended {
            return;
        }
        inner.position = self.position_at(inner, now).min(self.duration);
        inner.anchor = None;
        inner.requested_at = None;
        inner.state = state;
    }
}

impl VideoPlayer for SimulatedPlayer {
    fn current_time(&self) -> Result<f64, PlayerError> {
        let mut inner = self.lock();
        let now = Instant::now();
        self.advance(&mut inner, now);

        let reported = match (inner.state, inner.anchor) {
            (PlayerState::Playing, Some(anchor)) => {
                let played = now.saturating_duration_since(anchor).as_secs_f64() * inner.rate;
                inner.position + played * self.reporting_factor
            }
            _ => inner.position,
        };
        Ok(reported)
    }

    fn state(&self) -> Result<PlayerState, PlayerError> {
        let mut inner = self.lock();
        self.advance(&mut inner, Instant::now());
        Ok(inner.state)
    }

    fn seek_to(&self, seconds: f64, _allow_seek_ahead: bool) -> Result<(), PlayerError> {
        self.seek_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_seek {
            return Err("seek failed: player is detached".into());
        }

        let mut inner = self.lock();
        let now = Instant::now();
        self.advance(&mut inner, now);

        inner.position = seconds.clamp(0.0, self.duration);
        if inner.state == PlayerState::Playing {
            inner.anchor = Some(now);
        } else if inner.state == PlayerState::Ended {
            inner.state = PlayerState::Paused;
        }
        Ok(())
    }

    fn play(&self) -> Result<(), PlayerError> {
        self.play_calls.fetch_add(1, Ordering::SeqCst);
        if self.never_starts {
            return Ok(());
        }

        let mut inner = self.lock();
        let now = Instant::now();
        self.advance(&mut inner, now);

        match inner.state {
            PlayerState::Playing | PlayerState::Buffering => {}
            PlayerState::Ended => {}
            _ => {
                inner.state = PlayerState::Buffering;
                inner.requested_at = Some(now);
                self.advance(&mut inner, now);
            }
        }
        Ok(())
    }

    fn pause(&self) -> Result<(), PlayerError> {
        self.pause_calls.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.lock();
        self.freeze(&mut inner, Instant::now(), PlayerState::Paused);
        Ok(())
    }

    fn set_playback_rate(&self, rate: f64) -> Result<(), PlayerError> {
        if self.fail_rate {
            return Err("playback rate not supported".into());
        }

        let mut inner = self.lock();
        let now = Instant::now();
        self.advance(&mut inner, now);

        if inner.state == PlayerState::Playing {
            inner.position = self.position_at(&inner, now);
            inner.anchor = Some(now);
        }
        inner.rate = rate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn plays_from_seek_position_in_real_time() {
        let player = SimulatedPlayer::new(60.0);
        player.seek_to(10.0, true).unwrap();
        player.play().unwrap();
        assert_eq!(player.state().unwrap(), PlayerState::Playing);

        tokio::time::advance(Duration::from_millis(1500)).await;
        approx::assert_relative_eq!(player.current_time().unwrap(), 11.5, epsilon = 1e-9);

        player.pause().unwrap();
        tokio::time::advance(Duration::from_secs(3)).await;
        approx::assert_relative_eq!(player.current_time().unwrap(), 11.5, epsilon = 1e-9);
        assert_eq!(player.state().unwrap(), PlayerState::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn buffers_before_playing() {
        let player = SimulatedPlayer::new(60.0).with_start_delay(Duration::from_millis(300));
        player.play().unwrap();
        assert_eq!(player.state().unwrap(), PlayerState::Buffering);

        tokio::time::advance(Duration::from_millis(300)).await;
        assert_eq!(player.state().unwrap(), PlayerState::Playing);
        approx::assert_relative_eq!(player.current_time().unwrap(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn ends_at_duration() {
        let player = SimulatedPlayer::new(2.0);
        player.play().unwrap();
        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(player.state().unwrap(), PlayerState::Ended);
        approx::assert_relative_eq!(player.current_time().unwrap(), 2.0);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_change_rebases_position() {
        let player = SimulatedPlayer::new(60.0);
        player.play().unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        player.set_playback_rate(2.0).unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        approx::assert_relative_eq!(player.current_time().unwrap(), 3.0, epsilon = 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn never_starting_player_stays_cued() {
        let player = SimulatedPlayer::new(60.0).never_starts();
        player.play().unwrap();
        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(player.state().unwrap(), PlayerState::Cued);
        assert_eq!(player.play_calls(), 1);
    }

    #[test]
    fn failing_seek_reports_error() {
        let player = SimulatedPlayer::new(60.0).failing_seek();
        assert!(player.seek_to(1.0, true).is_err());
        assert_eq!(player.seek_calls(), 1);
    }
}
