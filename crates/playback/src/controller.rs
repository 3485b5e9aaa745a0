use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::is_valid_rate;
use crate::monitor::Monitor;
use crate::{
    NoopRuntime, PlaybackConfig, PlaybackConfigPatch, PlaybackEvent, PlaybackRuntime,
    PlaybackState, PlayerState, SegmentRange, StopReason, VideoPlayer,
};

/// How a [`PlaybackController::play_segment`] call ended, when it did not
/// fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Completed(StopReason),
    /// Superseded by [`PlaybackController::stop`] or a newer
    /// `play_segment`. The completion callback is not invoked.
    Cancelled,
}

impl PlaybackOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

struct ActivePlayback {
    id: u64,
    cancel: CancellationToken,
}

struct Ticket {
    id: u64,
    cancel: CancellationToken,
}

struct Shared<P> {
    player: P,
    runtime: Arc<dyn PlaybackRuntime>,
    config: Mutex<PlaybackConfig>,
    state: Mutex<PlaybackState>,
    active: Mutex<Option<ActivePlayback>>,
    next_id: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Plays exact sub-ranges of a video through a [`VideoPlayer`].
///
/// At most one segment is in flight: starting a new one, or calling
/// [`stop`](Self::stop), cancels the previous one. Clones share the same
/// player, configuration and state.
pub struct PlaybackController<P: VideoPlayer> {
    shared: Arc<Shared<P>>,
}

impl<P: VideoPlayer> Clone for PlaybackController<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<P: VideoPlayer> PlaybackController<P> {
    pub fn builder(player: P) -> PlaybackControllerBuilder<P> {
        PlaybackControllerBuilder::new(player)
    }

    pub fn player(&self) -> &P {
        &self.shared.player
    }

    pub fn config(&self) -> PlaybackConfig {
        lock(&self.shared.config).clone()
    }

    pub fn playback_state(&self) -> PlaybackState {
        *lock(&self.shared.state)
    }

    /// Applies `patch` to the configuration. Takes effect from the next
    /// [`play_segment`](Self::play_segment); a patched speed is also
    /// forwarded to the player, so timing and the actual rate agree.
    pub fn update_config(&self, patch: &PlaybackConfigPatch) -> crate::Result<()> {
        let mut config = lock(&self.shared.config);
        let updated = config.patched(patch);
        updated.validate()?;

        if let Some(rate) = patch.playback_speed {
            self.shared.player.set_playback_rate(rate)?;
        }
        *config = updated;
        Ok(())
    }

    pub fn set_playback_speed(&self, rate: f64) -> crate::Result<()> {
        if !is_valid_rate(rate) {
            return Err(crate::Error::InvalidPlaybackRate(rate));
        }

        self.shared.player.set_playback_rate(rate)?;
        lock(&self.shared.config).playback_speed = rate;
        tracing::debug!(rate, "playback_speed_changed");
        Ok(())
    }

    /// Pauses the player and cancels the in-flight segment, if any.
    ///
    /// Always succeeds; a failing `pause` is logged and otherwise ignored.
    pub fn stop(&self) {
        let previous = lock(&self.shared.active).take();
        if let Some(previous) = previous {
            previous.cancel.cancel();
            tracing::debug!(playback_id = previous.id, "playback_stopped");
        }

        if let Err(error) = self.shared.player.pause() {
            tracing::warn!(%error, "pause_failed_on_stop");
        }

        self.reset_state();
    }

    /// Plays `segment` and resolves once it has finished.
    ///
    /// `on_complete` runs exactly once when the segment reaches a terminal
    /// state, whether it completed or failed, so callers can always restore
    /// their UI from it. It does not run when the segment is cancelled.
    pub async fn play_segment<F>(
        &self,
        segment: impl Into<SegmentRange>,
        on_complete: F,
    ) -> crate::Result<PlaybackOutcome>
    where
        F: FnOnce() + Send,
    {
        let segment = segment.into();
        segment.validate()?;

        let config = self.config();
        let ticket = self.begin(&segment);
        let span = tracing::debug_span!(
            "play_segment",
            playback_id = ticket.id,
            start = segment.start,
            end = segment.end
        );

        async {
            match self.drive(&segment, &config, &ticket.cancel).await {
                Ok(Some(reason)) => {
                    if !self.settle(&ticket) {
                        return Ok(PlaybackOutcome::Cancelled);
                    }

                    // Stays registered through the settle delay so a restart
                    // or `stop` in that window still cancels it.
                    tokio::select! {
                        _ = ticket.cancel.cancelled() => return Ok(PlaybackOutcome::Cancelled),
                        _ = tokio::time::sleep(config.settle_delay) => {}
                    }
                    if !self.release(&ticket) {
                        return Ok(PlaybackOutcome::Cancelled);
                    }

                    tracing::debug!(?reason, "segment_completed");
                    self.shared.runtime.emit(PlaybackEvent::Completed { reason });
                    on_complete();
                    Ok(PlaybackOutcome::Completed(reason))
                }
                Ok(None) => {
                    tracing::debug!("segment_cancelled");
                    Ok(PlaybackOutcome::Cancelled)
                }
                Err(error) => {
                    tracing::error!(%error, "segment_failed");
                    if self.release(&ticket) {
                        self.reset_state();
                        if let Err(pause_error) = self.shared.player.pause() {
                            tracing::warn!(error = %pause_error, "pause_failed_after_error");
                        }
                    }
                    self.shared.runtime.emit(PlaybackEvent::Failed {
                        error: error.to_string(),
                    });

                    on_complete();
                    Err(error)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Seek, start and monitor. `Ok(None)` means cancelled.
    async fn drive(
        &self,
        segment: &SegmentRange,
        config: &PlaybackConfig,
        cancel: &CancellationToken,
    ) -> crate::Result<Option<StopReason>> {
        let player = &self.shared.player;

        if matches!(player.state()?, PlayerState::Playing | PlayerState::Buffering) {
            player.pause()?;
        }
        player.seek_to(segment.start, true)?;

        player.play()?;
        tokio::select! {
            _ = cancel.cancelled() => return Ok(None),
            started = tokio::time::timeout(
                config.playback_timeout,
                self.await_playing(config.start_poll_interval),
            ) => match started {
                Ok(result) => result?,
                Err(_) => return Err(crate::Error::PlaybackTimeout(config.playback_timeout)),
            },
        }

        let actual_start = player.current_time()?;
        self.update_state(|state| state.actual_start_time = actual_start);

        let monitor = Monitor::new(segment, actual_start, config);
        tracing::debug!(
            actual_start,
            expected = ?monitor.expected_duration(),
            "monitoring_started"
        );

        let started_at = Instant::now();
        let mut ticker = tokio::time::interval(config.check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut drift_reported = false;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(None),
                _ = ticker.tick() => {}
            }

            let current_time = player.current_time()?;
            let state = player.state()?;
            let elapsed = started_at.elapsed();

            if !drift_reported {
                if let Some(expected) = monitor.drift(current_time, elapsed) {
                    drift_reported = true;
                    tracing::warn!(expected, actual = current_time, "playback_drift");
                    self.shared.runtime.emit(PlaybackEvent::Drift {
                        expected,
                        actual: current_time,
                    });
                }
            }

            if let Some(reason) = monitor.check(current_time, state, elapsed) {
                if !state.is_stopped() {
                    player.pause()?;
                }
                return Ok(Some(reason));
            }
        }
    }

    /// Polls until the player reports PLAYING. Buffering is waited out; any
    /// other state gets one extra `play()`.
    async fn await_playing(&self, poll: Duration) -> crate::Result<()> {
        let player = &self.shared.player;
        let mut ticker = tokio::time::interval(poll);
        let mut retried = false;

        loop {
            ticker.tick().await;

            match player.state()? {
                PlayerState::Playing => return Ok(()),
                PlayerState::Buffering => {}
                other => {
                    if !retried {
                        retried = true;
                        tracing::debug!(state = ?other, "retrying_play");
                        player.play()?;
                    }
                }
            }
        }
    }

    /// Registers a new in-flight playback, cancelling the previous one.
    fn begin(&self, segment: &SegmentRange) -> Ticket {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();

        let previous = lock(&self.shared.active).replace(ActivePlayback {
            id,
            cancel: cancel.clone(),
        });
        if let Some(previous) = previous {
            previous.cancel.cancel();
            tracing::debug!(superseded = previous.id, playback_id = id, "playback_superseded");
        }

        self.set_state(PlaybackState {
            is_playing: true,
            target_end_time: segment.end,
            actual_start_time: segment.start,
        });

        Ticket { id, cancel }
    }

    /// Resets the state to idle while keeping `ticket` in flight. Returns
    /// `false` when a newer playback (or `stop`) has taken over.
    fn settle(&self, ticket: &Ticket) -> bool {
        let active = lock(&self.shared.active);
        if !active.as_ref().is_some_and(|current| current.id == ticket.id) {
            return false;
        }
        self.reset_state();
        true
    }

    /// Clears the in-flight slot if it still belongs to `ticket`. Returns
    /// `false` when a newer playback (or `stop`) has taken over.
    fn release(&self, ticket: &Ticket) -> bool {
        let mut active = lock(&self.shared.active);
        match active.as_ref() {
            Some(current) if current.id == ticket.id => {
                *active = None;
                true
            }
            _ => false,
        }
    }

    fn reset_state(&self) {
        if *lock(&self.shared.state) != PlaybackState::idle() {
            self.set_state(PlaybackState::idle());
        }
    }

    fn set_state(&self, state: PlaybackState) {
        *lock(&self.shared.state) = state;
        self.shared.runtime.emit(PlaybackEvent::StateChanged { state });
    }

    fn update_state(&self, f: impl FnOnce(&mut PlaybackState)) {
        let state = {
            let mut state = lock(&self.shared.state);
            f(&mut state);
            *state
        };
        self.shared.runtime.emit(PlaybackEvent::StateChanged { state });
    }
}

pub struct PlaybackControllerBuilder<P: VideoPlayer> {
    player: P,
    config: PlaybackConfig,
    runtime: Option<Arc<dyn PlaybackRuntime>>,
}

impl<P: VideoPlayer> PlaybackControllerBuilder<P> {
    fn new(player: P) -> Self {
        Self {
            player,
            config: PlaybackConfig::default(),
            runtime: None,
        }
    }

    pub fn config(mut self, config: PlaybackConfig) -> Self {
        self.config = config;
        self
    }

    pub fn runtime(mut self, runtime: Arc<dyn PlaybackRuntime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn playback_speed(mut self, rate: f64) -> Self {
        self.config.playback_speed = rate;
        self
    }

    pub fn time_accuracy(mut self, seconds: f64) -> Self {
        self.config.time_accuracy = seconds;
        self
    }

    pub fn check_interval(mut self, interval: Duration) -> Self {
        self.config.check_interval = interval;
        self
    }

    pub fn start_poll_interval(mut self, interval: Duration) -> Self {
        self.config.start_poll_interval = interval;
        self
    }

    pub fn playback_timeout(mut self, timeout: Duration) -> Self {
        self.config.playback_timeout = timeout;
        self
    }

    pub fn buffer_tolerance(mut self, seconds: f64) -> Self {
        self.config.buffer_tolerance = seconds;
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    pub fn drift_threshold(mut self, seconds: f64) -> Self {
        self.config.drift_threshold = seconds;
        self
    }

    /// Validates the configuration and takes ownership of the player. A
    /// non-default speed is forwarded to the player right away.
    pub fn build(self) -> crate::Result<PlaybackController<P>> {
        self.config.validate()?;

        if self.config.playback_speed != 1.0 {
            self.player.set_playback_rate(self.config.playback_speed)?;
        }

        Ok(PlaybackController {
            shared: Arc::new(Shared {
                player: self.player,
                runtime: self.runtime.unwrap_or_else(|| Arc::new(NoopRuntime)),
                config: Mutex::new(self.config),
                state: Mutex::new(PlaybackState::idle()),
                active: Mutex::new(None),
                next_id: AtomicU64::new(0),
            }),
        })
    }
}
