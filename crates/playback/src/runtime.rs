use crate::PlaybackEvent;

/// Sink for everything the controller reports back to its host: state
/// changes, drift diagnostics, completions and failures.
///
/// The host decides what to do with them (update a UI, forward them over a
/// channel, record them in a test).
pub trait PlaybackRuntime: Send + Sync {
    fn emit(&self, event: PlaybackEvent);
}

pub struct NoopRuntime;

impl PlaybackRuntime for NoopRuntime {
    fn emit(&self, _event: PlaybackEvent) {}
}
