use dict_playback::{PlaybackEvent, PlaybackRuntime};
use tokio::sync::mpsc;

/// Forwards controller events to the command loop.
pub struct ChannelRuntime {
    tx: mpsc::UnboundedSender<PlaybackEvent>,
}

impl ChannelRuntime {
    pub fn new(tx: mpsc::UnboundedSender<PlaybackEvent>) -> Self {
        Self { tx }
    }
}

impl PlaybackRuntime for ChannelRuntime {
    fn emit(&self, event: PlaybackEvent) {
        let _ = self.tx.send(event);
    }
}
