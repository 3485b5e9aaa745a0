use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use dict_playback::{
    PlaybackConfig, PlaybackController, PlaybackEvent, PlaybackOutcome,
    simulated::SimulatedPlayer,
};
use dict_transcript::auto_merge_transcript_items;
use tokio::sync::mpsc;

use crate::runtime::ChannelRuntime;

pub struct Args {
    pub input: PathBuf,
    pub speed: Option<f64>,
    pub config: Option<PathBuf>,
    /// Merge budget, when the transcript should be auto-merged first.
    pub merge: Option<f64>,
}

#[derive(Default)]
struct Report {
    drifts: usize,
    failures: usize,
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    let mut items = super::merge::read_input(&args.input)?;
    if let Some(max_duration) = args.merge {
        items = auto_merge_transcript_items(&items, max_duration)?;
    }

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => PlaybackConfig::default(),
    };
    if let Some(speed) = args.speed {
        config.playback_speed = speed;
    }

    let video_duration = items.iter().map(|item| item.end).fold(0.0, f64::max) + 1.0;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let controller = PlaybackController::builder(SimulatedPlayer::new(video_duration))
        .config(config)
        .runtime(Arc::new(ChannelRuntime::new(tx)))
        .build()?;

    let reporter = tokio::spawn(async move {
        let mut report = Report::default();
        while let Some(event) = rx.recv().await {
            match event {
                PlaybackEvent::Drift { expected, actual } => {
                    report.drifts += 1;
                    tracing::info!(expected, actual, "drift_observed");
                }
                PlaybackEvent::Failed { error } => {
                    report.failures += 1;
                    tracing::info!(%error, "failure_observed");
                }
                PlaybackEvent::StateChanged { state } => {
                    tracing::trace!(?state, "state_changed");
                }
                PlaybackEvent::Completed { .. } => {}
            }
        }
        report
    });

    for (index, item) in items.iter().enumerate() {
        let started = tokio::time::Instant::now();
        let result = controller
            .play_segment((item.start, item.end), move || {
                tracing::debug!(index, "ready_for_input");
            })
            .await;

        match result {
            Ok(PlaybackOutcome::Completed(reason)) => tracing::info!(
                index,
                start = item.start,
                end = item.end,
                language = %item.language(),
                ?reason,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "segment_rehearsed"
            ),
            Ok(PlaybackOutcome::Cancelled) => tracing::warn!(index, "segment_cancelled"),
            Err(error) => tracing::error!(index, %error, "segment_failed"),
        }
    }

    drop(controller);
    let report = reporter.await?;

    tracing::info!(
        segments = items.len(),
        drifts = report.drifts,
        failures = report.failures,
        "rehearsal_finished"
    );

    if report.failures > 0 {
        anyhow::bail!("{} of {} segments failed", report.failures, items.len());
    }
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<PlaybackConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: PlaybackConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
