mod commands {
    pub mod merge;
    pub mod rehearse;
}
mod runtime;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "dictation", about = "Caption merging and segment playback tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge caption fragments into sentence-level items
    Merge {
        /// JSON array of transcript items, or `-` for stdin
        #[arg(long, short, default_value = "-")]
        input: PathBuf,

        /// Where to write the merged items (stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[arg(long, env = "DICTATION_MAX_DURATION", default_value_t = dict_transcript::DEFAULT_MAX_DURATION)]
        max_duration: f64,
    },
    /// Play every segment of a transcript against a simulated player
    Rehearse {
        #[arg(long, short)]
        input: PathBuf,

        /// Playback rate; overrides `playbackSpeed` from `--config`
        #[arg(long, env = "DICTATION_SPEED")]
        speed: Option<f64>,

        /// JSON file with playback settings (camelCase, durations in ms)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Auto-merge the transcript before rehearsing
        #[arg(long)]
        merge: bool,

        #[arg(long, env = "DICTATION_MAX_DURATION", default_value_t = dict_transcript::DEFAULT_MAX_DURATION)]
        max_duration: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Merge {
            input,
            output,
            max_duration,
        } => commands::merge::run(commands::merge::Args {
            input,
            output,
            max_duration,
        }),
        Commands::Rehearse {
            input,
            speed,
            config,
            merge,
            max_duration,
        } => {
            commands::rehearse::run(commands::rehearse::Args {
                input,
                speed,
                config,
                merge: merge.then_some(max_duration),
            })
            .await
        }
    }
}
