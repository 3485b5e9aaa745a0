use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use dict_transcript::{TranscriptItem, auto_merge_transcript_items};

pub struct Args {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub max_duration: f64,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let items = read_input(&args.input)?;
    let merged = auto_merge_transcript_items(&items, args.max_duration)?;

    tracing::info!(
        input = items.len(),
        output = merged.len(),
        max_duration = args.max_duration,
        "transcript_merged"
    );

    let json = serde_json::to_string_pretty(&merged)?;
    match args.output {
        Some(path) => std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}

/// Reads a JSON array of items from `path`, or from stdin when it is `-`.
pub fn read_input(path: &Path) -> anyhow::Result<Vec<TranscriptItem>> {
    let items = if path.as_os_str() == "-" {
        dict_transcript::read_items(std::io::stdin().lock())?
    } else {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        dict_transcript::read_items(std::io::BufReader::new(file))
            .with_context(|| format!("failed to parse {}", path.display()))?
    };
    Ok(items)
}
