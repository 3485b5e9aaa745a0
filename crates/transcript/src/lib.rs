mod error;
mod input;
mod merge;
mod types;

pub use error::*;
pub use input::{parse_items, read_items};
pub use merge::{DEFAULT_MAX_DURATION, MergeOptions, Merger, auto_merge_transcript_items};
pub use types::TranscriptItem;

pub use dict_language::{Abbreviations, Language};
