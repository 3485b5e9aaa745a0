//! # Sentence-level auto-merge
//!
//! Auto-generated captions split sentences wherever the captioner ran out
//! of line width or time, so a single sentence often spans several items.
//! The merger walks the items in start order with one accumulator and folds
//! the next item in while the accumulated text is an unfinished sentence.
//!
//! Three signals decide, all evaluated against the language detected from
//! the accumulator's text (re-detected after every fold, so a transcript
//! that switches language mid-way is handled per sentence):
//!
//! - **completeness**: the text ends with a sentence-final mark (English
//!   abbreviations such as "Dr." excepted). A complete sentence is never
//!   extended.
//! - **duration budget**: the merged item may not span more than
//!   `max_duration` seconds. Oversized single items are kept, never split.
//! - **continuation**: the text ends with a clause mark (comma, colon, …)
//!   or with no sentence-final mark at all.

use dict_language::{
    Abbreviations, Language, ends_with_continuation, ends_with_sentence_mark, is_complete_sentence,
};
use itertools::Itertools;

use crate::types::TranscriptItem;

pub const DEFAULT_MAX_DURATION: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeOptions {
    /// Upper bound, in seconds, on the span of a merged item.
    pub max_duration: f64,
    pub abbreviations: Abbreviations,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            max_duration: DEFAULT_MAX_DURATION,
            abbreviations: Abbreviations::default(),
        }
    }
}

impl MergeOptions {
    pub fn with_max_duration(max_duration: f64) -> Self {
        Self {
            max_duration,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Merger {
    options: MergeOptions,
}

impl Merger {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge `items` into sentence-level items.
    ///
    /// The input does not need to be sorted and is left untouched; the
    /// output is sorted by `start`. Every item must satisfy
    /// `0 <= start < end` with finite times.
    pub fn merge(&self, items: &[TranscriptItem]) -> crate::Result<Vec<TranscriptItem>> {
        let max_duration = self.options.max_duration;
        if !max_duration.is_finite() || max_duration <= 0.0 {
            return Err(crate::Error::InvalidMaxDuration(max_duration));
        }

        if let Some((index, item)) = items.iter().find_position(|item| !item.is_well_formed()) {
            return Err(crate::Error::InvalidItem {
                index,
                start: item.start,
                end: item.end,
            });
        }

        if items.len() < 2 {
            return Ok(items.to_vec());
        }

        let mut sorted = items.to_vec();
        sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

        let merged: Vec<TranscriptItem> = sorted
            .into_iter()
            .coalesce(|mut current, next| {
                let lang = current.language();
                if self.should_merge(&current, &next, lang) {
                    current.absorb(next, lang);
                    Ok(current)
                } else {
                    Err((current, next))
                }
            })
            .collect();

        tracing::debug!(
            input = items.len(),
            output = merged.len(),
            max_duration,
            "transcript_merged"
        );

        Ok(merged)
    }

    fn should_merge(&self, current: &TranscriptItem, next: &TranscriptItem, lang: Language) -> bool {
        let text = current.transcript.as_str();

        let complete = is_complete_sentence(text, lang, &self.options.abbreviations);
        let within_budget =
            current.end.max(next.end) - current.start <= self.options.max_duration;
        // A bare abbreviation ("Dr.") still carries a sentence mark, so it
        // is neither complete nor a continuation and the line stays as is.
        let continues =
            ends_with_continuation(text, lang) || !ends_with_sentence_mark(text, lang);

        !complete && within_budget && continues
    }
}

/// Merge with the default abbreviation list and the given duration budget.
pub fn auto_merge_transcript_items(
    items: &[TranscriptItem],
    max_duration: f64,
) -> crate::Result<Vec<TranscriptItem>> {
    Merger::new(MergeOptions::with_max_duration(max_duration)).merge(items)
}
