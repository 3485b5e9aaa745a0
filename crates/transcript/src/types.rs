use dict_language::Language;

/// One timed caption line, as stored by the transcript editor and replayed
/// by the dictation player.
///
/// `user_input` belongs to the dictation screen (the learner's typed
/// answer). It rides along with the item but never influences merging.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct TranscriptItem {
    pub start: f64,
    pub end: f64,
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_input: Option<String>,
}

impl TranscriptItem {
    pub fn new(start: f64, end: f64, transcript: impl Into<String>) -> Self {
        Self {
            start,
            end,
            transcript: transcript.into(),
            user_input: None,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn language(&self) -> Language {
        Language::detect(&self.transcript)
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start >= 0.0 && self.end > self.start
    }

    /// Fold `next` into `self`: the start stays, the end extends, and both
    /// texts are joined with `lang`'s separator.
    pub(crate) fn absorb(&mut self, next: TranscriptItem, lang: Language) {
        self.end = self.end.max(next.end);
        self.transcript = join(&self.transcript, &next.transcript, lang);
        self.user_input = match (self.user_input.take(), next.user_input) {
            (Some(a), Some(b)) => Some(join(&a, &b, lang)),
            (a, b) => a.or(b),
        };
    }
}

fn join(left: &str, right: &str, lang: Language) -> String {
    let left = left.trim_end();
    let right = right.trim_start();

    if left.is_empty() {
        return right.to_string();
    }
    if right.is_empty() {
        return left.to_string();
    }

    let separator = lang.separator();
    let mut joined = String::with_capacity(left.len() + separator.len() + right.len());
    joined.push_str(left);
    joined.push_str(separator);
    joined.push_str(right);
    joined
}
