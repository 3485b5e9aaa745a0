mod abbreviation;
mod detect;
mod punctuation;

pub use abbreviation::Abbreviations;
pub use detect::Language;
pub use punctuation::{ends_with_continuation, ends_with_sentence_mark, is_complete_sentence};
