use crate::{Abbreviations, Language};

const CLOSING: &[char] = &['"', '\'', ')', ']', '”', '’', '」', '』', '）', '】', '》'];

fn last_significant_char(text: &str) -> Option<char> {
    text.trim_end()
        .trim_end_matches(CLOSING)
        .trim_end()
        .chars()
        .next_back()
}

/// Whether `text` ends with one of `lang`'s sentence-final marks, ignoring
/// trailing whitespace and closing quotes or brackets.
pub fn ends_with_sentence_mark(text: &str, lang: Language) -> bool {
    last_significant_char(text).is_some_and(|ch| lang.sentence_marks().contains(&ch))
}

/// Whether `text` reads as a finished sentence.
///
/// English text ending in a listed abbreviation ("Mr.", "etc.") is not
/// complete even though it ends with a period.
pub fn is_complete_sentence(text: &str, lang: Language, abbreviations: &Abbreviations) -> bool {
    if !ends_with_sentence_mark(text, lang) {
        return false;
    }

    match lang {
        Language::English => !abbreviations.matches_tail(text),
        Language::Chinese | Language::Japanese | Language::Korean => true,
    }
}

/// Whether `text` ends with a mark that conventionally continues a clause.
pub fn ends_with_continuation(text: &str, lang: Language) -> bool {
    last_significant_char(text).is_some_and(|ch| lang.continuation_marks().contains(&ch))
}
