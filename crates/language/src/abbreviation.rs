use std::collections::BTreeSet;

const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "vs.", "etc.", "e.g.", "i.e.",
];

/// English tokens whose trailing period does not end a sentence.
///
/// Entries are stored lowercased, including their final period, and are
/// matched against the last whitespace-delimited token of a caption.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Abbreviations(BTreeSet<String>);

impl Abbreviations {
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut abbreviations = Self::empty();
        for entry in entries {
            abbreviations.insert(entry);
        }
        abbreviations
    }

    /// Adds an entry; a missing trailing period is appended.
    pub fn insert(&mut self, entry: impl AsRef<str>) {
        let entry = entry.as_ref().trim().to_lowercase();
        if entry.is_empty() {
            return;
        }
        if entry.ends_with('.') {
            self.0.insert(entry);
        } else {
            self.0.insert(format!("{entry}."));
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(&token.to_lowercase())
    }

    /// Whether the last token of `text` is one of the abbreviations.
    pub fn matches_tail(&self, text: &str) -> bool {
        text.split_whitespace()
            .next_back()
            .is_some_and(|token| self.contains(token.trim_start_matches(['(', '"', '\''])))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for Abbreviations {
    fn from(entries: Vec<String>) -> Self {
        Self::new(entries)
    }
}

impl From<Abbreviations> for Vec<String> {
    fn from(abbreviations: Abbreviations) -> Self {
        abbreviations.0.into_iter().collect()
    }
}

impl Default for Abbreviations {
    fn default() -> Self {
        Self::new(DEFAULT_ABBREVIATIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_list_matches_case_insensitively() {
        let abbreviations = Abbreviations::default();
        assert!(abbreviations.matches_tail("I spoke to Mr."));
        assert!(abbreviations.matches_tail("apples, pears, ETC."));
        assert!(abbreviations.matches_tail("fruit (e.g."));
        assert!(!abbreviations.matches_tail("I spoke to him."));
        assert!(!abbreviations.matches_tail(""));
    }

    #[test]
    fn insert_normalizes_entries() {
        let mut abbreviations = Abbreviations::empty();
        abbreviations.insert(" Gen ");
        abbreviations.insert("Capt.");
        abbreviations.insert("   ");
        assert_eq!(abbreviations.len(), 2);
        assert!(abbreviations.contains("gen."));
        assert!(abbreviations.contains("CAPT."));
    }

    #[test]
    fn empty_list_never_matches() {
        assert!(!Abbreviations::empty().matches_tail("Dr."));
    }
}
