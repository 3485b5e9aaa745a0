/// Transcript languages with distinct punctuation and spacing conventions.
///
/// Anything that is not recognizably Chinese, Japanese or Korean is treated
/// as English: Latin-script captions share the same sentence marks and use
/// spaces between words.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[strum(ascii_case_insensitive)]
pub enum Language {
    #[default]
    #[strum(serialize = "en")]
    #[serde(rename = "en")]
    English,
    #[strum(serialize = "zh")]
    #[serde(rename = "zh")]
    Chinese,
    #[strum(serialize = "ja")]
    #[serde(rename = "ja")]
    Japanese,
    #[strum(serialize = "ko")]
    #[serde(rename = "ko")]
    Korean,
}

impl Language {
    /// Classify `text` by the scripts it contains.
    ///
    /// Hangul wins over everything else, then kana (Japanese text mixes kana
    /// with kanji, so kana must be checked before ideographs), then CJK
    /// ideographs. Text with none of these is English.
    pub fn detect(text: &str) -> Self {
        let mut has_kana = false;
        let mut has_ideograph = false;

        for ch in text.chars() {
            if is_hangul(ch) {
                return Self::Korean;
            }
            has_kana |= is_kana(ch);
            has_ideograph |= is_cjk_ideograph(ch);
        }

        if has_kana {
            Self::Japanese
        } else if has_ideograph {
            Self::Chinese
        } else {
            Self::English
        }
    }

    pub fn is_cjk(self) -> bool {
        !matches!(self, Self::English)
    }

    /// Separator placed between two pieces of text when they are joined.
    pub fn separator(self) -> &'static str {
        match self {
            Self::English => " ",
            Self::Chinese | Self::Japanese | Self::Korean => "",
        }
    }

    pub fn sentence_marks(self) -> &'static [char] {
        match self {
            Self::English => &['.', '!', '?'],
            Self::Chinese | Self::Korean => &['。', '！', '？'],
            Self::Japanese => &['。', '！', '？', '｡'],
        }
    }

    pub fn continuation_marks(self) -> &'static [char] {
        match self {
            Self::English => &[',', ';', ':', '-', '–', '—'],
            Self::Chinese => &['，', '、', '；', '：', '—'],
            Self::Japanese => &['、', '，', '；', '：', '―', '—'],
            Self::Korean => &[',', ';', ':', '，', '；', '：'],
        }
    }
}

fn is_hangul(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x11ff // Hangul Jamo
            | 0x3130..=0x318f // Hangul Compatibility Jamo
            | 0xa960..=0xa97f // Hangul Jamo Extended-A
            | 0xac00..=0xd7af // Hangul Syllables
            | 0xd7b0..=0xd7ff // Hangul Jamo Extended-B
    )
}

fn is_kana(ch: char) -> bool {
    matches!(ch as u32,
        0x3040..=0x309f // Hiragana
            | 0x30a0..=0x30ff // Katakana
            | 0x31f0..=0x31ff // Katakana Phonetic Extensions
            | 0xff66..=0xff9f // Halfwidth Katakana
    )
}

fn is_cjk_ideograph(ch: char) -> bool {
    matches!(ch as u32,
        0x3400..=0x4dbf // CJK Extension A
            | 0x4e00..=0x9fff // CJK Unified Ideographs
            | 0xf900..=0xfaff // CJK Compatibility Ideographs
            | 0x20000..=0x2a6df // CJK Extension B
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_script() {
        assert_eq!(Language::detect("I went to the store"), Language::English);
        assert_eq!(Language::detect("我去商店了。"), Language::Chinese);
        assert_eq!(Language::detect("私は店に行きました。"), Language::Japanese);
        assert_eq!(Language::detect("カタカナ"), Language::Japanese);
        assert_eq!(Language::detect("저는 가게에 갔어요."), Language::Korean);
    }

    #[test]
    fn empty_and_symbols_default_to_english() {
        assert_eq!(Language::detect(""), Language::English);
        assert_eq!(Language::detect("123 ... !!"), Language::English);
        assert_eq!(Language::detect("café déjà vu"), Language::English);
    }

    #[test]
    fn mixed_text_prefers_most_specific_script() {
        assert_eq!(Language::detect("Hello 世界"), Language::Chinese);
        assert_eq!(Language::detect("東京へ行く"), Language::Japanese);
        assert_eq!(Language::detect("漢字 한글"), Language::Korean);
    }

    #[test]
    fn separator_is_space_only_for_english() {
        assert_eq!(Language::English.separator(), " ");
        assert_eq!(Language::Chinese.separator(), "");
        assert_eq!(Language::Japanese.separator(), "");
        assert_eq!(Language::Korean.separator(), "");
    }

    #[test]
    fn parses_iso_codes() {
        assert_eq!("ja".parse::<Language>().unwrap(), Language::Japanese);
        assert_eq!("KO".parse::<Language>().unwrap(), Language::Korean);
        assert_eq!(Language::Chinese.to_string(), "zh");
        assert!("xx".parse::<Language>().is_err());
    }
}
