//! # Hadith Records
//!
//! The content model shared by every other core module, plus the wire format
//! of the bundled per-book data files and the validation that turns one into
//! the other.
//!
//! ```text
//! <book>.json ──serde──▶ Vec<HadithRecord> ──validate──▶ Vec<Hadith> (sorted by number)
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::store::LoadError;

/// Display/translation language.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Arabic,
    #[default]
    English,
    Urdu,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Arabic => "arabic",
            Language::English => "english",
            Language::Urdu => "urdu",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::Arabic => "Arabic",
            Language::English => "English",
            Language::Urdu => "Urdu",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        match code.trim().to_ascii_lowercase().as_str() {
            "arabic" | "ar" => Some(Language::Arabic),
            "english" | "en" => Some(Language::English),
            "urdu" | "ur" => Some(Language::Urdu),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChapterInfo {
    pub title: String,
    #[serde(default)]
    pub arabic_title: String,
}

/// Edition metadata some books carry alongside each record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookMeta {
    pub title: String,
    #[serde(default)]
    pub arabic_title: String,
    pub id_in_book: Option<u32>,
    pub total_hadiths: Option<u32>,
}

/// A single hadith. `number` is the only cross-reference key; positions in
/// any list are view-local.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Hadith {
    pub number: u32,
    pub arabic_text: String,
    pub translations: BTreeMap<Language, String>,
    pub narrator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<ChapterInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<BookMeta>,
}

impl Hadith {
    pub fn english(&self) -> &str {
        self.translations
            .get(&Language::English)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Translation stored for exactly `language`, without fallback.
    pub fn translation(&self, language: Language) -> Option<&str> {
        if language == Language::Arabic {
            return Some(&self.arabic_text);
        }
        self.translations
            .get(&language)
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
    }

    /// Text to show for `language`: the language itself, then English, then Arabic.
    pub fn text_in(&self, language: Language) -> &str {
        self.translation(language)
            .or_else(|| self.translation(Language::English))
            .unwrap_or(&self.arabic_text)
    }

    pub fn chapter_title(&self) -> Option<&str> {
        self.chapter.as_ref().map(|c| c.title.as_str())
    }

    pub fn chapter_arabic_title(&self) -> Option<&str> {
        self.chapter.as_ref().map(|c| c.arabic_title.as_str())
    }

    pub fn label(&self) -> String {
        format!("Hadith {}", self.number)
    }
}

// ============================================================================
// Wire Format
// ============================================================================

/// One record as it appears in a bundled book file.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HadithRecord {
    pub number: i64,
    pub arabic_text: String,
    pub english_translation: String,
    pub narrator: String,
    pub chapter_id: Option<u32>,
    pub chapter: Option<ChapterInfo>,
    pub book: Option<BookMeta>,
    /// Extra translations keyed by language code ("urdu", "ur", ...).
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

impl HadithRecord {
    fn into_hadith(self) -> Result<Hadith, String> {
        if self.number <= 0 || self.number > i64::from(u32::MAX) {
            return Err(format!("invalid hadith number {}", self.number));
        }
        let number = self.number as u32;
        if self.arabic_text.trim().is_empty() {
            return Err(format!("hadith {number} has no Arabic text"));
        }
        if self.english_translation.trim().is_empty() {
            return Err(format!("hadith {number} has no English translation"));
        }
        if self.narrator.trim().is_empty() {
            return Err(format!("hadith {number} has no narrator"));
        }

        let mut translations = BTreeMap::new();
        for (code, text) in self.translations {
            match Language::from_code(&code) {
                Some(Language::Arabic) | Some(Language::English) => {}
                Some(language) => {
                    translations.insert(language, text);
                }
                None => log::debug!("Ignoring unknown translation '{}' on hadith {}", code, number),
            }
        }
        translations.insert(Language::English, self.english_translation);

        Ok(Hadith {
            number,
            arabic_text: self.arabic_text,
            translations,
            narrator: self.narrator,
            chapter_id: self.chapter_id,
            chapter: self.chapter,
            book: self.book,
        })
    }
}

/// Parse and validate a book file. The result is non-empty, number-unique,
/// and sorted by number; anything else is an error.
pub fn parse_hadiths(bytes: &[u8]) -> Result<Vec<Hadith>, LoadError> {
    let records: Vec<HadithRecord> =
        serde_json::from_slice(bytes).map_err(|e| LoadError::DataDecodeError(e.to_string()))?;

    if records.is_empty() {
        return Err(LoadError::EmptyOrInvalidDataset("file contains no records".into()));
    }

    let mut seen = HashSet::with_capacity(records.len());
    let mut hadiths = Vec::with_capacity(records.len());
    for record in records {
        let hadith = record.into_hadith().map_err(LoadError::EmptyOrInvalidDataset)?;
        if !seen.insert(hadith.number) {
            return Err(LoadError::EmptyOrInvalidDataset(format!(
                "duplicate hadith number {}",
                hadith.number
            )));
        }
        hadiths.push(hadith);
    }

    hadiths.sort_by_key(|h| h.number);
    Ok(hadiths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sorts_and_keeps_optional_fields() {
        let json = r#"[
            {"number": 2, "arabicText": "ب", "englishTranslation": "Second", "narrator": "Abu Hurairah",
             "chapterId": 1, "chapter": {"title": "Revelation", "arabicTitle": "الوحي"}},
            {"number": 1, "arabicText": "أ", "englishTranslation": "First", "narrator": "Umar",
             "translations": {"urdu": "پہلا"},
             "book": {"title": "Sahih al-Bukhari", "arabicTitle": "صحيح البخاري", "idInBook": 1, "totalHadiths": 7563}}
        ]"#;
        let hadiths = parse_hadiths(json.as_bytes()).unwrap();
        assert_eq!(hadiths.len(), 2);
        assert_eq!(hadiths[0].number, 1);
        assert_eq!(hadiths[0].translation(Language::Urdu), Some("پہلا"));
        assert_eq!(hadiths[0].book.as_ref().unwrap().total_hadiths, Some(7563));
        assert_eq!(hadiths[1].chapter_id, Some(1));
        assert_eq!(hadiths[1].chapter_title(), Some("Revelation"));
    }

    #[test]
    fn test_parse_rejects_empty_array() {
        assert!(matches!(
            parse_hadiths(b"[]"),
            Err(LoadError::EmptyOrInvalidDataset(_))
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_hadiths(b"{not json"),
            Err(LoadError::DataDecodeError(_))
        ));
    }

    #[test]
    fn test_parse_rejects_duplicate_numbers() {
        let json = r#"[
            {"number": 1, "arabicText": "أ", "englishTranslation": "a", "narrator": "x"},
            {"number": 1, "arabicText": "ب", "englishTranslation": "b", "narrator": "y"}
        ]"#;
        let err = parse_hadiths(json.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_parse_rejects_non_positive_number_and_blank_text() {
        let zero = r#"[{"number": 0, "arabicText": "أ", "englishTranslation": "a", "narrator": "x"}]"#;
        assert!(parse_hadiths(zero.as_bytes()).is_err());

        let blank = r#"[{"number": 3, "arabicText": "  ", "englishTranslation": "a", "narrator": "x"}]"#;
        assert!(parse_hadiths(blank.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_requires_narrator() {
        let blank = r#"[{"number": 4, "arabicText": "أ", "englishTranslation": "a", "narrator": " "}]"#;
        assert_eq!(
            parse_hadiths(blank.as_bytes()),
            Err(LoadError::EmptyOrInvalidDataset("hadith 4 has no narrator".into()))
        );

        let missing = r#"[{"number": 4, "arabicText": "أ", "englishTranslation": "a"}]"#;
        assert!(matches!(
            parse_hadiths(missing.as_bytes()),
            Err(LoadError::DataDecodeError(_))
        ));
    }

    #[test]
    fn test_text_in_falls_back_to_english_then_arabic() {
        let mut hadith = parse_hadiths(
            r#"[{"number": 1, "arabicText": "نص", "englishTranslation": "Text", "narrator": "x"}]"#.as_bytes(),
        )
        .unwrap()
        .remove(0);
        assert_eq!(hadith.text_in(Language::Urdu), "Text");
        assert_eq!(hadith.text_in(Language::Arabic), "نص");

        hadith.translations.clear();
        assert_eq!(hadith.text_in(Language::Urdu), "نص");
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("EN"), Some(Language::English));
        assert_eq!(Language::from_code("urdu"), Some(Language::Urdu));
        assert_eq!(Language::from_code("klingon"), None);
        assert_eq!(Language::Arabic.code(), "arabic");
    }
}
