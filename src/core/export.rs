//! # Export
//!
//! Renders one hadith as text for the pasteboard, share sheet, or a file.
//! Field order is fixed in every style:
//!
//! ```text
//! number → Arabic → English → secondary language (if any) → narrator
//! ```
//!
//! The secondary block is the display language when it is neither Arabic nor
//! English and the hadith carries that translation.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::catalog::Book;
use crate::core::types::{Hadith, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportStyle {
    #[default]
    Plain,
    Markdown,
    /// Pretty-printed JSON of the full record.
    Structured,
}

pub fn format(hadith: &Hadith, style: ExportStyle, language: Language) -> String {
    render(hadith, style, language, None)
}

/// Like `format`, with a reference line for `book` under the header.
pub fn format_with_reference(
    hadith: &Hadith,
    style: ExportStyle,
    language: Language,
    book: &Book,
) -> String {
    render(hadith, style, language, Some(book))
}

pub fn parse_structured(text: &str) -> Result<Hadith, serde_json::Error> {
    serde_json::from_str(text)
}

fn render(hadith: &Hadith, style: ExportStyle, language: Language, book: Option<&Book>) -> String {
    match style {
        ExportStyle::Plain => plain(hadith, language, book),
        ExportStyle::Markdown => markdown(hadith, language, book),
        ExportStyle::Structured => serde_json::to_string_pretty(hadith)
            .expect("in-memory hadith records always serialize"),
    }
}

fn secondary(hadith: &Hadith, language: Language) -> Option<(Language, &str)> {
    match language {
        Language::Arabic | Language::English => None,
        other => hadith.translation(other).map(|text| (other, text)),
    }
}

fn reference_line(hadith: &Hadith, book: &Book) -> String {
    format!(
        "{} {}",
        book.display_name,
        book.sunnah_reference(hadith.number)
    )
}

fn plain(hadith: &Hadith, language: Language, book: Option<&Book>) -> String {
    let mut out = format!("Hadith {}\n", hadith.number);
    if let Some(book) = book {
        out.push_str(&reference_line(hadith, book));
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&hadith.arabic_text);
    out.push_str("\n\n");
    out.push_str(hadith.english());
    out.push('\n');
    if let Some((_, text)) = secondary(hadith, language) {
        out.push('\n');
        out.push_str(text);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&format!("Narrated by {}", hadith.narrator));
    out
}

fn markdown(hadith: &Hadith, language: Language, book: Option<&Book>) -> String {
    let mut out = format!("# Hadith {}\n\n", hadith.number);
    if let Some(book) = book {
        out.push_str(&format!("_{}_\n\n", reference_line(hadith, book)));
    }
    out.push_str("## Arabic\n\n");
    out.push_str(&hadith.arabic_text);
    out.push_str("\n\n## English Translation\n\n");
    out.push_str(hadith.english());
    out.push_str("\n\n");
    if let Some((lang, text)) = secondary(hadith, language) {
        out.push_str(&format!("## {} Translation\n\n{}\n\n", lang.label(), text));
    }
    out.push_str(&format!("**Narrator:** {}", hadith.narrator));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{hadith, with_chapter};

    fn urdu_hadith() -> Hadith {
        let mut h = with_chapter(hadith(7), 2, "Belief", "كتاب الإيمان");
        h.translations.insert(Language::Urdu, "اردو ترجمہ".into());
        h
    }

    #[test]
    fn test_plain_layout() {
        let h = hadith(3);
        let text = format(&h, ExportStyle::Plain, Language::English);
        let expected = format!(
            "Hadith 3\n\n{}\n\n{}\n\nNarrated by {}",
            h.arabic_text,
            h.english(),
            h.narrator
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_plain_includes_secondary_language_before_narrator() {
        let h = urdu_hadith();
        let text = format(&h, ExportStyle::Plain, Language::Urdu);
        let arabic = text.find(&h.arabic_text).unwrap();
        let english = text.find(h.english()).unwrap();
        let urdu = text.find("اردو ترجمہ").unwrap();
        let narrator = text.find("Narrated by").unwrap();
        assert!(arabic < english && english < urdu && urdu < narrator);
    }

    #[test]
    fn test_markdown_headings() {
        let h = urdu_hadith();
        let text = format(&h, ExportStyle::Markdown, Language::Urdu);
        assert!(text.starts_with("# Hadith 7\n"));
        assert!(text.contains("## Arabic\n"));
        assert!(text.contains("## English Translation\n"));
        assert!(text.contains("## Urdu Translation\n"));
        assert!(text.ends_with(&format!("**Narrator:** {}", h.narrator)));

        let english_only = format(&h, ExportStyle::Markdown, Language::English);
        assert!(!english_only.contains("Urdu Translation"));
    }

    #[test]
    fn test_structured_round_trips() {
        let mut h = urdu_hadith();
        h.book = Some(crate::core::types::BookMeta {
            title: "Sahih al-Bukhari".into(),
            arabic_title: "صحيح البخاري".into(),
            id_in_book: Some(7),
            total_hadiths: Some(7563),
        });
        let text = format(&h, ExportStyle::Structured, Language::English);
        assert_eq!(parse_structured(&text).unwrap(), h);

        let bare = hadith(1);
        let text = format(&bare, ExportStyle::Structured, Language::Urdu);
        assert_eq!(parse_structured(&text).unwrap(), bare);
    }

    #[test]
    fn test_reference_line_uses_offset() {
        let book = Book::new("bukhari", "Sahih al-Bukhari", "صحيح البخاري", "bukhari.json")
            .with_offset(2);
        let text = format_with_reference(&hadith(5), ExportStyle::Plain, Language::English, &book);
        assert!(text.starts_with("Hadith 5\nSahih al-Bukhari 7\n\n"));
    }
}
