//! # Search
//!
//! Produces the filtered view the cursor and UI work over. Filters apply in
//! a fixed order (favorites, then chapter, then text) and only ever remove
//! items; input order is preserved.
//!
//! Text search is content-wide: the query is matched against the display
//! text, narrator, Arabic text, and the "Hadith N" label, joined by single
//! spaces, no matter which language is displayed.

use crate::core::favorites::FavoriteSet;
use crate::core::types::{Hadith, Language};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub language: Language,
    pub favorites_only: bool,
    pub chapter: Option<u32>,
}

impl SearchQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// True when the query filters nothing out.
    pub fn is_passthrough(&self) -> bool {
        self.text.trim().is_empty() && !self.favorites_only && self.chapter.is_none()
    }
}

pub fn matches(hadith: &Hadith, query: &SearchQuery, favorites: &FavoriteSet) -> bool {
    matches_with_needle(hadith, query, &query.text.trim().to_lowercase(), favorites)
}

fn matches_with_needle(
    hadith: &Hadith,
    query: &SearchQuery,
    needle: &str,
    favorites: &FavoriteSet,
) -> bool {
    (!query.favorites_only || favorites.contains(hadith.number))
        && query.chapter.is_none_or(|c| hadith.chapter_id == Some(c))
        && (needle.is_empty() || matches_text(hadith, needle, query.language))
}

fn matches_text(hadith: &Hadith, needle: &str, language: Language) -> bool {
    let haystack = format!(
        "{} {} {} {}",
        hadith.text_in(language),
        hadith.narrator,
        hadith.arabic_text,
        hadith.label()
    );
    haystack.to_lowercase().contains(needle)
}

pub fn search(hadiths: &[Hadith], query: &SearchQuery, favorites: &FavoriteSet) -> Vec<Hadith> {
    if query.is_passthrough() {
        return hadiths.to_vec();
    }
    let needle = query.text.trim().to_lowercase();
    hadiths
        .iter()
        .filter(|h| matches_with_needle(h, query, &needle, favorites))
        .cloned()
        .collect()
}
