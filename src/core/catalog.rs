//! # Book Catalog
//!
//! Static metadata for the bundled collections. Books are defined at compile
//! time; the only runtime input is an optional per-book numbering offset
//! from the config file.

use std::collections::HashMap;

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: String,
    pub display_name: String,
    pub native_name: String,
    pub data_file_name: String,
    /// Added to a hadith number to get its sunnah.com-style reference.
    pub numbering_offset: u32,
}

impl Book {
    pub fn new(id: &str, display_name: &str, native_name: &str, data_file_name: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            native_name: native_name.to_string(),
            data_file_name: data_file_name.to_string(),
            numbering_offset: 0,
        }
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.numbering_offset = offset;
        self
    }

    pub fn sunnah_reference(&self, hadith_number: u32) -> u32 {
        hadith_number.saturating_add(self.numbering_offset)
    }
}

pub const DEFAULT_BOOK_ID: &str = "bukhari";

/// (id, display name, native name, data file)
const BUILTIN_BOOKS: &[(&str, &str, &str, &str)] = &[
    ("bukhari", "Sahih al-Bukhari", "صحيح البخاري", "bukhari.json"),
    ("muslim", "Sahih Muslim", "صحيح مسلم", "muslim.json"),
    ("abudawud", "Sunan Abi Dawud", "سنن أبي داود", "abudawud.json"),
    ("tirmidhi", "Jami` at-Tirmidhi", "جامع الترمذي", "tirmidhi.json"),
    ("nasai", "Sunan an-Nasa'i", "سنن النسائي", "nasai.json"),
    ("ibnmajah", "Sunan Ibn Majah", "سنن ابن ماجه", "ibnmajah.json"),
    ("nawawi40", "40 Hadith Nawawi", "الأربعون النووية", "nawawi40.json"),
];

#[derive(Debug, Clone)]
pub struct BookCatalog {
    books: Vec<Book>,
}

impl Default for BookCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BookCatalog {
    pub fn builtin() -> Self {
        let books = BUILTIN_BOOKS
            .iter()
            .map(|(id, name, native, file)| Book::new(id, name, native, file))
            .collect();
        Self { books }
    }

    /// Apply configured numbering offsets. Unknown ids are ignored with a warning.
    pub fn with_offsets(mut self, offsets: &HashMap<String, u32>) -> Self {
        for (id, offset) in offsets {
            match self.books.iter_mut().find(|b| &b.id == id) {
                Some(book) => book.numbering_offset = *offset,
                None => log::warn!("Ignoring numbering offset for unknown book '{}'", id),
            }
        }
        self
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn sunnah_reference(&self, book_id: &str, hadith_number: u32) -> Option<u32> {
        self.get(book_id).map(|b| b.sunnah_reference(hadith_number))
    }
}
