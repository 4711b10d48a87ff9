//! # Hadith Store
//!
//! Owns the authoritative list for the one active book.
//!
//! ```text
//!            request_load()                 complete_load(outcome)
//!   Idle ─────────────────▶ Loading ─────────────────────────────▶ Ready
//!                              │                                   │
//!                              └──────────────▶ Failed ◀───────────┘ (next load)
//! ```
//!
//! Loading is split so the slow half can run off the observation thread:
//! `request_load` hands out a `LoadTicket`, `fetch_and_parse` does the I/O
//! and parsing anywhere, and `complete_load` applies the result back on the
//! owner. Every request bumps a generation counter; an outcome whose ticket
//! is not the latest generation is dropped, so loads never land out of order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use rand::seq::IndexedRandom;

use crate::core::catalog::Book;
use crate::core::types::{Hadith, parse_hadiths};
use crate::platform::DataSource;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The bundled file for the book does not exist.
    DataSourceNotFound(String),
    /// The file exists but is not a valid hadith array.
    DataDecodeError(String),
    /// The file parsed but holds no usable records.
    EmptyOrInvalidDataset(String),
    /// The file could not be read for a reason other than absence.
    Unreadable(String),
}

impl LoadError {
    /// Message suitable for a status line. All load errors are retryable.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::DataSourceNotFound(file) => {
                format!("The data file '{file}' is missing. Please reinstall or retry.")
            }
            LoadError::DataDecodeError(_) => {
                "The book data could not be read. Please retry.".to_string()
            }
            LoadError::EmptyOrInvalidDataset(_) => {
                "The book data is empty or damaged. Please retry.".to_string()
            }
            LoadError::Unreadable(_) => "The book data could not be opened. Please retry.".to_string(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::DataSourceNotFound(file) => write!(f, "data source not found: {file}"),
            LoadError::DataDecodeError(msg) => write!(f, "data decode error: {msg}"),
            LoadError::EmptyOrInvalidDataset(msg) => write!(f, "empty or invalid dataset: {msg}"),
            LoadError::Unreadable(msg) => write!(f, "data source unreadable: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading { book_id: String },
    Ready { book_id: String, count: usize },
    Failed { book_id: String, error: LoadError },
}

/// Permission to apply one load result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub book_id: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub ticket: LoadTicket,
    pub result: Result<Vec<Hadith>, LoadError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    /// Served from cache and already applied.
    Cached { count: usize },
    /// Must be fetched; hand the ticket to `fetch_and_parse`.
    Fetch(LoadTicket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadApplied {
    Ready { count: usize },
    /// A newer load started after this one; the outcome was discarded.
    Stale,
}

pub struct HadithStore {
    source: Arc<dyn DataSource>,
    hadiths: Arc<[Hadith]>,
    cache: HashMap<String, Arc<[Hadith]>>,
    state: LoadState,
    generation: u64,
    /// Bumped whenever `hadiths` is replaced.
    revision: u64,
    active_book: Option<String>,
}

impl HadithStore {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            hadiths: Arc::from(Vec::new()),
            cache: HashMap::new(),
            state: LoadState::Idle,
            generation: 0,
            revision: 0,
            active_book: None,
        }
    }

    pub fn source(&self) -> Arc<dyn DataSource> {
        self.source.clone()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading { .. })
    }

    pub fn active_book(&self) -> Option<&str> {
        self.active_book.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn current_hadiths(&self) -> &[Hadith] {
        &self.hadiths
    }

    pub fn hadith_by_number(&self, number: u32) -> Option<&Hadith> {
        self.hadiths
            .binary_search_by_key(&number, |h| h.number)
            .ok()
            .map(|i| &self.hadiths[i])
    }

    pub fn get_random(&self) -> Option<&Hadith> {
        self.hadiths.choose(&mut rand::rng())
    }

    pub fn is_cached(&self, file_name: &str) -> bool {
        self.cache.contains_key(file_name)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Start loading `book`. Any load still in flight is superseded.
    pub fn request_load(&mut self, book: &Book) -> LoadRequest {
        self.generation += 1;

        if let Some(cached) = self.cache.get(&book.data_file_name).cloned() {
            debug!("Cache hit for {} (generation {})", book.data_file_name, self.generation);
            let count = cached.len();
            self.replace(book.id.clone(), cached);
            return LoadRequest::Cached { count };
        }

        info!("Loading book '{}' (generation {})", book.id, self.generation);
        self.state = LoadState::Loading {
            book_id: book.id.clone(),
        };
        LoadRequest::Fetch(LoadTicket {
            generation: self.generation,
            book_id: book.id.clone(),
            file_name: book.data_file_name.clone(),
        })
    }

    /// Apply a finished load. Stale outcomes are discarded untouched.
    pub fn complete_load(&mut self, outcome: LoadOutcome) -> Result<LoadApplied, LoadError> {
        let LoadOutcome { ticket, result } = outcome;
        if ticket.generation != self.generation {
            debug!(
                "Discarding stale load of '{}' (generation {} < {})",
                ticket.book_id, ticket.generation, self.generation
            );
            return Ok(LoadApplied::Stale);
        }

        match result {
            Ok(hadiths) => {
                let list: Arc<[Hadith]> = Arc::from(hadiths);
                let count = list.len();
                self.cache.insert(ticket.file_name, list.clone());
                self.replace(ticket.book_id, list);
                Ok(LoadApplied::Ready { count })
            }
            Err(error) => {
                warn!("Failed to load '{}': {}", ticket.book_id, error);
                self.hadiths = Arc::from(Vec::new());
                self.revision += 1;
                self.active_book = Some(ticket.book_id.clone());
                self.state = LoadState::Failed {
                    book_id: ticket.book_id,
                    error: error.clone(),
                };
                Err(error)
            }
        }
    }

    /// Load `book` start to finish on the current task.
    pub async fn load_book(&mut self, book: &Book) -> Result<(), LoadError> {
        match self.request_load(book) {
            LoadRequest::Cached { .. } => Ok(()),
            LoadRequest::Fetch(ticket) => {
                let outcome = fetch_and_parse(self.source.clone(), ticket).await;
                self.complete_load(outcome).map(|_| ())
            }
        }
    }

    fn replace(&mut self, book_id: String, list: Arc<[Hadith]>) {
        info!("Book '{}' ready with {} hadiths", book_id, list.len());
        self.state = LoadState::Ready {
            book_id: book_id.clone(),
            count: list.len(),
        };
        self.hadiths = list;
        self.revision += 1;
        self.active_book = Some(book_id);
    }
}

/// Fetch and parse the ticket's file. Parsing runs on the blocking pool.
pub async fn fetch_and_parse(source: Arc<dyn DataSource>, ticket: LoadTicket) -> LoadOutcome {
    debug!("Fetching {} from {} source", ticket.file_name, source.name());
    let result = match source.fetch(&ticket.file_name).await {
        Ok(bytes) => match tokio::task::spawn_blocking(move || parse_hadiths(&bytes)).await {
            Ok(parsed) => parsed,
            Err(e) => Err(LoadError::DataDecodeError(format!("parser task failed: {e}"))),
        },
        Err(e) => Err(e),
    };
    LoadOutcome { ticket, result }
}
