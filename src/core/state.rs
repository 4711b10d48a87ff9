//! # Application State
//!
//! Core reading state. No UI types, no platform calls beyond the injected
//! key-value store.
//!
//! ```text
//! App
//! ├── catalog: BookCatalog          // static book metadata (+ offsets)
//! ├── store: HadithStore            // authoritative list for the active book
//! ├── favorites: FavoriteSet        // hadith numbers, shared by all books
//! ├── settings: UserSettings        // persisted user state
//! ├── query: SearchQuery            // text + language + favorites + chapter
//! ├── cursor: CursorState           // position in `filtered`
//! ├── policy: NavigationPolicy      // wrap or bounded stepping
//! ├── filtered: Vec<Hadith>         // derived: search(store, query)
//! ├── chapters: Vec<ChapterGroup>   // derived: chapters_for(store)
//! ├── status_message: String        // status line text
//! └── error: Option<String>         // last user-facing error
//! ```
//!
//! Derived fields are only ever rebuilt by `on_list_changed` and
//! `refresh_view`; nothing else writes them.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;

use crate::core::action::Effect;
use crate::core::catalog::{Book, BookCatalog};
use crate::core::chapters::{ChapterGroup, chapters_for};
use crate::core::config::ResolvedConfig;
use crate::core::cursor::{CursorState, NavigationPolicy, resolve_across_filter_change};
use crate::core::export::{self, ExportStyle};
use crate::core::favorites::FavoriteSet;
use crate::core::search::{SearchQuery, search};
use crate::core::settings::{self, ReminderSettings, UserSettings, keys};
use crate::core::store::{HadithStore, LoadApplied, LoadOutcome, LoadRequest};
use crate::core::types::{Hadith, Language};
use crate::platform::{KeyValueStore, ReminderContent};

/// Longest reminder body before it is cut with an ellipsis.
const REMINDER_BODY_CHARS: usize = 180;

pub struct App {
    pub catalog: BookCatalog,
    pub store: HadithStore,
    pub favorites: FavoriteSet,
    pub settings: UserSettings,
    pub query: SearchQuery,
    pub cursor: CursorState,
    pub policy: NavigationPolicy,
    pub status_message: String,
    pub error: Option<String>,
    kv: Arc<dyn KeyValueStore>,
    filtered: Vec<Hadith>,
    chapters: Vec<ChapterGroup>,
    /// Index to land on when the pending load completes.
    pending_index: Option<usize>,
}

impl App {
    pub fn new(
        catalog: BookCatalog,
        store: HadithStore,
        kv: Arc<dyn KeyValueStore>,
        policy: NavigationPolicy,
    ) -> Self {
        let settings = UserSettings::load(kv.as_ref());
        let favorites = settings::load_favorites(kv.as_ref());
        let query = SearchQuery {
            language: settings.language,
            ..Default::default()
        };
        Self {
            catalog,
            store,
            favorites,
            settings,
            query,
            cursor: CursorState::Empty,
            policy,
            status_message: String::from("Welcome"),
            error: None,
            kv,
            filtered: Vec::new(),
            chapters: Vec::new(),
            pending_index: None,
        }
    }

    /// Build from resolved config: offsets, navigation policy, and the
    /// default book / language when the user has not chosen one yet.
    pub fn from_config(store: HadithStore, kv: Arc<dyn KeyValueStore>, config: &ResolvedConfig) -> Self {
        let catalog = BookCatalog::builtin().with_offsets(&config.offsets);
        let has_saved_book = matches!(kv.get(keys::SELECTED_BOOK), Ok(Some(_)));
        let mut app = Self::new(catalog, store, kv, config.navigation);
        if !has_saved_book {
            app.settings.selected_book = config.default_book.clone();
        }
        if let Some(language) = config.language {
            app.query.language = language;
        }
        app
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    pub fn filtered(&self) -> &[Hadith] {
        &self.filtered
    }

    pub fn chapters(&self) -> &[ChapterGroup] {
        &self.chapters
    }

    pub fn language(&self) -> Language {
        self.query.language
    }

    pub fn current(&self) -> Option<&Hadith> {
        self.cursor.index().and_then(|i| self.filtered.get(i))
    }

    pub fn current_book(&self) -> Option<&Book> {
        self.store.active_book().and_then(|id| self.catalog.get(id))
    }

    pub fn sunnah_reference(&self) -> Option<u32> {
        let book = self.current_book()?;
        self.current().map(|h| book.sunnah_reference(h.number))
    }

    /// The hadith at `index` (clamped) of `book_id`'s full list, if that
    /// book is the one loaded.
    pub fn current_hadith(&self, book_id: &str, index: usize) -> Option<&Hadith> {
        if self.store.active_book() != Some(book_id) {
            return None;
        }
        let list = self.store.current_hadiths();
        CursorState::clamp(index as i64, list.len())
            .index()
            .and_then(|i| list.get(i))
    }

    /// Notification text for the reader's current place in their book.
    pub fn reminder_content(&self) -> Option<ReminderContent> {
        let book = self.current_book()?;
        let hadith = self.current_hadith(&book.id, self.settings.last_viewed_index)?;
        let text = hadith.text_in(self.language());
        let mut body: String = text.chars().take(REMINDER_BODY_CHARS).collect();
        if text.chars().count() > REMINDER_BODY_CHARS {
            body.push('…');
        }
        Some(ReminderContent {
            title: format!("{} {}", book.display_name, book.sunnah_reference(hadith.number)),
            body,
        })
    }

    pub fn can_step_forward(&self) -> bool {
        self.cursor.can_step_forward(self.filtered.len(), self.policy)
    }

    pub fn can_step_back(&self) -> bool {
        self.cursor.can_step_back(self.filtered.len(), self.policy)
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Load the saved book, restoring the saved position.
    pub fn start(&mut self) -> Effect {
        let book_id = self.settings.selected_book.clone();
        self.select_book(&book_id)
    }

    pub fn select_book(&mut self, book_id: &str) -> Effect {
        let Some(book) = self.catalog.get(book_id).cloned() else {
            warn!("Unknown book '{}'", book_id);
            self.error = Some(format!("Unknown book '{book_id}'"));
            return Effect::None;
        };

        if book.id != self.settings.selected_book {
            self.settings.selected_book = book.id.clone();
            self.persist(keys::SELECTED_BOOK, &book.id);
            self.pending_index = Some(0);
            // Chapter ids are per book.
            self.query.chapter = None;
        } else if self.store.active_book().is_none() {
            self.pending_index = Some(self.settings.last_viewed_index);
        }

        match self.store.request_load(&book) {
            LoadRequest::Cached { count } => {
                self.error = None;
                self.status_message = format!("{} ({} hadiths)", book.display_name, count);
                self.on_list_changed();
                Effect::None
            }
            LoadRequest::Fetch(ticket) => {
                self.status_message = format!("Loading {}…", book.display_name);
                Effect::SpawnLoad(ticket)
            }
        }
    }

    pub fn apply_load(&mut self, outcome: LoadOutcome) -> Effect {
        match self.store.complete_load(outcome) {
            Ok(LoadApplied::Stale) => {}
            Ok(LoadApplied::Ready { count }) => {
                self.error = None;
                let name = self
                    .current_book()
                    .map(|b| b.display_name.clone())
                    .unwrap_or_default();
                self.status_message = format!("{name} ({count} hadiths)");
                self.on_list_changed();
            }
            Err(e) => {
                self.error = Some(e.user_message());
                self.status_message = "Load failed".to_string();
                self.pending_index = None;
                self.on_list_changed();
            }
        }
        Effect::None
    }

    pub fn retry(&mut self) -> Effect {
        self.store.clear_cache();
        let book_id = self.settings.selected_book.clone();
        self.pending_index = Some(self.settings.last_viewed_index);
        self.select_book(&book_id)
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    pub fn set_query(&mut self, text: String) {
        self.query.text = text;
        self.refresh_view();
    }

    pub fn set_language(&mut self, language: Language) {
        self.query.language = language;
        self.settings.language = language;
        self.persist(keys::LANGUAGE, &language);
        // Language affects what a text query matches.
        self.refresh_view();
    }

    pub fn set_favorites_only(&mut self, favorites_only: bool) {
        self.query.favorites_only = favorites_only;
        self.refresh_view();
    }

    pub fn set_chapter(&mut self, chapter: Option<u32>) {
        self.query.chapter = chapter;
        self.refresh_view();
    }

    pub fn clear_filters(&mut self) {
        let language = self.query.language;
        self.query = SearchQuery {
            language,
            ..Default::default()
        };
        self.refresh_view();
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn next(&mut self) {
        self.move_to(self.cursor.next(self.filtered.len(), self.policy));
    }

    pub fn previous(&mut self) {
        self.move_to(self.cursor.previous(self.filtered.len(), self.policy));
    }

    pub fn jump_to(&mut self, index: i64) {
        self.move_to(CursorState::clamp(index, self.filtered.len()));
    }

    /// Returns `false` if `number` is not in the current view.
    pub fn jump_to_number(&mut self, number: u32) -> bool {
        match self.filtered.iter().position(|h| h.number == number) {
            Some(index) => {
                self.move_to(CursorState::Positioned(index));
                true
            }
            None => {
                self.status_message = format!("Hadith {number} is not in the current view");
                false
            }
        }
    }

    /// Jump to a random hadith of the book, leaving any search that hides it.
    pub fn random(&mut self) {
        let Some(number) = self.store.get_random().map(|h| h.number) else {
            return;
        };
        if !self.filtered.iter().any(|h| h.number == number) {
            self.clear_filters();
        }
        self.jump_to_number(number);
    }

    /// Move the cursor. The saved position is the hadith's index in the
    /// book's full list, whatever filters are on.
    fn move_to(&mut self, cursor: CursorState) {
        self.cursor = cursor;
        let Some(number) = self.current().map(|h| h.number) else {
            return;
        };
        if let Ok(index) = self
            .store
            .current_hadiths()
            .binary_search_by_key(&number, |h| h.number)
            && index != self.settings.last_viewed_index
        {
            self.settings.last_viewed_index = index;
            self.persist(keys::LAST_VIEWED_INDEX, &index);
        }
    }

    // ------------------------------------------------------------------
    // Favorites & preferences
    // ------------------------------------------------------------------

    /// Toggle `number` (or the current hadith). The in-memory change stands
    /// even if saving fails.
    pub fn toggle_favorite(&mut self, number: Option<u32>) -> Option<bool> {
        let number = number.or_else(|| self.current().map(|h| h.number))?;
        let now_favorite = self.favorites.toggle(number);
        debug!("Hadith {} favorite={}", number, now_favorite);
        if let Err(e) = settings::save_favorites(self.kv.as_ref(), &self.favorites) {
            warn!("Failed to save favorites: {}", e);
            self.error = Some(e.user_message());
        }
        if self.query.favorites_only {
            self.refresh_view();
        }
        Some(now_favorite)
    }

    pub fn set_reminder(&mut self, enabled: bool, hour: u8, minute: u8) -> Effect {
        let Some(reminder) = ReminderSettings::new(enabled, hour, minute) else {
            self.error = Some(format!("{hour:02}:{minute:02} is not a valid time"));
            return Effect::None;
        };
        self.settings.reminder = reminder;
        self.persist(keys::REMINDER, &reminder);
        if reminder.enabled {
            Effect::ScheduleReminder(reminder)
        } else {
            Effect::CancelReminder
        }
    }

    pub fn set_launch_at_login(&mut self, enabled: bool) -> Effect {
        self.settings.launch_at_login = enabled;
        self.persist(keys::LAUNCH_AT_LOGIN, &enabled);
        Effect::RegisterLoginItem(enabled)
    }

    pub fn complete_onboarding(&mut self) {
        self.settings.onboarding_completed = true;
        self.persist(keys::ONBOARDING_COMPLETED, &true);
    }

    // ------------------------------------------------------------------
    // Export & speech
    // ------------------------------------------------------------------

    pub fn export_current(&self, style: ExportStyle) -> Option<String> {
        let hadith = self.current()?;
        Some(match self.current_book() {
            Some(book) if style != ExportStyle::Structured => {
                export::format_with_reference(hadith, style, self.language(), book)
            }
            _ => export::format(hadith, style, self.language()),
        })
    }

    /// Text and voice language for reading the current hadith aloud.
    pub fn speech_for_current(&self) -> Option<(String, Language)> {
        let hadith = self.current()?;
        let language = [self.language(), Language::English]
            .into_iter()
            .find(|l| hadith.translation(*l).is_some())
            .unwrap_or(Language::Arabic);
        Some((hadith.text_in(language).to_string(), language))
    }

    // ------------------------------------------------------------------
    // Derived view
    // ------------------------------------------------------------------

    /// The store's list was replaced: rebuild chapters and the view.
    fn on_list_changed(&mut self) {
        self.chapters = chapters_for(self.store.current_hadiths());
        match self.pending_index.take() {
            Some(index) => {
                let list = self.store.current_hadiths();
                let number = CursorState::clamp(index as i64, list.len())
                    .index()
                    .and_then(|i| list.get(i))
                    .map(|h| h.number);
                self.filtered = search(list, &self.query, &self.favorites);
                let cursor = resolve_across_filter_change(number, &self.filtered);
                self.move_to(cursor);
            }
            None => self.refresh_view(),
        }
        info!(
            "View rebuilt: {} of {} hadiths, {} chapters",
            self.filtered.len(),
            self.store.current_hadiths().len(),
            self.chapters.len()
        );
    }

    /// Recompute the filtered list and keep the cursor on the same hadith.
    fn refresh_view(&mut self) {
        let previous = self.current().map(|h| h.number);
        self.filtered = search(self.store.current_hadiths(), &self.query, &self.favorites);
        let cursor = resolve_across_filter_change(previous, &self.filtered);
        self.move_to(cursor);
    }

    fn persist<T: Serialize>(&mut self, key: &str, value: &T) {
        if let Err(e) = settings::write(self.kv.as_ref(), key, value) {
            warn!("Failed to persist '{}': {}", key, e);
            self.error = Some(e.user_message());
        }
    }
}
