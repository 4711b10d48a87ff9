//! # Actions
//!
//! Everything that can happen in the reader becomes an `Action`.
//! User presses "next"? That's `Action::Next`.
//! A background load finishes? That's `Action::BookLoaded(outcome)`.
//!
//! `update()` applies an action to the `App` and returns the `Effect` the
//! host must carry out (spawn a load, copy text, schedule a reminder).
//! Platform calls happen in the host, never here.
//!
//! ```text
//! App + Action  →  update()  →  App' + Effect
//! ```

use log::debug;

use crate::core::cursor::NavigationPolicy;
use crate::core::export::ExportStyle;
use crate::core::settings::ReminderSettings;
use crate::core::state::App;
use crate::core::store::{LoadOutcome, LoadTicket};
use crate::core::types::Language;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Load the saved book at the saved position.
    Start,
    SelectBook(String),
    BookLoaded(LoadOutcome),
    Retry,
    SetQuery(String),
    SetLanguage(Language),
    SetFavoritesOnly(bool),
    SetChapter(Option<u32>),
    ClearFilters,
    Next,
    Previous,
    JumpTo(i64),
    JumpToNumber(u32),
    Random,
    /// `None` toggles the current hadith.
    ToggleFavorite(Option<u32>),
    CopyCurrent(ExportStyle),
    SpeakCurrent,
    StopSpeaking,
    SetReminder { enabled: bool, hour: u8, minute: u8 },
    SetLaunchAtLogin(bool),
    CompleteOnboarding,
    SetNavigationPolicy(NavigationPolicy),
}

/// Work for the host after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    SpawnLoad(LoadTicket),
    Copy(String),
    Speak { text: String, language: Language },
    StopSpeech,
    ScheduleReminder(ReminderSettings),
    CancelReminder,
    RegisterLoginItem(bool),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Start => app.start(),
        Action::SelectBook(id) => app.select_book(&id),
        Action::BookLoaded(outcome) => app.apply_load(outcome),
        Action::Retry => app.retry(),
        Action::SetQuery(text) => {
            app.set_query(text);
            Effect::None
        }
        Action::SetLanguage(language) => {
            app.set_language(language);
            Effect::None
        }
        Action::SetFavoritesOnly(on) => {
            app.set_favorites_only(on);
            Effect::None
        }
        Action::SetChapter(chapter) => {
            app.set_chapter(chapter);
            Effect::None
        }
        Action::ClearFilters => {
            app.clear_filters();
            Effect::None
        }
        Action::Next => {
            app.next();
            Effect::None
        }
        Action::Previous => {
            app.previous();
            Effect::None
        }
        Action::JumpTo(index) => {
            app.jump_to(index);
            Effect::None
        }
        Action::JumpToNumber(number) => {
            app.jump_to_number(number);
            Effect::None
        }
        Action::Random => {
            app.random();
            Effect::None
        }
        Action::ToggleFavorite(number) => {
            if let Some(now_favorite) = app.toggle_favorite(number) {
                app.status_message = if now_favorite {
                    "Added to favorites".to_string()
                } else {
                    "Removed from favorites".to_string()
                };
            }
            Effect::None
        }
        Action::CopyCurrent(style) => match app.export_current(style) {
            Some(text) => Effect::Copy(text),
            None => Effect::None,
        },
        Action::SpeakCurrent => match app.speech_for_current() {
            Some((text, language)) => Effect::Speak { text, language },
            None => Effect::None,
        },
        Action::StopSpeaking => Effect::StopSpeech,
        Action::SetReminder {
            enabled,
            hour,
            minute,
        } => app.set_reminder(enabled, hour, minute),
        Action::SetLaunchAtLogin(enabled) => app.set_launch_at_login(enabled),
        Action::CompleteOnboarding => {
            app.complete_onboarding();
            Effect::None
        }
        Action::SetNavigationPolicy(policy) => {
            app.policy = policy;
            Effect::None
        }
    }
}
