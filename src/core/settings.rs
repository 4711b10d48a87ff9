//! # User Settings
//!
//! Typed view over the key-value store. Every value is stored as JSON under
//! its own key so one bad entry never takes the others down: unreadable or
//! missing keys fall back to their defaults.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::catalog::DEFAULT_BOOK_ID;
use crate::core::favorites::FavoriteSet;
use crate::core::types::Language;
use crate::platform::{KeyValueStore, PersistenceError};

pub mod keys {
    pub const FAVORITES: &str = "favorites";
    pub const LAST_VIEWED_INDEX: &str = "last_viewed_index";
    pub const SELECTED_BOOK: &str = "selected_book";
    pub const LANGUAGE: &str = "language";
    pub const ONBOARDING_COMPLETED: &str = "onboarding_completed";
    pub const REMINDER: &str = "reminder";
    pub const LAUNCH_AT_LOGIN: &str = "launch_at_login";
}

/// Daily reminder time. `hour`/`minute` always form a valid wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSettings {
    pub enabled: bool,
    pub hour: u8,
    pub minute: u8,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            hour: 8,
            minute: 0,
        }
    }
}

impl ReminderSettings {
    /// `None` if `hour:minute` is not a valid time of day.
    pub fn new(enabled: bool, hour: u8, minute: u8) -> Option<Self> {
        NaiveTime::from_hms_opt(u32::from(hour), u32::from(minute), 0).map(|_| Self {
            enabled,
            hour,
            minute,
        })
    }

    /// Parse `HH:MM`.
    pub fn parse_time(text: &str) -> Option<(u8, u8)> {
        let time = NaiveTime::parse_from_str(text.trim(), "%H:%M").ok()?;
        Some((time.hour() as u8, time.minute() as u8))
    }

    pub fn time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or_default()
    }

    /// The first reminder time strictly after `now`.
    pub fn next_fire_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.time());
        if today > now { today } else { today + Duration::days(1) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSettings {
    pub selected_book: String,
    pub language: Language,
    pub last_viewed_index: usize,
    pub onboarding_completed: bool,
    pub reminder: ReminderSettings,
    pub launch_at_login: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            selected_book: DEFAULT_BOOK_ID.to_string(),
            language: Language::default(),
            last_viewed_index: 0,
            onboarding_completed: false,
            reminder: ReminderSettings::default(),
            launch_at_login: false,
        }
    }
}

fn read<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("Could not read '{}': {}", key, e);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring malformed value for '{}': {}", key, e);
            None
        }
    }
}

pub fn write<T: Serialize>(
    kv: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(value)
        .map_err(|e| PersistenceError::WriteFailure(format!("{key}: {e}")))?;
    kv.set(key, json)
}

impl UserSettings {
    pub fn load(kv: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();
        let reminder = read::<ReminderSettings>(kv, keys::REMINDER)
            .and_then(|r| ReminderSettings::new(r.enabled, r.hour, r.minute))
            .unwrap_or(defaults.reminder);
        Self {
            selected_book: read(kv, keys::SELECTED_BOOK).unwrap_or(defaults.selected_book),
            language: read(kv, keys::LANGUAGE).unwrap_or(defaults.language),
            last_viewed_index: read(kv, keys::LAST_VIEWED_INDEX).unwrap_or(0),
            onboarding_completed: read(kv, keys::ONBOARDING_COMPLETED).unwrap_or(false),
            reminder,
            launch_at_login: read(kv, keys::LAUNCH_AT_LOGIN).unwrap_or(false),
        }
    }

    pub fn save_all(&self, kv: &dyn KeyValueStore) -> Result<(), PersistenceError> {
        write(kv, keys::SELECTED_BOOK, &self.selected_book)?;
        write(kv, keys::LANGUAGE, &self.language)?;
        write(kv, keys::LAST_VIEWED_INDEX, &self.last_viewed_index)?;
        write(kv, keys::ONBOARDING_COMPLETED, &self.onboarding_completed)?;
        write(kv, keys::REMINDER, &self.reminder)?;
        write(kv, keys::LAUNCH_AT_LOGIN, &self.launch_at_login)
    }
}

pub fn load_favorites(kv: &dyn KeyValueStore) -> FavoriteSet {
    match kv.get(keys::FAVORITES) {
        Ok(Some(json)) => FavoriteSet::from_json(&json).unwrap_or_else(|e| {
            warn!("Ignoring malformed favorites: {}", e);
            FavoriteSet::new()
        }),
        Ok(None) => FavoriteSet::new(),
        Err(e) => {
            warn!("Could not read favorites: {}", e);
            FavoriteSet::new()
        }
    }
}

pub fn save_favorites(kv: &dyn KeyValueStore, favorites: &FavoriteSet) -> Result<(), PersistenceError> {
    kv.set(keys::FAVORITES, favorites.to_json())
}
