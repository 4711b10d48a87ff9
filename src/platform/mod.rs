//! # Platform Ports
//!
//! Everything the core needs from the host platform, expressed as traits.
//! The core never talks to a file system, notification center, pasteboard,
//! or speech engine directly; it calls through these.
//!
//! ```text
//!                 ┌──────────────┐
//!                 │     core     │
//!                 └──────┬───────┘
//!        ┌───────────┬───┴───────┬──────────────┐
//!        ▼           ▼           ▼              ▼
//!   DataSource  KeyValueStore  Pasteboard   Speech / Reminders / LoginItems
//!   (bundle)    (kv)           (headless)   (headless)
//! ```

pub mod bundle;
pub mod headless;
pub mod kv;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::settings::ReminderSettings;
use crate::core::store::LoadError;
use crate::core::types::Language;

pub use bundle::DirectorySource;
pub use headless::HeadlessServices;
pub use kv::{JsonFileStore, MemoryStore};

/// Source of bundled book files.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the raw bytes of `file_name`.
    async fn fetch(&self, file_name: &str) -> Result<Vec<u8>, LoadError>;
}

/// Errors from the key-value persistence backend.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceError {
    WriteFailure(String),
    ReadFailure(String),
}

impl PersistenceError {
    pub fn user_message(&self) -> String {
        match self {
            PersistenceError::WriteFailure(_) => {
                "Your change was applied but could not be saved.".to_string()
            }
            PersistenceError::ReadFailure(_) => {
                "Saved preferences could not be read; defaults are in use.".to_string()
            }
        }
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::WriteFailure(msg) => write!(f, "persistence write failed: {msg}"),
            PersistenceError::ReadFailure(msg) => write!(f, "persistence read failed: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

/// Process-local, user-scoped string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&self, key: &str, value: String) -> Result<(), PersistenceError>;
}

/// A host service call failed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformError(pub String);

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "platform error: {}", self.0)
    }
}

impl std::error::Error for PlatformError {}

pub trait Pasteboard: Send + Sync {
    fn copy_text(&self, text: &str) -> Result<(), PlatformError>;
}

pub trait SpeechSynthesizer: Send + Sync {
    fn speak(&self, text: &str, language: Language) -> Result<(), PlatformError>;
    fn stop(&self);
}

/// Rendered reminder notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderContent {
    pub title: String,
    pub body: String,
}

pub trait ReminderScheduler: Send + Sync {
    fn schedule_daily(
        &self,
        settings: &ReminderSettings,
        content: &ReminderContent,
    ) -> Result<(), PlatformError>;
    fn cancel_all(&self);
}

pub trait LoginItems: Send + Sync {
    fn set_enabled(&self, enabled: bool) -> Result<(), PlatformError>;
}

/// The host services handed to the driver. Book data is not here; the
/// store owns its `DataSource`.
#[derive(Clone)]
pub struct Platform {
    pub pasteboard: Arc<dyn Pasteboard>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub reminders: Arc<dyn ReminderScheduler>,
    pub login_items: Arc<dyn LoginItems>,
}

impl Platform {
    /// Logging stand-ins for every service.
    pub fn headless() -> Self {
        let services = Arc::new(HeadlessServices);
        Self {
            pasteboard: services.clone(),
            speech: services.clone(),
            reminders: services.clone(),
            login_items: services,
        }
    }
}
