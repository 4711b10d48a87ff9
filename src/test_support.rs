//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;

use crate::core::catalog::{Book, BookCatalog};
use crate::core::cursor::NavigationPolicy;
use crate::core::settings::ReminderSettings;
use crate::core::state::App;
use crate::core::store::{HadithStore, LoadError};
use crate::core::types::{ChapterInfo, Hadith, Language};
use crate::platform::{
    DataSource, KeyValueStore, LoginItems, Pasteboard, PersistenceError, Platform, PlatformError,
    ReminderContent, ReminderScheduler, SpeechSynthesizer,
};

// ============================================================================
// Data
// ============================================================================

/// In-memory book files. Missing names fail with `DataSourceNotFound`.
#[derive(Default)]
pub struct MemorySource {
    files: Mutex<HashMap<String, String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    fetches: AtomicUsize,
}

impl MemorySource {
    pub fn new(files: &[(&str, String)]) -> Self {
        let source = Self::default();
        for (name, contents) in files {
            source.put(name, contents.clone());
        }
        source
    }

    pub fn put(&self, name: &str, contents: String) {
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), contents);
    }

    /// Hold fetches of `name` until the returned handle is notified.
    pub fn gate(&self, name: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(name.to_string(), notify.clone());
        notify
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch(&self, file_name: &str) -> Result<Vec<u8>, LoadError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().get(file_name).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.files
            .lock()
            .unwrap()
            .get(file_name)
            .map(|s| s.as_bytes().to_vec())
            .ok_or_else(|| LoadError::DataSourceNotFound(file_name.to_string()))
    }
}

/// Every read and write fails.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Err(PersistenceError::ReadFailure(format!("cannot read {key}")))
    }

    fn set(&self, key: &str, _value: String) -> Result<(), PersistenceError> {
        Err(PersistenceError::WriteFailure(format!("cannot write {key}")))
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// A minimal valid hadith with English text only.
pub fn hadith(n: u32) -> Hadith {
    Hadith {
        number: n,
        arabic_text: format!("نص عربي {n}"),
        translations: [(Language::English, format!("English text number {n}"))]
            .into_iter()
            .collect(),
        narrator: format!("Narrator {n}"),
        chapter_id: None,
        chapter: None,
        book: None,
    }
}

pub fn with_chapter(mut h: Hadith, id: u32, title: &str, arabic_title: &str) -> Hadith {
    h.chapter_id = Some(id);
    h.chapter = Some(ChapterInfo {
        title: title.to_string(),
        arabic_title: arabic_title.to_string(),
    });
    h
}

fn record(n: u32) -> serde_json::Value {
    json!({
        "number": n,
        "arabicText": format!("نص عربي {n}"),
        "englishTranslation": format!("English text number {n}"),
        "narrator": format!("Narrator {n}"),
    })
}

/// A book file holding `numbers`, in the given order.
pub fn sample_json(numbers: &[u32]) -> String {
    let records: Vec<_> = numbers.iter().map(|&n| record(n)).collect();
    serde_json::Value::Array(records).to_string()
}

/// Hadiths `1..=count`; chapter 1 up to `split`, chapter 2 after.
pub fn chaptered_json(count: u32, split: u32) -> String {
    let records: Vec<_> = (1..=count)
        .map(|n| {
            let chapter = if n <= split { 1 } else { 2 };
            let mut value = record(n);
            value["chapterId"] = json!(chapter);
            value["chapter"] = json!({
                "title": format!("Chapter {chapter} title"),
                "arabicTitle": format!("باب {chapter}"),
            });
            value
        })
        .collect();
    serde_json::Value::Array(records).to_string()
}

/// A builtin catalog book.
pub fn book(id: &str) -> Book {
    BookCatalog::builtin()
        .get(id)
        .cloned()
        .unwrap_or_else(|| panic!("no builtin book {id}"))
}

/// An App over in-memory files with the builtin catalog and wrapping navigation.
pub fn test_app<K: KeyValueStore + 'static>(files: &[(&str, String)], kv: Arc<K>) -> App {
    test_app_with_source(Arc::new(MemorySource::new(files)), kv)
}

pub fn test_app_with_source<K: KeyValueStore + 'static>(
    source: Arc<MemorySource>,
    kv: Arc<K>,
) -> App {
    App::new(
        BookCatalog::builtin(),
        HadithStore::new(source),
        kv,
        NavigationPolicy::Wrap,
    )
}

// ============================================================================
// Platform services
// ============================================================================

/// Records every platform call. `fail_next` makes the next fallible call fail.
#[derive(Default)]
pub struct RecordingServices {
    copied: Mutex<Vec<String>>,
    spoken: Mutex<Vec<(String, Language)>>,
    scheduled: Mutex<Vec<ReminderContent>>,
    login_items: Mutex<Vec<bool>>,
    fail: AtomicBool,
}

impl RecordingServices {
    pub fn platform(self: &Arc<Self>) -> Platform {
        Platform {
            pasteboard: self.clone(),
            speech: self.clone(),
            reminders: self.clone(),
            login_items: self.clone(),
        }
    }

    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().unwrap().clone()
    }

    pub fn spoken(&self) -> Vec<(String, Language)> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn scheduled(&self) -> Vec<ReminderContent> {
        self.scheduled.lock().unwrap().clone()
    }

    pub fn login_items(&self) -> Vec<bool> {
        self.login_items.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), PlatformError> {
        if self.fail.swap(false, Ordering::SeqCst) {
            Err(PlatformError("service unavailable".into()))
        } else {
            Ok(())
        }
    }
}

impl Pasteboard for RecordingServices {
    fn copy_text(&self, text: &str) -> Result<(), PlatformError> {
        self.check()?;
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

impl SpeechSynthesizer for RecordingServices {
    fn speak(&self, text: &str, language: Language) -> Result<(), PlatformError> {
        self.check()?;
        self.spoken.lock().unwrap().push((text.to_string(), language));
        Ok(())
    }

    fn stop(&self) {}
}

impl ReminderScheduler for RecordingServices {
    fn schedule_daily(
        &self,
        _settings: &ReminderSettings,
        content: &ReminderContent,
    ) -> Result<(), PlatformError> {
        self.check()?;
        self.scheduled.lock().unwrap().push(content.clone());
        Ok(())
    }

    fn cancel_all(&self) {
        self.scheduled.lock().unwrap().clear();
    }
}

impl LoginItems for RecordingServices {
    fn set_enabled(&self, enabled: bool) -> Result<(), PlatformError> {
        self.check()?;
        self.login_items.lock().unwrap().push(enabled);
        Ok(())
    }
}
