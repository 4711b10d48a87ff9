//! # Runtime Driver
//!
//! The host loop around the core. Owns the `App`, runs `update()` on the
//! observation thread, and turns each returned `Effect` into platform calls
//! or background work.
//!
//! ```text
//!  dispatch(action) ──▶ update(app) ──▶ Effect
//!                                        │
//!        ┌───────────────────────────────┼─────────────────────────┐
//!        ▼                               ▼                         ▼
//!  SpawnLoad: tokio task        Copy / Speak / Reminder     None
//!  fetch_and_parse ──tx──▶ rx   → Platform ports
//!        │
//!        └── pump()/settle() drain rx back into dispatch()
//! ```
//!
//! Only one load task is kept alive: starting a new one aborts the previous
//! task, and the store's generation check discards anything that still
//! slips through.

use log::{debug, info, warn};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::AbortHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::state::App;
use crate::core::store::{LoadTicket, fetch_and_parse};
use crate::platform::{DataSource, Platform, PlatformError, ReminderContent};

use std::sync::Arc;

pub struct Driver {
    pub app: App,
    platform: Platform,
    tx: UnboundedSender<Action>,
    rx: UnboundedReceiver<Action>,
    active_load: Option<AbortHandle>,
}

impl Driver {
    pub fn new(app: App, platform: Platform) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            app,
            platform,
            tx,
            rx,
            active_load: None,
        }
    }

    /// Apply `action` and carry out its effect.
    pub fn dispatch(&mut self, action: Action) {
        let effect = update(&mut self.app, action);
        self.handle_effect(effect);
    }

    /// Apply every background result that has already arrived. Never blocks.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(action) = self.rx.try_recv() {
            debug!("Driver received: {:?}", action);
            handled += 1;
            self.dispatch(action);
        }
        handled
    }

    /// Wait until no load is in flight, applying results as they arrive.
    pub async fn settle(&mut self) {
        while self.app.store.is_loading() {
            match self.rx.recv().await {
                Some(action) => self.dispatch(action),
                None => break,
            }
        }
        self.pump();
    }

    fn handle_effect(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::SpawnLoad(ticket) => {
                if let Some(previous) = self.active_load.take() {
                    previous.abort();
                }
                self.active_load = Some(spawn_load(
                    self.app.store.source(),
                    ticket,
                    self.tx.clone(),
                ));
            }
            Effect::Copy(text) => {
                let result = self.platform.pasteboard.copy_text(&text);
                self.report("Copied to clipboard", result);
            }
            Effect::Speak { text, language } => {
                let result = self.platform.speech.speak(&text, language);
                self.report("Speaking", result);
            }
            Effect::StopSpeech => self.platform.speech.stop(),
            Effect::ScheduleReminder(settings) => {
                let content = self.app.reminder_content().unwrap_or_else(|| ReminderContent {
                    title: "Daily Hadith".to_string(),
                    body: "Open the reader for today's hadith.".to_string(),
                });
                let result = self.platform.reminders.schedule_daily(&settings, &content);
                self.report(
                    &format!("Reminder set for {:02}:{:02}", settings.hour, settings.minute),
                    result,
                );
            }
            Effect::CancelReminder => {
                self.platform.reminders.cancel_all();
                self.app.status_message = "Reminder off".to_string();
            }
            Effect::RegisterLoginItem(enabled) => {
                let result = self.platform.login_items.set_enabled(enabled);
                self.report(
                    if enabled {
                        "Will open at login"
                    } else {
                        "Will not open at login"
                    },
                    result,
                );
            }
        }
    }

    fn report(&mut self, success: &str, result: Result<(), PlatformError>) {
        match result {
            Ok(()) => self.app.status_message = success.to_string(),
            Err(e) => {
                warn!("{}", e);
                self.app.error = Some(e.to_string());
            }
        }
    }
}

fn spawn_load(
    source: Arc<dyn DataSource>,
    ticket: LoadTicket,
    tx: UnboundedSender<Action>,
) -> AbortHandle {
    info!(
        "Spawning load of '{}' (generation {})",
        ticket.book_id, ticket.generation
    );
    let handle = tokio::spawn(async move {
        let outcome = fetch_and_parse(source, ticket).await;
        if tx.send(Action::BookLoaded(outcome)).is_err() {
            warn!("Failed to deliver load result: receiver dropped");
        }
    });
    handle.abort_handle()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::ExportStyle;
    use crate::core::store::LoadState;
    use crate::platform::MemoryStore;
    use crate::test_support::{MemorySource, RecordingServices, sample_json, test_app_with_source};

    fn driver_with(source: Arc<MemorySource>) -> (Driver, Arc<RecordingServices>) {
        let services = Arc::new(RecordingServices::default());
        let app = test_app_with_source(source, Arc::new(MemoryStore::new()));
        (Driver::new(app, services.platform()), services)
    }

    #[tokio::test]
    async fn test_start_and_settle_loads_book() {
        let source = Arc::new(MemorySource::new(&[("bukhari.json", sample_json(&[1, 2, 3]))]));
        let (mut driver, _) = driver_with(source);

        driver.dispatch(Action::Start);
        assert!(driver.app.store.is_loading());
        driver.settle().await;

        assert!(matches!(driver.app.store.state(), LoadState::Ready { count: 3, .. }));
        assert_eq!(driver.app.current().unwrap().number, 1);
    }

    #[tokio::test]
    async fn test_newer_load_supersedes_blocked_one() {
        let source = Arc::new(MemorySource::new(&[
            ("bukhari.json", sample_json(&[1, 2, 3])),
            ("muslim.json", sample_json(&[7, 8])),
        ]));
        let gate = source.gate("bukhari.json");
        let (mut driver, _) = driver_with(source);

        driver.dispatch(Action::Start);
        driver.dispatch(Action::SelectBook("muslim".into()));
        driver.settle().await;
        gate.notify_one();
        tokio::task::yield_now().await;
        driver.pump();

        assert_eq!(driver.app.store.active_book(), Some("muslim"));
        assert_eq!(driver.app.filtered().len(), 2);
    }

    #[tokio::test]
    async fn test_effects_reach_platform_ports() {
        let source = Arc::new(MemorySource::new(&[("bukhari.json", sample_json(&[1, 2]))]));
        let (mut driver, services) = driver_with(source);
        driver.dispatch(Action::Start);
        driver.settle().await;

        driver.dispatch(Action::CopyCurrent(ExportStyle::Plain));
        driver.dispatch(Action::SpeakCurrent);
        driver.dispatch(Action::SetReminder {
            enabled: true,
            hour: 7,
            minute: 15,
        });
        driver.dispatch(Action::SetLaunchAtLogin(true));

        assert!(services.copied()[0].starts_with("Hadith 1\n"));
        assert_eq!(services.spoken().len(), 1);
        let scheduled = services.scheduled();
        assert_eq!(scheduled.len(), 1);
        assert!(scheduled[0].title.starts_with("Sahih al-Bukhari"));
        assert_eq!(services.login_items(), vec![true]);
        assert_eq!(driver.app.status_message, "Will open at login");
    }

    #[tokio::test]
    async fn test_platform_failure_is_reported_not_fatal() {
        let source = Arc::new(MemorySource::new(&[("bukhari.json", sample_json(&[1]))]));
        let (mut driver, services) = driver_with(source);
        services.fail_next();
        driver.dispatch(Action::SetLaunchAtLogin(true));
        assert!(driver.app.error.is_some());
        // The preference itself still changed.
        assert!(driver.app.settings.launch_at_login);
    }
}
