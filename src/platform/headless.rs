//! Host services for environments without a desktop: every call is logged
//! and reported as successful.

use log::info;

use super::{
    LoginItems, Pasteboard, PlatformError, ReminderContent, ReminderScheduler, SpeechSynthesizer,
};
use crate::core::settings::ReminderSettings;
use crate::core::types::Language;

pub struct HeadlessServices;

impl Pasteboard for HeadlessServices {
    fn copy_text(&self, text: &str) -> Result<(), PlatformError> {
        info!("Pasteboard (headless): {} bytes", text.len());
        Ok(())
    }
}

impl SpeechSynthesizer for HeadlessServices {
    fn speak(&self, text: &str, language: Language) -> Result<(), PlatformError> {
        info!("Speech (headless): {} chars in {}", text.chars().count(), language);
        Ok(())
    }

    fn stop(&self) {
        info!("Speech (headless): stop");
    }
}

impl ReminderScheduler for HeadlessServices {
    fn schedule_daily(
        &self,
        settings: &ReminderSettings,
        content: &ReminderContent,
    ) -> Result<(), PlatformError> {
        info!(
            "Reminder (headless): daily at {:02}:{:02} - {}",
            settings.hour, settings.minute, content.title
        );
        Ok(())
    }

    fn cancel_all(&self) {
        info!("Reminder (headless): cancelled");
    }
}

impl LoginItems for HeadlessServices {
    fn set_enabled(&self, enabled: bool) -> Result<(), PlatformError> {
        info!("Login item (headless): enabled={}", enabled);
        Ok(())
    }
}
