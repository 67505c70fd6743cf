// src/ui/pages/mod.rs

pub mod platforms_page;
pub mod tips_page;

use crate::api::{ApiBackend, ApiError, BatchReport};
use crate::ui::{ConsoleState, FeedbackEvent};

/// What every page needs from the console system.
pub struct PageContext<'a> {
    pub api: &'a dyn ApiBackend,
    pub debug: bool,
    pub state: &'a mut ConsoleState,
    pub feedback: &'a mut Vec<FeedbackEvent>,
}

impl PageContext<'_> {
    pub fn report(&mut self, report: &BatchReport) {
        if report.is_empty() {
            return;
        }
        self.feedback.push(FeedbackEvent {
            message: report.summary(),
            is_error: !report.is_clean(),
        });
    }

    pub fn outcome(&mut self, result: Result<(), ApiError>, success: &str) {
        match result {
            Ok(()) => self.feedback.push(FeedbackEvent::ok(success)),
            Err(e) => self.feedback.push(FeedbackEvent::error(e.to_string())),
        }
    }
}
