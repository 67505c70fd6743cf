// src/ui/systems.rs
use bevy::prelude::*;
use std::time::Duration;

use crate::api::PlatformStore;
use crate::forms::{process_form_submission, FormSession};
use crate::settings::{io::save_settings, ConsoleSettings};
use crate::ui::{ApiHandle, FeedbackEvent, ServerStatus, UiFeedbackState};

const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Resource)]
pub struct PingTimer(pub Timer);

impl Default for PingTimer {
    fn default() -> Self {
        let mut timer = Timer::new(PING_INTERVAL, TimerMode::Repeating);
        // Ping on the first frame
        timer.tick(PING_INTERVAL);
        Self(timer)
    }
}

pub fn ping_server(
    time: Res<Time>,
    mut timer: ResMut<PingTimer>,
    api: Res<ApiHandle>,
    mut status: ResMut<ServerStatus>,
) {
    timer.0.tick(time.delta());
    if !timer.0.just_finished() {
        return;
    }
    let online = api.backend().ping();
    if online != status.online {
        if online {
            info!("API server is back online.");
        } else {
            warn!("API server is offline.");
        }
        status.online = online;
    }
}

/// Runs the submission decoder once per frame and dispatches what it finds.
/// Markers and the entity's widget state are cleared afterwards so the next
/// frame re-seeds from fresh data.
pub fn process_form_submissions(
    mut session: ResMut<FormSession>,
    mut store: ResMut<PlatformStore>,
    api: Res<ApiHandle>,
    mut feedback: EventWriter<FeedbackEvent>,
) {
    let Some(submission) = process_form_submission(&session) else {
        return;
    };
    match store.handle_submission(api.backend(), &submission) {
        Ok(Some(message)) => {
            feedback.write(FeedbackEvent::ok(message));
        }
        Ok(None) => {}
        Err(e) => {
            feedback.write(FeedbackEvent::error(format!(
                "Could not {} platform '{}': {}",
                submission.event.action, submission.event.entity_id, e
            )));
        }
    }
    session.clear_submissions();
    let cleared = session.clear_entity(&submission.event.entity_id);
    debug!(
        "Cleared {} widget keys for '{}'",
        cleared, submission.event.entity_id
    );
}

pub fn handle_ui_feedback(
    mut feedback_events: EventReader<FeedbackEvent>,
    mut ui_feedback_state: ResMut<UiFeedbackState>,
) {
    let mut last_message = None;
    for event in feedback_events.read() {
        last_message = Some((event.message.clone(), event.is_error));
        // Keep the first error visible over later successes
        if event.is_error {
            break;
        }
    }
    if let Some((msg, is_error)) = last_message {
        ui_feedback_state.last_message = msg;
        ui_feedback_state.is_error = is_error;
        if is_error {
            warn!("UI Feedback (Error): {}", ui_feedback_state.last_message);
        } else {
            info!("UI Feedback: {}", ui_feedback_state.last_message);
        }
    }
}

pub fn persist_console_settings(settings: Res<ConsoleSettings>) {
    if !settings.is_changed() || settings.is_added() {
        return;
    }
    if let Err(e) = save_settings(&settings) {
        error!("Failed to save console settings: {}", e);
    }
}
