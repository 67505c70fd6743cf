// src/ui/mod.rs
use bevy::prelude::*;
use bevy_egui::EguiContextPass;

pub mod console;
pub mod form_widgets;
pub mod pages;
pub mod systems;
pub mod table_widgets;

use crate::api::{ApiBackend, RowChanges};
use console::admin_console_ui;
use systems::{handle_ui_feedback, persist_console_settings, ping_server, process_form_submissions, PingTimer};

#[derive(Resource, Default, Debug, Clone)]
pub struct UiFeedbackState {
    pub last_message: String,
    pub is_error: bool,
}

#[derive(Event, Debug, Clone)]
pub struct FeedbackEvent {
    pub message: String,
    pub is_error: bool,
}

impl FeedbackEvent {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// The REST boundary as a resource, so tests can swap in a scripted backend.
#[derive(Resource)]
pub struct ApiHandle(pub Box<dyn ApiBackend>);

impl ApiHandle {
    pub fn backend(&self) -> &dyn ApiBackend {
        self.0.as_ref()
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerStatus {
    pub online: bool,
}

impl Default for ServerStatus {
    fn default() -> Self {
        Self { online: true }
    }
}

/// Pending edits of the batch tables.
#[derive(Resource, Default, Debug, Clone)]
pub struct ConsoleState {
    pub summary_changes: RowChanges,
    pub tip_changes: RowChanges,
}

/// Plugin for the admin console UI. Expects `AdminConfig`, `ApiHandle`,
/// `PlatformStore`, `TipsStore` and `ConsoleSettings` to be inserted.
pub struct ConsoleUiPlugin;

impl Plugin for ConsoleUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiFeedbackState>()
            .init_resource::<ConsoleState>()
            .init_resource::<ServerStatus>()
            .init_resource::<PingTimer>()
            .init_resource::<crate::forms::FormSession>()
            .add_event::<FeedbackEvent>()
            .add_systems(
                Update,
                (
                    ping_server,
                    process_form_submissions,
                    handle_ui_feedback,
                    persist_console_settings,
                )
                    .chain(),
            )
            .add_systems(EguiContextPass, admin_console_ui);

        info!("ConsoleUiPlugin initialized.");
    }
}
