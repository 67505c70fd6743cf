// src/ui/console.rs
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::api::{PlatformStore, TipsStore};
use crate::forms::FormSession;
use crate::settings::{AdminConfig, ConsolePage, ConsoleSettings};
use crate::ui::pages::{platforms_page, tips_page, PageContext};
use crate::ui::{ApiHandle, ConsoleState, FeedbackEvent, ServerStatus, UiFeedbackState};

#[allow(clippy::too_many_arguments)]
pub fn admin_console_ui(
    mut contexts: EguiContexts,
    config: Res<AdminConfig>,
    api: Res<ApiHandle>,
    status: Res<ServerStatus>,
    ui_feedback: Res<UiFeedbackState>,
    mut settings: ResMut<ConsoleSettings>,
    mut state: ResMut<ConsoleState>,
    mut session: ResMut<FormSession>,
    mut platforms: ResMut<PlatformStore>,
    mut tips: ResMut<TipsStore>,
    mut feedback_writer: EventWriter<FeedbackEvent>,
) {
    let ctx = contexts.ctx_mut();

    egui::TopBottomPanel::top("console_top_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Hunch Club Admin");
            ui.separator();
            let mut page = settings.last_page;
            for candidate in ConsolePage::ALL {
                ui.selectable_value(&mut page, candidate, candidate.title());
            }
            if page != settings.last_page {
                settings.last_page = page;
            }
            if config.debug {
                ui.separator();
                ui.colored_label(egui::Color32::YELLOW, "DEBUG");
            }
        });
        if !status.online {
            ui.colored_label(
                egui::Color32::RED,
                format!("API server at {} is offline.", config.server_address),
            );
        }
    });

    egui::TopBottomPanel::bottom("console_feedback_panel").show(ctx, |ui| {
        let color = if ui_feedback.is_error {
            egui::Color32::LIGHT_RED
        } else {
            ui.visuals().text_color()
        };
        ui.colored_label(color, ui_feedback.last_message.as_str());
    });

    let mut messages: Vec<FeedbackEvent> = Vec::new();
    egui::CentralPanel::default().show(ctx, |ui| {
        if !status.online {
            return;
        }
        let mut page_ctx = PageContext {
            api: api.backend(),
            debug: config.debug,
            state: &mut state,
            feedback: &mut messages,
        };
        let page = settings.last_page;
        let last_platform = settings.last_platform.clone();
        let selected = egui::ScrollArea::vertical()
            .id_salt("console_page_scroll")
            .show(ui, |ui| match page {
                ConsolePage::Platforms => platforms_page::show(
                    ui,
                    &mut page_ctx,
                    &mut platforms,
                    &mut session,
                    last_platform.as_deref(),
                ),
                ConsolePage::Tips => {
                    tips_page::show(ui, &mut page_ctx, &mut tips);
                    None
                }
            })
            .inner;
        if selected.is_some() {
            settings.last_platform = selected;
        }
    });

    for message in messages {
        feedback_writer.write(message);
    }
}
