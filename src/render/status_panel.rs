use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::anchors::AnchorLifecycle;
use crate::annotations::AnnotationRegistry;
use crate::config::ConfigResetNotification;
use crate::playback::PlaybackDisplay;
use crate::restoration::RestorationStatus;

fn restoration_label(status: &RestorationStatus) -> String {
    match status {
        RestorationStatus::NotStarted => "waiting for session".to_string(),
        RestorationStatus::Settling(left) => format!("settling ({:.1}s)", left.max(0.0)),
        RestorationStatus::InFlight => "restoring...".to_string(),
        RestorationStatus::Restored(count) => format!("restored {}", count),
        RestorationStatus::Failed(reason) => format!("failed: {}", reason),
    }
}

/// Side panel with the primary anchor, restoration progress and the text of
/// whatever is playing
pub fn status_panel_ui(
    mut contexts: EguiContexts,
    lifecycle: Res<AnchorLifecycle>,
    restoration: Res<RestorationStatus>,
    registry: Res<AnnotationRegistry>,
    display: Res<PlaybackDisplay>,
) -> Result {
    egui::SidePanel::left("status_panel")
        .resizable(false)
        .default_width(240.0)
        .show(contexts.ctx_mut()?, |ui| {
            ui.heading("Anchors");
            match lifecycle.primary() {
                Some(primary) => {
                    ui.label(format!("Primary: {}", primary.id));
                    ui.label(if primary.recovered {
                        "Recovered from a previous session"
                    } else {
                        "Created this session"
                    });
                }
                None => {
                    ui.label("No primary anchor");
                }
            }
            if lifecycle.pending().is_some() {
                ui.label("New anchor requested");
            }
            ui.label(format!("Restoration: {}", restoration_label(&restoration)));

            ui.separator();
            ui.heading("Annotations");
            ui.label(format!("{} placed", registry.len()));

            ui.separator();
            ui.heading("Now playing");
            match &display.now_playing {
                Some(now) => {
                    ui.strong(&now.username);
                    match &now.text {
                        Some(text) => ui.label(text),
                        None => ui.weak("(no text available)"),
                    };
                }
                None => {
                    ui.weak("Nothing");
                }
            }

            ui.separator();
            ui.small("Space/F select, G squeeze, Del clear, C controller, R restart");
        });

    Ok(())
}

pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    egui::Window::new("Configuration Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Settings could not be loaded and were reset to defaults.");
            if let Some(reason) = &notification.reason {
                ui.colored_label(egui::Color32::YELLOW, reason);
            }
            if ui.button("OK").clicked() {
                notification.show = false;
            }
        });

    Ok(())
}
