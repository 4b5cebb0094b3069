//! Desktop visuals: gizmo spheres and rays, and an egui status panel.

mod gizmos;
mod status_panel;

pub use gizmos::{ViewerGizmoGroup, state_color};

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::ViewerSet;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_gizmo_group::<ViewerGizmoGroup>()
            .add_systems(
                Update,
                (
                    gizmos::draw_anchor_markers,
                    gizmos::draw_annotations,
                    gizmos::draw_controller_rays,
                )
                    .after(ViewerSet::Audio),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    status_panel::status_panel_ui,
                    status_panel::config_reset_notification_ui,
                )
                    .chain(),
            );
    }
}
