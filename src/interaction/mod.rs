//! Controller input: connection lifetime, hit-testing, and routing of
//! select/squeeze gestures.
//!
//! ## Module Structure
//!
//! - [`controllers`] - `Viewer`, `Controller`, hit-test target lifetime
//! - [`raycast`] - `HitVolume` and nearest-first ray intersection
//! - [`select`] - Toggle the pointed-at annotation or start a new one
//! - [`squeeze`] - Clear persistent anchors and request a new one
//! - [`messages`] - Input messages and the creation workflow hand-off
//!
//! Each controller is independent: messages carry their handedness and the
//! handlers resolve the controller entity from it.

mod controllers;
mod messages;
mod raycast;
mod select;
mod squeeze;


pub use controllers::{Controller, ControllerLink, ControllerMarker, HitTestTargetTask, Viewer};
pub use messages::{
    ControllerConnected, ControllerDisconnected, SelectGesture, SqueezeGesture,
    StartAnnotationCreation,
};
pub use raycast::{HitVolume, RayHit, cast_ray, ray_sphere_distance};
pub use select::{SelectOutcome, resolve_hits};

use bevy::prelude::*;

use crate::ViewerSet;

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ControllerConnected>()
            .add_message::<ControllerDisconnected>()
            .add_message::<SelectGesture>()
            .add_message::<SqueezeGesture>()
            .add_message::<StartAnnotationCreation>()
            .add_systems(
                Update,
                (
                    controllers::handle_controller_connected
                        .run_if(on_message::<ControllerConnected>),
                    controllers::handle_controller_disconnected
                        .run_if(on_message::<ControllerDisconnected>),
                    select::handle_select.run_if(on_message::<SelectGesture>),
                    squeeze::handle_squeeze.run_if(on_message::<SqueezeGesture>),
                )
                    .chain()
                    .in_set(ViewerSet::Input),
            )
            .add_systems(
                Update,
                controllers::poll_hit_test_targets.in_set(ViewerSet::Tasks),
            );
    }
}
