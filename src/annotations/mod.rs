//! Annotation objects attached to the primary anchor.
//!
//! ## Module Structure
//!
//! - [`components`] - `AnnotationObject` and its three-state machine
//! - [`registry`] - Live set of objects and per-frame updates
//! - [`loader`] - Spawns stored annotations under a newly installed anchor

mod components;
mod loader;
mod registry;


pub use components::{AnnotationObject, AnnotationState};
pub use loader::{annotation_layout, LoadAnnotationsTask};
pub use registry::AnnotationRegistry;

use bevy::prelude::*;

use crate::ViewerSet;

pub struct AnnotationsPlugin;

impl Plugin for AnnotationsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnnotationRegistry>()
            .add_systems(
                Update,
                (loader::start_loading_annotations, loader::poll_annotation_loads)
                    .chain()
                    .in_set(ViewerSet::Tasks),
            )
            .add_systems(
                Update,
                (registry::register_new_objects, registry::advance_active_objects)
                    .chain()
                    .in_set(ViewerSet::Frame),
            );
    }
}
