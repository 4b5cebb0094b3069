//! Viewer for voice and text annotations pinned to persistent spatial anchors.
//!
//! The core is host-agnostic: the host supplies a [`collaborators::Tracker`],
//! an [`collaborators::AudioBackend`] and a [`collaborators::TextStore`], spawns
//! a [`interaction::Viewer`] and its [`interaction::Controller`]s, and writes
//! the input messages. [`AnnotationViewerPlugin`] does the rest.

pub mod anchors;
pub mod annotations;
pub mod collaborators;
pub mod config;
pub mod constants;
pub mod error;
pub mod interaction;
pub mod paths;
pub mod playback;
pub mod render;
pub mod restoration;
pub mod sim;

#[cfg(test)]
mod test_support;

use bevy::prelude::*;

/// Frame phases, run in order every `Update`
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewerSet {
    /// Gesture and host message handlers
    Input,
    /// Background task polling and the pending-anchor flush
    Tasks,
    /// Registry maintenance and per-object updates
    Frame,
    /// Audio engine tick, after object positions are pushed
    Audio,
}

/// Everything needed to run the viewer on top of host-provided collaborators
pub struct AnnotationViewerPlugin;

impl Plugin for AnnotationViewerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<config::ViewerSettings>()
            .configure_sets(
                Update,
                (
                    ViewerSet::Input,
                    ViewerSet::Tasks,
                    ViewerSet::Frame,
                    ViewerSet::Audio,
                )
                    .chain(),
            )
            .add_plugins((
                anchors::AnchorsPlugin,
                annotations::AnnotationsPlugin,
                interaction::InteractionPlugin,
                playback::PlaybackPlugin,
                restoration::RestorationPlugin,
            ));
    }
}
