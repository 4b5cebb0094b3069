//! Desktop stand-ins for the XR host.
//!
//! ## Module Structure
//!
//! - [`tracker`] - `FileAnchorTracker`, anchors persisted to a JSON file
//! - [`audio`] - `LoggingAudio`, a log-only audio engine
//! - [`input`] - Camera/controller rig and keyboard gestures
//! - [`workflow`] - Places a note where a missed select points

mod audio;
mod input;
mod tracker;
mod workflow;

pub use audio::LoggingAudio;
pub use input::LookAngles;
pub use tracker::FileAnchorTracker;
pub use workflow::{NotesFile, append_note};

use std::path::PathBuf;

use bevy::prelude::*;

use crate::ViewerSet;
use crate::interaction::StartAnnotationCreation;

pub struct SimPlugin {
    /// Where authored notes are written; `None` when the text store is remote
    pub notes_file: Option<PathBuf>,
}

impl Plugin for SimPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(NotesFile(self.notes_file.clone()))
            .add_systems(Startup, (input::spawn_rig, input::start_session).chain())
            .add_systems(
                Update,
                (input::keyboard_gestures, input::move_viewer).before(ViewerSet::Input),
            )
            .add_systems(
                Update,
                workflow::create_annotation
                    .run_if(on_message::<StartAnnotationCreation>)
                    .after(ViewerSet::Input)
                    .before(ViewerSet::Frame),
            );
    }
}
