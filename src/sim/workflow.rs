//! Minimal annotation authoring for the desktop: a select that misses every
//! note drops a new one along the controller ray.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;

use crate::annotations::{AnnotationObject, AnnotationState};
use crate::collaborators::{TextRecord, TextStore};
use crate::config::ViewerSettings;
use crate::interaction::{HitVolume, StartAnnotationCreation};

/// How far along the controller ray a new note is placed
const NOTE_DISTANCE: f32 = 1.0;

/// Local notes file new annotations are written to, if the text store is local
#[derive(Resource, Debug, Clone, Default)]
pub struct NotesFile(pub Option<PathBuf>);

/// Append `record` to the JSON array in `path`, creating the file if needed
pub fn append_note(path: &Path, record: TextRecord) -> Result<(), String> {
    let mut records: Vec<TextRecord> = if path.exists() {
        let json =
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read notes: {}", e))?;
        serde_json::from_str(&json).map_err(|e| format!("Notes file is corrupted: {}", e))?
    } else {
        Vec::new()
    };
    records.push(record);

    let json = serde_json::to_string_pretty(&records)
        .map_err(|e| format!("Failed to serialize notes: {}", e))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write notes: {}", e))
}

/// Place a finished note where the controller points, in the anchor's space
pub fn create_annotation(
    mut commands: Commands,
    mut requests: MessageReader<StartAnnotationCreation>,
    transforms: Query<&GlobalTransform>,
    settings: Res<ViewerSettings>,
    notes: Res<NotesFile>,
    text_store: Res<TextStore>,
) {
    for request in requests.read() {
        let (Ok(controller), Ok(anchor)) = (
            transforms.get(request.controller),
            transforms.get(request.anchor),
        ) else {
            warn!("Annotation target vanished before authoring started");
            continue;
        };

        let point = controller.translation() + controller.forward() * NOTE_DISTANCE;
        let local = anchor.affine().inverse().transform_point3(point);
        let username = format!("note-{}", chrono::Local::now().format("%H%M%S%3f"));

        commands.spawn((
            Name::new(format!("Annotation {}", username)),
            AnnotationObject::new(username.clone(), AnnotationState::Complete),
            HitVolume::sphere(settings.annotation_hit_radius),
            Transform::from_translation(local),
            ChildOf(request.anchor),
        ));
        info!(
            "New annotation {} on anchor {} ({} controller)",
            username,
            request.anchor_id,
            request.hand.label()
        );

        let Some(path) = notes.0.clone() else {
            continue;
        };
        let record = TextRecord {
            username,
            text: format!(
                "Recorded {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M")
            ),
            position: Some(local.to_array()),
        };
        let client = text_store.0.clone();
        IoTaskPool::get()
            .spawn(async move {
                match append_note(&path, record) {
                    Ok(()) => client.invalidate(),
                    Err(e) => error!("{}", e),
                }
            })
            .detach();
    }
}
