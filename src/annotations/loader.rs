//! Populate a newly installed primary anchor with the stored annotations.

use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task};
use futures_lite::future;

use crate::anchors::{AnchorInstalled, AnchorLifecycle};
use crate::collaborators::{TextRecord, TextStore};
use crate::config::ViewerSettings;
use crate::error::TextStoreError;
use crate::interaction::HitVolume;

use super::components::{AnnotationObject, AnnotationState};

/// Background fetch of the records to place under `anchor`
#[derive(Component)]
pub struct LoadAnnotationsTask {
    pub anchor: Entity,
    pub task: Task<Result<Arc<Vec<TextRecord>>, TextStoreError>>,
}

/// Position of the `index`-th of `count` objects in a row centered over the anchor
pub fn annotation_layout(index: usize, count: usize, spacing: f32, height: f32) -> Vec3 {
    let center = (count.saturating_sub(1)) as f32 / 2.0;
    Vec3::new((index as f32 - center) * spacing, height, 0.0)
}

/// Starts fetching annotation records whenever an anchor becomes primary
pub fn start_loading_annotations(
    mut commands: Commands,
    mut installed: MessageReader<AnchorInstalled>,
    text_store: Res<TextStore>,
) {
    for event in installed.read() {
        let client = text_store.0.clone();
        let task = IoTaskPool::get().spawn(async move { client.all_text() });

        commands.spawn(LoadAnnotationsTask {
            anchor: event.anchor,
            task,
        });
    }
}

/// Polls record fetches and spawns the annotation objects beneath their anchor
pub fn poll_annotation_loads(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut LoadAnnotationsTask)>,
    lifecycle: Res<AnchorLifecycle>,
    settings: Res<ViewerSettings>,
) {
    for (entity, mut load) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut load.task)) else {
            continue;
        };
        commands.entity(entity).despawn();

        let anchor = load.anchor;
        if lifecycle.primary_entity() != Some(anchor) {
            debug!("Anchor {:?} replaced before its annotations loaded", anchor);
            continue;
        }

        match result {
            Ok(records) => {
                let count = records.len();
                for (index, record) in records.iter().enumerate() {
                    let position = record.position.map(Vec3::from).unwrap_or_else(|| {
                        annotation_layout(
                            index,
                            count,
                            settings.annotation_spacing,
                            settings.annotation_height,
                        )
                    });

                    commands.spawn((
                        Name::new(format!("Annotation {}", record.username)),
                        AnnotationObject::new(record.username.clone(), AnnotationState::Complete),
                        HitVolume::sphere(settings.annotation_hit_radius),
                        Transform::from_translation(position),
                        ChildOf(anchor),
                    ));
                }
                info!("Placed {} annotations on anchor {:?}", count, anchor);
            }
            Err(e) => {
                warn!("Could not load annotations for anchor {:?}: {}", anchor, e);
            }
        }
    }
}
