//! Live set of annotation objects and the per-frame systems that walk it.

use bevy::prelude::*;

use crate::collaborators::AudioBackend;

use super::components::{AnnotationObject, AnnotationState};

/// Every annotation object the viewer tracks, in registration order.
#[derive(Resource, Default, Debug)]
pub struct AnnotationRegistry {
    live: Vec<Entity>,
}

impl AnnotationRegistry {
    /// Add an object to the live set. Returns false if it was already tracked.
    pub fn register(&mut self, entity: Entity) -> bool {
        if self.contains(entity) {
            return false;
        }
        self.live.push(entity);
        true
    }

    pub fn unregister(&mut self, entity: Entity) -> bool {
        let before = self.live.len();
        self.live.retain(|&e| e != entity);
        self.live.len() != before
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.live.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.live.iter().copied()
    }

    /// Visit every object tracked when the walk starts.
    ///
    /// The callback may register or unregister objects. Objects added during
    /// the walk are first visited on the next call; objects removed before
    /// their turn are skipped. Nothing is visited twice.
    pub fn for_each_active(&mut self, mut update: impl FnMut(&mut Self, Entity)) {
        let snapshot = self.live.clone();
        for entity in snapshot {
            if self.contains(entity) {
                update(self, entity);
            }
        }
    }
}

/// Track annotation objects as soon as they appear, whoever spawned them
pub fn register_new_objects(
    added: Query<Entity, Added<AnnotationObject>>,
    mut registry: ResMut<AnnotationRegistry>,
) {
    for entity in added.iter() {
        if registry.register(entity) {
            debug!("Registered annotation object {:?}", entity);
        }
    }
}

/// Per-frame update of every tracked object: keep the audio of playing
/// objects bound to their world position and forget despawned ones.
pub fn advance_active_objects(
    mut registry: ResMut<AnnotationRegistry>,
    objects: Query<(&AnnotationObject, &GlobalTransform)>,
    audio: Res<AudioBackend>,
) {
    registry.for_each_active(|registry, entity| match objects.get(entity) {
        Ok((object, transform)) => {
            if object.state() == AnnotationState::Playing {
                audio.0.set_position(&object.username, transform.translation());
            }
        }
        Err(_) => {
            registry.unregister(entity);
        }
    });
}
