//! The single entry point for changing the primary anchor.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::collaborators::{AnchorId, AnchorPose, AnchorRecord};
use crate::config::ViewerSettings;
use crate::interaction::HitVolume;

use super::components::{Anchor, AnchorMarker};
use super::messages::AnchorInstalled;
use super::state::{AnchorLifecycle, PrimaryAnchor};

#[derive(SystemParam)]
pub struct AnchorManager<'w, 's> {
    commands: Commands<'w, 's>,
    lifecycle: ResMut<'w, AnchorLifecycle>,
    settings: Res<'w, ViewerSettings>,
    installed: MessageWriter<'w, AnchorInstalled>,
}

impl AnchorManager<'_, '_> {
    pub fn primary(&self) -> Option<&PrimaryAnchor> {
        self.lifecycle.primary()
    }

    /// Remove the primary anchor from the scene along with its marker and
    /// annotation objects. Returns its id if there was one.
    pub fn clear_primary(&mut self) -> Option<AnchorId> {
        let previous = self.lifecycle.take_primary()?;
        self.commands.entity(previous.marker).try_despawn();
        self.commands.entity(previous.entity).try_despawn();
        Some(previous.id)
    }

    pub fn request_creation(&mut self, pose: AnchorPose) -> bool {
        self.lifecycle.request_creation(pose)
    }

    /// Install `record` as the primary anchor and return its entity.
    ///
    /// The previous primary loses its marker and is detached from the scene
    /// together with its annotation objects. The new anchor gets a green
    /// marker when freshly created and a red one when `recovered`, and its
    /// annotations are requested from the text store.
    pub fn set_primary(&mut self, record: AnchorRecord, recovered: bool) -> Entity {
        if let Some(previous) = self.clear_primary() {
            debug!("Detached previous primary anchor {}", previous);
        }

        let entity = self
            .commands
            .spawn((
                Name::new(format!("Anchor {}", record.id)),
                Anchor {
                    id: record.id.clone(),
                    persistent: record.persistent,
                    recovered,
                },
                record.pose.to_transform(),
            ))
            .id();

        let marker = self
            .commands
            .spawn((
                Name::new("Anchor marker"),
                AnchorMarker::for_anchor(recovered),
                HitVolume::sphere(self.settings.marker_radius),
                Transform::default(),
                ChildOf(entity),
            ))
            .id();

        self.lifecycle.replace_primary(PrimaryAnchor {
            entity,
            marker,
            id: record.id.clone(),
            recovered,
        });

        info!(
            "Primary anchor is now {} ({})",
            record.id,
            if recovered { "recovered" } else { "new" }
        );

        self.installed.write(AnchorInstalled {
            anchor: entity,
            id: record.id,
            recovered,
        });

        entity
    }
}
