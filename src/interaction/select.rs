//! Select gesture: toggle the annotation the controller points at, or start
//! authoring a new one.

use bevy::prelude::*;

use crate::anchors::AnchorLifecycle;
use crate::annotations::AnnotationObject;
use crate::playback::PlaybackTransition;

use super::controllers::{Controller, ControllerLink};
use super::messages::{SelectGesture, StartAnnotationCreation};
use super::raycast::{HitVolume, cast_ray};

/// What a select gesture resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    /// An annotation object changed state
    Toggled(PlaybackTransition),
    /// An annotation object was hit but does not react in its current state
    Consumed(Entity),
    /// Nothing annotated was hit; the creation workflow takes over
    CreationStarted,
}

#[allow(clippy::too_many_arguments)]
pub fn handle_select(
    mut gestures: MessageReader<SelectGesture>,
    lifecycle: Res<AnchorLifecycle>,
    controllers: Query<(Entity, &Controller, &GlobalTransform, &ControllerLink)>,
    children: Query<&Children>,
    volumes: Query<(&GlobalTransform, &HitVolume)>,
    mut objects: Query<&mut AnnotationObject>,
    mut transitions: MessageWriter<PlaybackTransition>,
    mut creation: MessageWriter<StartAnnotationCreation>,
) {
    for gesture in gestures.read() {
        let Some(primary) = lifecycle.primary() else {
            debug!("Select ignored: no primary anchor");
            continue;
        };

        let Some((controller_entity, _, controller_transform, link)) = controllers
            .iter()
            .find(|(_, controller, _, _)| controller.hand == gesture.hand)
        else {
            warn!("Select from unknown {} controller", gesture.hand.label());
            continue;
        };

        let candidates = children
            .iter_descendants(primary.entity)
            .filter_map(|entity| {
                volumes
                    .get(entity)
                    .ok()
                    .map(|(transform, volume)| (entity, *transform, *volume))
            });
        let hits = cast_ray(
            controller_transform.translation(),
            controller_transform.forward(),
            candidates,
        );

        let outcome = resolve_hits(hits.iter().map(|hit| hit.entity), &mut objects);
        match outcome {
            SelectOutcome::Toggled(transition) => {
                info!(
                    "{} annotation {} -> {}",
                    transition.username,
                    transition.previous.label(),
                    transition.current.label()
                );
                transitions.write(transition);
            }
            SelectOutcome::Consumed(entity) => {
                debug!("Hit annotation {:?} is not ready for playback", entity);
            }
            SelectOutcome::CreationStarted => {
                debug!("No annotation hit, starting annotation creation");
                creation.write(StartAnnotationCreation {
                    anchor: primary.entity,
                    anchor_id: primary.id.clone(),
                    hand: gesture.hand,
                    controller: controller_entity,
                    hit_test_target: link.hit_test_target,
                });
            }
        }
    }
}

/// Walk hits nearest first and apply the toggle rule to the first annotation
/// object found. Only that object is considered, whatever its state.
pub fn resolve_hits(
    hits: impl IntoIterator<Item = Entity>,
    objects: &mut Query<&mut AnnotationObject>,
) -> SelectOutcome {
    for entity in hits {
        let Ok(mut object) = objects.get_mut(entity) else {
            continue;
        };

        let Some(next) = object.state().toggled() else {
            return SelectOutcome::Consumed(entity);
        };

        let previous = object.set_state(next);
        return SelectOutcome::Toggled(PlaybackTransition {
            object: entity,
            username: object.username.clone(),
            previous,
            current: next,
        });
    }

    SelectOutcome::CreationStarted
}
