//! Controller connection state and hit-test target lifetime.

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task};
use futures_lite::future;

use crate::collaborators::{Hand, HitTestTargetId, Tracker};
use crate::error::TrackingError;

use super::messages::{ControllerConnected, ControllerDisconnected};

/// The user's head/camera, supplied by the host
#[derive(Component, Debug, Default, Clone, Copy)]
#[require(Transform)]
pub struct Viewer;

/// A physical hand controller, supplied by the host and posed by it every frame
#[derive(Component, Debug, Clone, Copy)]
#[require(Transform, ControllerLink)]
pub struct Controller {
    pub hand: Hand,
}

/// Connection state the dispatcher keeps per controller
#[derive(Component, Debug, Default)]
pub struct ControllerLink {
    pub connected: bool,
    pub hit_test_target: Option<HitTestTargetId>,
    pub marker: Option<Entity>,
}

/// Small visual attached to a controller once its hit-test target resolves
#[derive(Component, Debug, Clone, Copy)]
#[require(Transform)]
pub struct ControllerMarker;

/// Background creation of a controller's hit-test target
#[derive(Component)]
pub struct HitTestTargetTask {
    pub controller: Entity,
    pub task: Task<Result<HitTestTargetId, TrackingError>>,
}

pub fn handle_controller_connected(
    mut commands: Commands,
    mut events: MessageReader<ControllerConnected>,
    mut controllers: Query<(Entity, &Controller, &mut ControllerLink)>,
    tracker: Res<Tracker>,
) {
    for event in events.read() {
        let Some((entity, _, mut link)) = controllers
            .iter_mut()
            .find(|(_, controller, _)| controller.hand == event.hand)
        else {
            warn!("No {} controller in the scene to connect", event.hand.label());
            continue;
        };

        if link.connected {
            debug!("{} controller already connected", event.hand.label());
            continue;
        }
        link.connected = true;
        info!("{} controller connected", event.hand.label());

        let tracker = tracker.0.clone();
        let hand = event.hand;
        let task = IoTaskPool::get().spawn(async move { tracker.create_hit_test_target(hand) });

        commands.spawn(HitTestTargetTask {
            controller: entity,
            task,
        });
    }
}

/// Attaches resolved hit-test targets, or releases them if the controller
/// went away in the meantime
pub fn poll_hit_test_targets(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut HitTestTargetTask)>,
    mut links: Query<&mut ControllerLink>,
    tracker: Res<Tracker>,
) {
    for (entity, mut pending) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut pending.task)) else {
            continue;
        };
        commands.entity(entity).despawn();

        let target = match result {
            Ok(target) => target,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };

        match links.get_mut(pending.controller) {
            Ok(mut link) if link.connected && link.hit_test_target.is_none() => {
                link.hit_test_target = Some(target);
                let marker = commands
                    .spawn((
                        Name::new("Controller marker"),
                        ControllerMarker,
                        Transform::default(),
                        ChildOf(pending.controller),
                    ))
                    .id();
                link.marker = Some(marker);
                debug!("Hit-test target {:?} ready", target);
            }
            _ => {
                debug!("Releasing hit-test target {:?} of a disconnected controller", target);
                tracker.0.release_hit_test_target(target);
            }
        }
    }
}

pub fn handle_controller_disconnected(
    mut commands: Commands,
    mut events: MessageReader<ControllerDisconnected>,
    mut controllers: Query<(&Controller, &mut ControllerLink)>,
    tracker: Res<Tracker>,
) {
    for event in events.read() {
        let Some((_, mut link)) = controllers
            .iter_mut()
            .find(|(controller, _)| controller.hand == event.hand)
        else {
            continue;
        };

        link.connected = false;
        if let Some(target) = link.hit_test_target.take() {
            tracker.0.release_hit_test_target(target);
        }
        if let Some(marker) = link.marker.take() {
            commands.entity(marker).try_despawn();
        }
        info!("{} controller disconnected", event.hand.label());
    }
}
