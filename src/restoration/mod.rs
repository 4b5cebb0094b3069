//! Session-start recovery of persisted anchors.
//!
//! When the host reports [`SessionStarted`], the protocol waits
//! `restore_settle_secs` so the device can finish discovering its anchors,
//! then asks the tracker to restore them. Every restored anchor is installed
//! as primary in the order returned, so the last one stays primary. A failed
//! restoration ends the app: without anchor state the session is useless.

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task};
use futures_lite::future;

use crate::ViewerSet;
use crate::anchors::AnchorManager;
use crate::collaborators::{AnchorRecord, Tracker};
use crate::config::ViewerSettings;
use crate::error::TrackingError;

/// The XR session is running and tracking has started
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct SessionStarted;

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub enum RestorationStatus {
    #[default]
    NotStarted,
    /// Waiting for the device to settle; seconds left
    Settling(f32),
    InFlight,
    Restored(usize),
    Failed(String),
}

#[derive(Component)]
pub struct RestoreAnchorsTask(pub Task<Result<Vec<AnchorRecord>, TrackingError>>);

fn begin_settle(
    mut events: MessageReader<SessionStarted>,
    mut status: ResMut<RestorationStatus>,
    settings: Res<ViewerSettings>,
) {
    for _ in events.read() {
        if matches!(*status, RestorationStatus::Settling(_) | RestorationStatus::InFlight) {
            debug!("Session start while restoration is pending, ignoring");
            continue;
        }
        info!(
            "Session started, restoring anchors in {:.1}s",
            settings.restore_settle_secs
        );
        *status = RestorationStatus::Settling(settings.restore_settle_secs.max(0.0));
    }
}

fn tick_settle(
    mut commands: Commands,
    time: Res<Time>,
    mut status: ResMut<RestorationStatus>,
    tracker: Res<Tracker>,
) {
    let RestorationStatus::Settling(remaining) = *status else {
        return;
    };

    let remaining = remaining - time.delta_secs();
    if remaining > 0.0 {
        *status = RestorationStatus::Settling(remaining);
        return;
    }

    let tracker = tracker.0.clone();
    let task = IoTaskPool::get().spawn(async move { tracker.restore_persistent_anchors() });
    commands.spawn(RestoreAnchorsTask(task));
    *status = RestorationStatus::InFlight;
}

fn poll_restoration(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut RestoreAnchorsTask)>,
    mut status: ResMut<RestorationStatus>,
    mut manager: AnchorManager,
    mut exit: MessageWriter<AppExit>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };
        commands.entity(entity).despawn();

        match result {
            Ok(records) => {
                let count = records.len();
                // Single-primary model: each install replaces the previous one
                for record in records {
                    manager.set_primary(record, true);
                }
                info!("Restored {} persistent anchors", count);
                *status = RestorationStatus::Restored(count);
            }
            Err(e) => {
                error!("Anchor restoration failed, ending session: {}", e);
                *status = RestorationStatus::Failed(e.to_string());
                exit.write(AppExit::error());
            }
        }
    }
}

pub struct RestorationPlugin;

impl Plugin for RestorationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RestorationStatus>()
            .add_message::<SessionStarted>()
            .add_systems(
                Update,
                begin_settle
                    .run_if(on_message::<SessionStarted>)
                    .in_set(ViewerSet::Input),
            )
            .add_systems(
                Update,
                (tick_settle, poll_restoration)
                    .chain()
                    .in_set(ViewerSet::Tasks),
            );
    }
}
