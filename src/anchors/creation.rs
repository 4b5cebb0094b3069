//! Per-frame flush of the pending creation request and task polling.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use futures_lite::future;

use crate::collaborators::Tracker;

use super::manager::AnchorManager;
use super::messages::{AnchorOperation, AnchorOperationFailed};
use super::state::{AnchorLifecycle, CreateAnchorTask};

/// Frame tick: turn a pending request into an asynchronous persistent anchor
/// creation. The slot is emptied before the call is issued so a later frame
/// never issues the same request twice.
pub fn flush_pending_creation(
    mut commands: Commands,
    mut lifecycle: ResMut<AnchorLifecycle>,
    tracker: Res<Tracker>,
) {
    let Some(pending) = lifecycle.take_pending() else {
        return;
    };

    debug!("Creating anchor at {}", pending.pose.translation);

    let tracker = tracker.0.clone();
    let task = IoTaskPool::get().spawn(async move { tracker.create_anchor(pending.pose, true) });

    commands.spawn(CreateAnchorTask(task));
}

/// Installs created anchors as primary once the tracker answers
pub fn poll_create_anchor_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut CreateAnchorTask)>,
    mut manager: AnchorManager,
    mut failures: MessageWriter<AnchorOperationFailed>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };
        commands.entity(entity).despawn();

        match result {
            Ok(record) => {
                manager.set_primary(record, false);
            }
            Err(error) => {
                error!("{}", error);
                failures.write(AnchorOperationFailed {
                    operation: AnchorOperation::Create,
                    error,
                });
            }
        }
    }
}
