//! Sequential deletion of every persistent anchor.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use futures_lite::future;

use crate::collaborators::{AnchorPose, AnchorTracker, Tracker};
use crate::error::TrackingError;
use crate::interaction::Viewer;

use super::manager::AnchorManager;
use super::messages::{AnchorOperation, AnchorOperationFailed, ClearAnchorsRequest};
use super::state::{AfterClear, AnchorLifecycle, ClearAnchorsTask};

/// Delete every persistent anchor one at a time, stopping at the first failure.
///
/// Returns how many anchors were deleted.
pub fn delete_all_persistent_anchors(tracker: &dyn AnchorTracker) -> Result<usize, TrackingError> {
    tracker
        .persistent_anchors()
        .iter()
        .try_fold(0, |deleted, id| {
            tracker.delete_anchor(id)?;
            Ok(deleted + 1)
        })
}

/// Host-initiated "clear anchors"
pub fn handle_clear_requests(
    mut requests: MessageReader<ClearAnchorsRequest>,
    mut lifecycle: ResMut<AnchorLifecycle>,
) {
    for _ in requests.read() {
        lifecycle.request_clear(AfterClear::Nothing);
    }
}

/// Start the queued deletion in the background. While one is still running
/// the queued follow-up is folded into it instead, so the tracker never sees
/// two deletions at once.
pub fn start_clear_anchors(
    mut commands: Commands,
    mut lifecycle: ResMut<AnchorLifecycle>,
    mut running: Query<&mut ClearAnchorsTask>,
    tracker: Res<Tracker>,
) {
    let Some(then) = lifecycle.take_queued_clear() else {
        return;
    };

    if let Some(mut clear) = running.iter_mut().next() {
        clear.then = clear.then.merge(then);
        debug!("Anchor deletion already running, follow-up is {:?}", clear.then);
        return;
    }

    let tracker = tracker.0.clone();
    let task =
        IoTaskPool::get().spawn(async move { delete_all_persistent_anchors(tracker.as_ref()) });
    commands.spawn(ClearAnchorsTask { then, task });
}

/// Polls clear tasks. A successful clear takes the primary anchor out of the
/// scene; a squeeze-initiated one then asks for a new anchor on the floor
/// below the viewer.
pub fn poll_clear_anchors(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut ClearAnchorsTask)>,
    mut manager: AnchorManager,
    viewer: Query<&GlobalTransform, With<Viewer>>,
    mut failures: MessageWriter<AnchorOperationFailed>,
) {
    for (entity, mut clear) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut clear.task)) else {
            continue;
        };
        commands.entity(entity).despawn();

        match result {
            Ok(deleted) => {
                info!("Deleted {} persistent anchors", deleted);
                if let Some(id) = manager.clear_primary() {
                    info!("Removed primary anchor {}", id);
                }

                if clear.then == AfterClear::RequestAnchorAtViewer {
                    let position = match viewer.single() {
                        Ok(transform) => transform.translation(),
                        Err(_) => {
                            warn!("No viewer in the scene, requesting anchor at the origin");
                            Vec3::ZERO
                        }
                    };

                    if manager.request_creation(AnchorPose::on_floor(position)) {
                        debug!("Replaced an unconsumed anchor request");
                    }
                }
            }
            Err(error) => {
                error!("{}", error);
                failures.write(AnchorOperationFailed {
                    operation: AnchorOperation::Delete,
                    error,
                });
            }
        }
    }
}
