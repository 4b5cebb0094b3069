//! Lifecycle state: the primary anchor and the pending creation slot.

use bevy::prelude::*;
use bevy::tasks::Task;

use crate::collaborators::{AnchorId, AnchorPose, AnchorRecord};
use crate::error::TrackingError;

/// A user gesture's request for a new anchor, consumed by the next frame tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingAnchorCreation {
    pub pose: AnchorPose,
}

/// The anchor currently used for attachment and interaction
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryAnchor {
    pub entity: Entity,
    pub marker: Entity,
    pub id: AnchorId,
    pub recovered: bool,
}

/// Owner of the primary anchor reference, the pending creation request and
/// the queued deletion of persistent anchors.
///
/// The primary anchor only changes through [`AnchorManager`](super::AnchorManager).
#[derive(Resource, Default, Debug)]
pub struct AnchorLifecycle {
    primary: Option<PrimaryAnchor>,
    pending: Option<PendingAnchorCreation>,
    queued_clear: Option<AfterClear>,
}

impl AnchorLifecycle {
    /// Record a creation request, replacing any request not yet consumed.
    /// Returns true when an earlier request was overwritten.
    pub fn request_creation(&mut self, pose: AnchorPose) -> bool {
        self.pending
            .replace(PendingAnchorCreation { pose })
            .is_some()
    }

    pub fn pending(&self) -> Option<&PendingAnchorCreation> {
        self.pending.as_ref()
    }

    pub(super) fn take_pending(&mut self) -> Option<PendingAnchorCreation> {
        self.pending.take()
    }

    pub fn primary(&self) -> Option<&PrimaryAnchor> {
        self.primary.as_ref()
    }

    pub fn primary_entity(&self) -> Option<Entity> {
        self.primary.as_ref().map(|p| p.entity)
    }

    pub(super) fn replace_primary(&mut self, primary: PrimaryAnchor) -> Option<PrimaryAnchor> {
        self.primary.replace(primary)
    }

    pub(super) fn take_primary(&mut self) -> Option<PrimaryAnchor> {
        self.primary.take()
    }

    /// Queue deletion of every persistent anchor. Requests arriving before the
    /// queue is drained collapse into one deletion.
    pub fn request_clear(&mut self, then: AfterClear) {
        let merged = match self.queued_clear {
            Some(queued) => queued.merge(then),
            None => then,
        };
        self.queued_clear = Some(merged);
    }

    pub fn queued_clear(&self) -> Option<AfterClear> {
        self.queued_clear
    }

    pub(super) fn take_queued_clear(&mut self) -> Option<AfterClear> {
        self.queued_clear.take()
    }
}

/// What to do once every persistent anchor has been deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterClear {
    Nothing,
    /// Request a new anchor on the floor below the viewer
    RequestAnchorAtViewer,
}

impl AfterClear {
    /// Follow-up of two clears run as a single deletion
    pub fn merge(self, other: Self) -> Self {
        if self == Self::RequestAnchorAtViewer || other == Self::RequestAnchorAtViewer {
            Self::RequestAnchorAtViewer
        } else {
            Self::Nothing
        }
    }
}

/// Background anchor creation started by the frame tick
#[derive(Component)]
pub struct CreateAnchorTask(pub Task<Result<AnchorRecord, TrackingError>>);

/// Background sequential deletion of every persistent anchor. At most one
/// exists at a time.
#[derive(Component)]
pub struct ClearAnchorsTask {
    pub then: AfterClear,
    pub task: Task<Result<usize, TrackingError>>,
}
