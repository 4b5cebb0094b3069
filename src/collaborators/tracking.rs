//! Device-tracking layer contract.

use std::fmt;
use std::sync::Arc;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::TrackingError;

/// Opaque identifier the tracking layer assigns to an anchor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId(pub String);

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnchorId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Handle to a ray-castable proxy bound to a controller's tracked pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitTestTargetId(pub u64);

/// Controller handedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn label(self) -> &'static str {
        match self {
            Hand::Left => "left",
            Hand::Right => "right",
        }
    }
}

/// World-space position and orientation of an anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl AnchorPose {
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Pose on the floor below `position` with a neutral orientation.
    pub fn on_floor(position: Vec3) -> Self {
        Self {
            translation: Vec3::new(position.x, 0.0, position.z),
            rotation: Quat::IDENTITY,
        }
    }

    pub fn to_transform(self) -> Transform {
        Transform::from_translation(self.translation).with_rotation(self.rotation)
    }
}

/// An anchor as reported by the tracking layer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorRecord {
    pub id: AnchorId,
    pub pose: AnchorPose,
    pub persistent: bool,
}

/// Spatial anchor primitives exposed by the device-tracking layer.
///
/// Calls may block; the core only invokes them from tasks on the IO task pool.
/// Anchor mutation is not assumed to be safe concurrently, so callers never
/// run two deletions at once.
pub trait AnchorTracker: Send + Sync {
    fn create_anchor(&self, pose: AnchorPose, persistent: bool)
    -> Result<AnchorRecord, TrackingError>;

    fn delete_anchor(&self, id: &AnchorId) -> Result<(), TrackingError>;

    /// Ids of every persistent anchor the device currently knows about.
    fn persistent_anchors(&self) -> Vec<AnchorId>;

    /// Re-establish anchors persisted by earlier sessions.
    fn restore_persistent_anchors(&self) -> Result<Vec<AnchorRecord>, TrackingError>;

    fn create_hit_test_target(&self, hand: Hand) -> Result<HitTestTargetId, TrackingError>;

    /// Called from frame systems, so it must return without blocking.
    fn release_hit_test_target(&self, target: HitTestTargetId);
}

/// Resource handle to the tracking layer, supplied by the host.
#[derive(Resource, Clone)]
pub struct Tracker(pub Arc<dyn AnchorTracker>);

impl Tracker {
    pub fn new(tracker: impl AnchorTracker + 'static) -> Self {
        Self(Arc::new(tracker))
    }
}
