//! File-backed tracking layer so anchors survive between desktop runs.

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collaborators::{
    AnchorId, AnchorPose, AnchorRecord, AnchorTracker, Hand, HitTestTargetId,
};
use crate::error::TrackingError;

/// On-disk form of one persistent anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredAnchor {
    id: AnchorId,
    translation: [f32; 3],
    rotation: [f32; 4],
}

impl StoredAnchor {
    fn from_record(record: &AnchorRecord) -> Self {
        Self {
            id: record.id.clone(),
            translation: record.pose.translation.to_array(),
            rotation: record.pose.rotation.to_array(),
        }
    }

    fn to_record(&self) -> AnchorRecord {
        AnchorRecord {
            id: self.id.clone(),
            pose: AnchorPose::new(
                Vec3::from_array(self.translation),
                Quat::from_array(self.rotation).normalize(),
            ),
            persistent: true,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AnchorStore {
    anchors: Vec<StoredAnchor>,
}

/// Simulated device tracking that keeps persistent anchors in a JSON file.
///
/// Transient anchors live only in the returned records. Hit-test targets are
/// plain counters since the desktop has no tracked controllers.
pub struct FileAnchorTracker {
    path: PathBuf,
    // Serializes read-modify-write cycles on the store file
    lock: Mutex<()>,
    next_target: AtomicU64,
    next_anchor: AtomicU64,
}

impl FileAnchorTracker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            next_target: AtomicU64::new(1),
            next_anchor: AtomicU64::new(1),
        }
    }

    fn read_store(&self) -> Result<AnchorStore, TrackingError> {
        if !self.path.exists() {
            return Ok(AnchorStore::default());
        }
        let json = std::fs::read_to_string(&self.path)
            .map_err(|e| TrackingError::Storage(format!("{:?}: {}", self.path, e)))?;
        serde_json::from_str(&json)
            .map_err(|e| TrackingError::Storage(format!("{:?} is corrupted: {}", self.path, e)))
    }

    fn write_store(&self, store: &AnchorStore) -> Result<(), TrackingError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| TrackingError::Storage(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(store)
            .map_err(|e| TrackingError::Storage(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| TrackingError::Storage(e.to_string()))
    }

    fn new_anchor_id(&self) -> AnchorId {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let sequence = self.next_anchor.fetch_add(1, Ordering::Relaxed);
        AnchorId(format!("anchor-{}-{}", timestamp, sequence))
    }
}

impl AnchorTracker for FileAnchorTracker {
    fn create_anchor(
        &self,
        pose: AnchorPose,
        persistent: bool,
    ) -> Result<AnchorRecord, TrackingError> {
        let record = AnchorRecord {
            id: self.new_anchor_id(),
            pose,
            persistent,
        };

        if persistent {
            let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
            let mut store = self
                .read_store()
                .map_err(|e| TrackingError::Create(e.to_string()))?;
            store.anchors.push(StoredAnchor::from_record(&record));
            self.write_store(&store)
                .map_err(|e| TrackingError::Create(e.to_string()))?;
        }

        info!("Created anchor {} at {}", record.id, pose.translation);
        Ok(record)
    }

    fn delete_anchor(&self, id: &AnchorId) -> Result<(), TrackingError> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let delete_error = |reason: String| TrackingError::Delete {
            id: id.clone(),
            reason,
        };

        let mut store = self.read_store().map_err(|e| delete_error(e.to_string()))?;
        let before = store.anchors.len();
        store.anchors.retain(|anchor| &anchor.id != id);
        if store.anchors.len() == before {
            return Err(delete_error("no such persistent anchor".to_string()));
        }

        self.write_store(&store).map_err(|e| delete_error(e.to_string()))?;
        debug!("Deleted anchor {}", id);
        Ok(())
    }

    fn persistent_anchors(&self) -> Vec<AnchorId> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        match self.read_store() {
            Ok(store) => store.anchors.into_iter().map(|anchor| anchor.id).collect(),
            Err(e) => {
                warn!("{}", e);
                Vec::new()
            }
        }
    }

    fn restore_persistent_anchors(&self) -> Result<Vec<AnchorRecord>, TrackingError> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let store = self
            .read_store()
            .map_err(|e| TrackingError::Restore(e.to_string()))?;
        Ok(store.anchors.iter().map(StoredAnchor::to_record).collect())
    }

    fn create_hit_test_target(&self, hand: Hand) -> Result<HitTestTargetId, TrackingError> {
        let target = HitTestTargetId(self.next_target.fetch_add(1, Ordering::Relaxed));
        debug!("Hit-test target {:?} for {} controller", target, hand.label());
        Ok(target)
    }

    fn release_hit_test_target(&self, target: HitTestTargetId) {
        debug!("Released hit-test target {:?}", target);
    }
}
