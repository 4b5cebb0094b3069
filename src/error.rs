//! Error types surfaced by external collaborators.

use thiserror::Error;

use crate::collaborators::AnchorId;

/// Failures reported by the device-tracking layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackingError {
    #[error("anchor creation failed: {0}")]
    Create(String),
    #[error("deleting anchor {id} failed: {reason}")]
    Delete { id: AnchorId, reason: String },
    #[error("anchor restoration failed: {0}")]
    Restore(String),
    #[error("hit-test target unavailable: {0}")]
    HitTestTarget(String),
    #[error("anchor storage error: {0}")]
    Storage(String),
}

/// Failures reported by the remote text store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TextStoreError {
    #[error("text store request failed: {0}")]
    Request(String),
    #[error("text store returned malformed data: {0}")]
    Decode(String),
}
