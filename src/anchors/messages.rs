//! Message types for anchor lifecycle operations.

use bevy::prelude::*;

use crate::collaborators::AnchorId;
use crate::error::TrackingError;

/// Written whenever an anchor becomes primary
#[derive(Message, Debug, Clone)]
pub struct AnchorInstalled {
    pub anchor: Entity,
    pub id: AnchorId,
    pub recovered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorOperation {
    Create,
    Delete,
}

/// A tracking-layer failure handed back to the host; nothing retries it
#[derive(Message, Debug, Clone)]
pub struct AnchorOperationFailed {
    pub operation: AnchorOperation,
    pub error: TrackingError,
}

/// Delete every persistent anchor without requesting a replacement
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ClearAnchorsRequest;
