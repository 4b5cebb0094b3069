//! Component types for anchor entities.

use bevy::prelude::*;

use crate::collaborators::AnchorId;
use crate::constants::{NEW_ANCHOR_COLOR, RECOVERED_ANCHOR_COLOR};

#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct Anchor {
    pub id: AnchorId,
    pub persistent: bool,
    /// Restored from a previous session rather than created in this one
    pub recovered: bool,
}

/// Debug/affordance sphere drawn at an anchor's origin
#[derive(Component, Debug, Clone, Copy, PartialEq)]
#[require(Transform)]
pub struct AnchorMarker {
    pub color: Color,
}

impl AnchorMarker {
    pub fn for_anchor(recovered: bool) -> Self {
        let color = if recovered {
            RECOVERED_ANCHOR_COLOR
        } else {
            NEW_ANCHOR_COLOR
        };
        Self { color }
    }
}
