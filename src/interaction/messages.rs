//! Controller input messages and the creation-workflow hand-off.

use bevy::prelude::*;

use crate::collaborators::{AnchorId, Hand, HitTestTargetId};

#[derive(Message, Debug, Clone, Copy)]
pub struct ControllerConnected {
    pub hand: Hand,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct ControllerDisconnected {
    pub hand: Hand,
}

/// Trigger press on a controller
#[derive(Message, Debug, Clone, Copy)]
pub struct SelectGesture {
    pub hand: Hand,
}

/// Grip press on a controller
#[derive(Message, Debug, Clone, Copy)]
pub struct SqueezeGesture {
    pub hand: Hand,
}

/// Asks the annotation creation workflow to author a new note on `anchor`.
/// Written when a select gesture hits no annotation object.
#[derive(Message, Debug, Clone)]
pub struct StartAnnotationCreation {
    pub anchor: Entity,
    pub anchor_id: AnchorId,
    pub hand: Hand,
    pub controller: Entity,
    pub hit_test_target: Option<HitTestTargetId>,
}
