//! Anchor lifecycle: creation, replacement, deletion of spatial anchors and
//! ownership of the single primary anchor.
//!
//! ## Module Structure
//!
//! - [`components`] - `Anchor` and its marker visual
//! - [`state`] - `AnchorLifecycle` resource and task components
//! - [`messages`] - Message types for anchor operations
//! - [`manager`] - `AnchorManager`, the only way to change the primary anchor
//! - [`creation`] - Pending request flush and creation task polling
//! - [`deletion`] - Sequential deletion of persistent anchors
//!
//! ## Flow
//!
//! A squeeze gesture queues deletion of the persistent anchors; only one
//! deletion runs at a time. Once it succeeds the primary anchor is removed and
//! a [`PendingAnchorCreation`] is recorded. The next frame tick hands it to the tracker and
//! empties the slot; when the tracker answers, the anchor becomes primary.

mod components;
mod creation;
mod deletion;
mod manager;
mod messages;
mod state;

#[cfg(test)]
mod tests;

pub use components::{Anchor, AnchorMarker};
pub use deletion::delete_all_persistent_anchors;
pub use manager::AnchorManager;
pub use messages::{AnchorInstalled, AnchorOperation, AnchorOperationFailed, ClearAnchorsRequest};
pub use state::{
    AfterClear, AnchorLifecycle, ClearAnchorsTask, CreateAnchorTask, PendingAnchorCreation,
    PrimaryAnchor,
};

use bevy::prelude::*;

use crate::ViewerSet;

pub struct AnchorsPlugin;

impl Plugin for AnchorsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnchorLifecycle>()
            .add_message::<AnchorInstalled>()
            .add_message::<AnchorOperationFailed>()
            .add_message::<ClearAnchorsRequest>()
            .add_systems(
                Update,
                deletion::handle_clear_requests
                    .run_if(on_message::<ClearAnchorsRequest>)
                    .in_set(ViewerSet::Input),
            )
            .add_systems(
                Update,
                (
                    deletion::poll_clear_anchors,
                    deletion::start_clear_anchors,
                    creation::poll_create_anchor_tasks,
                    creation::flush_pending_creation,
                )
                    .chain()
                    .in_set(ViewerSet::Tasks),
            );
    }
}
