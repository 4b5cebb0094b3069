//! Contracts for the systems the core drives but does not own.
//!
//! - [`tracking`] - Spatial anchors and controller hit-test targets
//! - [`audio`] - Spatial sound sources per annotation
//! - [`text_store`] - Annotation text records, cached client-side
//!
//! The scene graph is Bevy's own hierarchy, and the annotation creation
//! workflow is reached through the
//! [`StartAnnotationCreation`](crate::interaction::StartAnnotationCreation) message.

mod audio;
mod text_store;
mod tracking;

pub use audio::{AudioBackend, SpatialAudio};
pub use text_store::{
    FileTextSource, HttpTextSource, TextRecord, TextSource, TextStore, TextStoreClient,
};
pub use tracking::{
    AnchorId, AnchorPose, AnchorRecord, AnchorTracker, Hand, HitTestTargetId, Tracker,
};
