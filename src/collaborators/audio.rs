//! Spatial audio subsystem contract.

use std::sync::Arc;

use bevy::prelude::*;

/// Spatial sound sources keyed by annotation username.
///
/// Implementations queue work internally; every call returns promptly and is
/// safe to make from a frame system.
pub trait SpatialAudio: Send + Sync {
    fn create_source(&self, username: &str);

    /// Load the recorded blob for `username` into its source.
    fn load_blob(&self, username: &str);

    fn play(&self, username: &str);

    fn stop(&self, username: &str);

    fn set_position(&self, username: &str, position: Vec3);

    /// Advance the audio engine by one frame.
    fn update(&self);
}

/// Resource handle to the audio subsystem, supplied by the host.
#[derive(Resource, Clone)]
pub struct AudioBackend(pub Arc<dyn SpatialAudio>);

impl AudioBackend {
    pub fn new(audio: impl SpatialAudio + 'static) -> Self {
        Self(Arc::new(audio))
    }
}
