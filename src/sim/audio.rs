//! Audio stand-in for the desktop: logs what a spatial engine would do.

use std::collections::HashSet;
use std::sync::Mutex;

use bevy::prelude::*;

use crate::collaborators::SpatialAudio;

#[derive(Default)]
pub struct LoggingAudio {
    playing: Mutex<HashSet<String>>,
}

impl LoggingAudio {
    pub fn is_playing(&self, username: &str) -> bool {
        self.playing
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .contains(username)
    }
}

impl SpatialAudio for LoggingAudio {
    fn create_source(&self, username: &str) {
        debug!("Audio source created for {}", username);
    }

    fn load_blob(&self, username: &str) {
        debug!("Audio blob loaded for {}", username);
    }

    fn play(&self, username: &str) {
        self.playing
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(username.to_string());
        info!("Audio playing: {}", username);
    }

    fn stop(&self, username: &str) {
        self.playing
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(username);
        info!("Audio stopped: {}", username);
    }

    fn set_position(&self, username: &str, position: Vec3) {
        trace!("Audio of {} at {}", username, position);
    }

    fn update(&self) {}
}
