//! Component types for annotation entities.

use bevy::prelude::*;

/// Playback state of an annotation object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnnotationState {
    /// Still being recorded or authored by the creation workflow
    #[default]
    Idle,
    /// Finished and eligible for playback
    Complete,
    /// Currently being played back
    Playing,
}

impl AnnotationState {
    /// State a select hit moves this state to, if it reacts to hits at all.
    pub fn toggled(self) -> Option<Self> {
        match self {
            AnnotationState::Complete => Some(AnnotationState::Playing),
            AnnotationState::Playing => Some(AnnotationState::Complete),
            AnnotationState::Idle => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnnotationState::Idle => "idle",
            AnnotationState::Complete => "complete",
            AnnotationState::Playing => "playing",
        }
    }
}

/// One user's voice/text note, parented to exactly one anchor.
#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct AnnotationObject {
    pub username: String,
    state: AnnotationState,
}

impl AnnotationObject {
    pub fn new(username: impl Into<String>, state: AnnotationState) -> Self {
        Self {
            username: username.into(),
            state,
        }
    }

    pub fn state(&self) -> AnnotationState {
        self.state
    }

    /// Move to `state` and return the previous state. Has no side effects;
    /// callers trigger playback after a successful transition.
    pub fn set_state(&mut self, state: AnnotationState) -> AnnotationState {
        std::mem::replace(&mut self.state, state)
    }
}
