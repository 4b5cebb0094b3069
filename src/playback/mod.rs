//! Playback of annotation audio and text.
//!
//! Reacts to [`PlaybackTransition`] messages written by the select handler:
//! entering `Playing` fetches the user's text, publishes it to
//! [`PlaybackDisplay`] and starts audio; returning to `Complete` clears the
//! text and stops audio, as does the object leaving the scene while playing.
//! Text store failures only cost the text.

mod coordinator;


pub use coordinator::{
    FetchTextTask, NowPlaying, PlaybackDisplay, PlaybackTransition, PlayingObjects,
};

use bevy::prelude::*;

use crate::ViewerSet;

pub struct PlaybackPlugin;

impl Plugin for PlaybackPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlaybackDisplay>()
            .init_resource::<PlayingObjects>()
            .add_message::<PlaybackTransition>()
            .add_systems(
                Update,
                (
                    coordinator::react_to_transitions.run_if(on_message::<PlaybackTransition>),
                    coordinator::poll_text_fetches,
                )
                    .chain()
                    .in_set(ViewerSet::Tasks),
            )
            .add_systems(
                Update,
                (
                    coordinator::stop_removed_playback,
                    coordinator::prepare_audio_sources,
                    coordinator::tick_audio,
                )
                    .chain()
                    .in_set(ViewerSet::Audio),
            );
    }
}
