//! Drives text display and audio from annotation state transitions.

use std::collections::HashMap;

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task};
use futures_lite::future;

use crate::annotations::{AnnotationObject, AnnotationState};
use crate::collaborators::{AudioBackend, TextStore};
use crate::error::TextStoreError;

/// An annotation object changed state in response to a select gesture
#[derive(Message, Debug, Clone, PartialEq)]
pub struct PlaybackTransition {
    pub object: Entity,
    pub username: String,
    pub previous: AnnotationState,
    pub current: AnnotationState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub username: String,
    /// None when the text store had nothing for this user or could not be reached
    pub text: Option<String>,
}

/// What the text widget should show
#[derive(Resource, Default, Debug)]
pub struct PlaybackDisplay {
    pub now_playing: Option<NowPlaying>,
}

/// Usernames of the objects that entered `Playing` and have not left it
#[derive(Resource, Default, Debug)]
pub struct PlayingObjects(HashMap<Entity, String>);

impl PlayingObjects {
    pub fn contains(&self, object: Entity) -> bool {
        self.0.contains_key(&object)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Background text lookup for an object that started playing
#[derive(Component)]
pub struct FetchTextTask {
    pub object: Entity,
    pub username: String,
    pub task: Task<Result<Option<String>, TextStoreError>>,
}

/// Create and load an audio source for every new annotation object
pub fn prepare_audio_sources(
    added: Query<&AnnotationObject, Added<AnnotationObject>>,
    audio: Res<AudioBackend>,
) {
    for object in added.iter() {
        audio.0.create_source(&object.username);
        audio.0.load_blob(&object.username);
    }
}

pub fn react_to_transitions(
    mut commands: Commands,
    mut transitions: MessageReader<PlaybackTransition>,
    mut display: ResMut<PlaybackDisplay>,
    mut playing: ResMut<PlayingObjects>,
    text_store: Res<TextStore>,
    audio: Res<AudioBackend>,
) {
    for transition in transitions.read() {
        match (transition.previous, transition.current) {
            (_, AnnotationState::Playing) => {
                playing
                    .0
                    .insert(transition.object, transition.username.clone());

                let client = text_store.0.clone();
                let username = transition.username.clone();
                let task =
                    IoTaskPool::get().spawn(async move { client.get_user_text(&username) });

                commands.spawn(FetchTextTask {
                    object: transition.object,
                    username: transition.username.clone(),
                    task,
                });
            }
            (AnnotationState::Playing, AnnotationState::Complete) => {
                playing.0.remove(&transition.object);
                display.now_playing = None;
                audio.0.stop(&transition.username);
                debug!("Stopped playback of {}", transition.username);
            }
            _ => {}
        }
    }
}

/// Publishes fetched text and starts audio once the lookup finishes.
///
/// A lookup that finishes after its object stopped playing is dropped.
pub fn poll_text_fetches(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut FetchTextTask)>,
    objects: Query<&AnnotationObject>,
    mut display: ResMut<PlaybackDisplay>,
    audio: Res<AudioBackend>,
) {
    for (entity, mut fetch) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut fetch.task)) else {
            continue;
        };
        commands.entity(entity).despawn();

        let still_playing = objects
            .get(fetch.object)
            .is_ok_and(|object| object.state() == AnnotationState::Playing);
        if !still_playing {
            debug!("{} stopped before its text arrived", fetch.username);
            continue;
        }

        let text = match result {
            Ok(text) => text,
            Err(e) => {
                warn!("No text for {}: {}", fetch.username, e);
                None
            }
        };

        display.now_playing = Some(NowPlaying {
            username: fetch.username.clone(),
            text,
        });
        audio.0.play(&fetch.username);
        info!("Playing annotation of {}", fetch.username);
    }
}

/// Stop the audio of playing objects that left the scene, as happens when
/// their anchor is replaced or cleared
pub fn stop_removed_playback(
    mut removed: RemovedComponents<AnnotationObject>,
    mut playing: ResMut<PlayingObjects>,
    mut display: ResMut<PlaybackDisplay>,
    audio: Res<AudioBackend>,
) {
    for entity in removed.read() {
        let Some(username) = playing.0.remove(&entity) else {
            continue;
        };

        audio.0.stop(&username);
        if display
            .now_playing
            .as_ref()
            .is_some_and(|now| now.username == username)
        {
            display.now_playing = None;
        }
        debug!("Stopped playback of {}, its object was removed", username);
    }
}

/// Advance the audio engine once per frame
pub fn tick_audio(audio: Res<AudioBackend>) {
    audio.0.update();
}
