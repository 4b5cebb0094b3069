//! Fake collaborators and an app harness shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;

use crate::AnnotationViewerPlugin;
use crate::anchors::AnchorManager;
use crate::collaborators::{
    AnchorId, AnchorPose, AnchorRecord, AnchorTracker, AudioBackend, Hand, HitTestTargetId,
    SpatialAudio, TextRecord, TextSource, TextStore, TextStoreClient, Tracker,
};
use crate::config::ViewerSettings;
use crate::error::{TextStoreError, TrackingError};
use crate::interaction::{Controller, Viewer};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
struct FakeTrackerState {
    stored: Vec<AnchorRecord>,
    next_id: u32,
    next_target: u64,
    create_calls: Vec<AnchorPose>,
    delete_calls: Vec<AnchorId>,
    restore_calls: usize,
    released: Vec<HitTestTargetId>,
    fail_create: Option<String>,
    fail_delete_of: Option<AnchorId>,
    fail_restore: Option<String>,
}

/// In-memory tracking layer that records every call.
#[derive(Clone, Default)]
pub struct FakeTracker {
    state: Arc<Mutex<FakeTrackerState>>,
}

impl FakeTracker {
    /// Seed a persistent anchor left over from an earlier session
    pub fn persist(&self, id: &str, position: Vec3) {
        lock(&self.state).stored.push(AnchorRecord {
            id: AnchorId::from(id),
            pose: AnchorPose::new(position, Quat::IDENTITY),
            persistent: true,
        });
    }

    pub fn fail_create(&self, reason: &str) {
        lock(&self.state).fail_create = Some(reason.to_string());
    }

    pub fn fail_delete_of(&self, id: &str) {
        lock(&self.state).fail_delete_of = Some(AnchorId::from(id));
    }

    pub fn fail_restore(&self, reason: &str) {
        lock(&self.state).fail_restore = Some(reason.to_string());
    }

    pub fn create_calls(&self) -> Vec<AnchorPose> {
        lock(&self.state).create_calls.clone()
    }

    pub fn delete_calls(&self) -> Vec<AnchorId> {
        lock(&self.state).delete_calls.clone()
    }

    pub fn restore_calls(&self) -> usize {
        lock(&self.state).restore_calls
    }

    pub fn released(&self) -> Vec<HitTestTargetId> {
        lock(&self.state).released.clone()
    }

    pub fn persistent_count(&self) -> usize {
        lock(&self.state).stored.len()
    }
}

impl AnchorTracker for FakeTracker {
    fn create_anchor(
        &self,
        pose: AnchorPose,
        persistent: bool,
    ) -> Result<AnchorRecord, TrackingError> {
        let mut state = lock(&self.state);
        state.create_calls.push(pose);
        if let Some(reason) = &state.fail_create {
            return Err(TrackingError::Create(reason.clone()));
        }

        state.next_id += 1;
        let record = AnchorRecord {
            id: AnchorId(format!("anchor-{}", state.next_id)),
            pose,
            persistent,
        };
        if persistent {
            state.stored.push(record.clone());
        }
        Ok(record)
    }

    fn delete_anchor(&self, id: &AnchorId) -> Result<(), TrackingError> {
        let mut state = lock(&self.state);
        state.delete_calls.push(id.clone());
        if state.fail_delete_of.as_ref() == Some(id) {
            return Err(TrackingError::Delete {
                id: id.clone(),
                reason: "anchor is busy".to_string(),
            });
        }
        state.stored.retain(|record| &record.id != id);
        Ok(())
    }

    fn persistent_anchors(&self) -> Vec<AnchorId> {
        lock(&self.state)
            .stored
            .iter()
            .map(|record| record.id.clone())
            .collect()
    }

    fn restore_persistent_anchors(&self) -> Result<Vec<AnchorRecord>, TrackingError> {
        let mut state = lock(&self.state);
        state.restore_calls += 1;
        match &state.fail_restore {
            Some(reason) => Err(TrackingError::Restore(reason.clone())),
            None => Ok(state.stored.clone()),
        }
    }

    fn create_hit_test_target(&self, _hand: Hand) -> Result<HitTestTargetId, TrackingError> {
        let mut state = lock(&self.state);
        state.next_target += 1;
        Ok(HitTestTargetId(state.next_target))
    }

    fn release_hit_test_target(&self, target: HitTestTargetId) {
        lock(&self.state).released.push(target);
    }
}

/// Text source serving fixed records, or always failing
pub struct FakeTextSource {
    records: Result<Vec<TextRecord>, String>,
    fetches: AtomicUsize,
}

impl FakeTextSource {
    pub fn with_records(records: Vec<TextRecord>) -> Self {
        Self {
            records: Ok(records),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            records: Err(reason.to_string()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl TextSource for FakeTextSource {
    fn fetch_all_text(&self) -> Result<Vec<TextRecord>, TextStoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.records.clone().map_err(TextStoreError::Request)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Create(String),
    Load(String),
    Play(String),
    Stop(String),
    Position(String, Vec3),
}

/// Audio backend that only records what it was asked to do
#[derive(Clone, Default)]
pub struct RecordingAudio {
    calls: Arc<Mutex<Vec<AudioCall>>>,
    ticks: Arc<AtomicUsize>,
}

impl RecordingAudio {
    pub fn calls(&self) -> Vec<AudioCall> {
        lock(&self.calls).clone()
    }

    pub fn played(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                AudioCall::Play(username) => Some(username),
                _ => None,
            })
            .collect()
    }

    pub fn stopped(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                AudioCall::Stop(username) => Some(username),
                _ => None,
            })
            .collect()
    }

    pub fn last_position(&self, username: &str) -> Option<Vec3> {
        self.calls().into_iter().rev().find_map(|call| match call {
            AudioCall::Position(name, position) if name == username => Some(position),
            _ => None,
        })
    }

    pub fn ticks(&self) -> usize {
        self.ticks.load(Ordering::SeqCst)
    }

    fn record(&self, call: AudioCall) {
        lock(&self.calls).push(call);
    }
}

impl SpatialAudio for RecordingAudio {
    fn create_source(&self, username: &str) {
        self.record(AudioCall::Create(username.to_string()));
    }

    fn load_blob(&self, username: &str) {
        self.record(AudioCall::Load(username.to_string()));
    }

    fn play(&self, username: &str) {
        self.record(AudioCall::Play(username.to_string()));
    }

    fn stop(&self, username: &str) {
        self.record(AudioCall::Stop(username.to_string()));
    }

    fn set_position(&self, username: &str, position: Vec3) {
        self.record(AudioCall::Position(username.to_string(), position));
    }

    fn update(&self) {
        self.ticks.fetch_add(1, Ordering::SeqCst);
    }
}

/// Headless app running the viewer core against fake collaborators.
pub struct TestHarness {
    pub app: App,
    pub tracker: FakeTracker,
    pub audio: RecordingAudio,
    pub text: Arc<FakeTextSource>,
}

impl TestHarness {
    pub fn new(tracker: FakeTracker) -> Self {
        Self::with_text(tracker, FakeTextSource::with_records(Vec::new()))
    }

    pub fn with_text(tracker: FakeTracker, text: FakeTextSource) -> Self {
        let audio = RecordingAudio::default();
        let text = Arc::new(text);

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, TransformPlugin))
            .insert_resource(ViewerSettings {
                restore_settle_secs: 0.0,
                ..default()
            })
            .insert_resource(Tracker::new(tracker.clone()))
            .insert_resource(AudioBackend::new(audio.clone()))
            .insert_resource(TextStore(Arc::new(TextStoreClient::new(text.clone()))))
            .add_plugins(AnnotationViewerPlugin);

        Self {
            app,
            tracker,
            audio,
            text,
        }
    }

    /// Viewer at eye height and a right controller pointing down -Z from (0, 1, 0)
    pub fn spawn_rig(&mut self) -> Entity {
        let world = self.app.world_mut();
        world.spawn((Viewer, Transform::from_xyz(0.0, 1.6, 0.0)));
        world
            .spawn((
                Controller { hand: Hand::Right },
                Transform::from_xyz(0.0, 1.0, 0.0).looking_to(Vec3::NEG_Z, Vec3::Y),
            ))
            .id()
    }

    /// Install a fresh primary anchor directly through the manager
    pub fn install_anchor(&mut self, id: &str, position: Vec3, recovered: bool) -> Entity {
        let record = AnchorRecord {
            id: AnchorId::from(id),
            pose: AnchorPose::new(position, Quat::IDENTITY),
            persistent: true,
        };
        self.app
            .world_mut()
            .run_system_once(move |mut manager: AnchorManager| {
                manager.set_primary(record.clone(), recovered)
            })
            .expect("anchor manager should run")
    }

    /// Start collecting every `M` written from now on
    pub fn collect<M: Message + Clone>(&mut self) {
        self.app
            .init_resource::<Collected<M>>()
            .add_systems(Last, collect_messages::<M>);
    }

    pub fn collected<M: Message + Clone>(&self) -> Vec<M> {
        self.app.world().resource::<Collected<M>>().0.clone()
    }
}

#[derive(Resource)]
pub struct Collected<M: Message>(pub Vec<M>);

impl<M: Message> Default for Collected<M> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

fn collect_messages<M: Message + Clone>(
    mut reader: MessageReader<M>,
    mut collected: ResMut<Collected<M>>,
) {
    collected.0.extend(reader.read().cloned());
}

/// Update the app until `done` holds, giving background tasks time to finish.
/// Returns false if it never did.
pub fn run_until(app: &mut App, mut done: impl FnMut(&mut World) -> bool) -> bool {
    for _ in 0..500 {
        app.update();
        if done(app.world_mut()) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    false
}
