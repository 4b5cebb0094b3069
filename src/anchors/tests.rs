use bevy::prelude::*;

use super::*;
use crate::collaborators::{AnchorId, AnchorPose, Hand};
use crate::constants::{NEW_ANCHOR_COLOR, RECOVERED_ANCHOR_COLOR};
use crate::interaction::SqueezeGesture;
use crate::test_support::{FakeTracker, TestHarness, run_until};

fn anchor_ids(world: &mut World) -> Vec<AnchorId> {
    world
        .query::<&Anchor>()
        .iter(world)
        .map(|anchor| anchor.id.clone())
        .collect()
}

fn markers(world: &mut World) -> Vec<AnchorMarker> {
    world.query::<&AnchorMarker>().iter(world).copied().collect()
}

#[test]
fn test_request_creation_overwrites_pending() {
    let mut lifecycle = AnchorLifecycle::default();
    let first = AnchorPose::on_floor(Vec3::new(1.0, 1.6, 0.0));
    let second = AnchorPose::on_floor(Vec3::new(-2.0, 1.6, 3.0));

    assert!(!lifecycle.request_creation(first));
    assert!(lifecycle.request_creation(second));
    assert_eq!(lifecycle.pending().map(|p| p.pose), Some(second));
}

#[test]
fn test_two_requests_before_tick_create_one_anchor() {
    let mut harness = TestHarness::new(FakeTracker::default());
    let second = AnchorPose::on_floor(Vec3::new(4.0, 1.0, 4.0));
    {
        let mut lifecycle = harness.app.world_mut().resource_mut::<AnchorLifecycle>();
        lifecycle.request_creation(AnchorPose::on_floor(Vec3::ZERO));
        lifecycle.request_creation(second);
    }

    assert!(run_until(&mut harness.app, |world| {
        world.resource::<AnchorLifecycle>().primary().is_some()
    }));
    for _ in 0..3 {
        harness.app.update();
    }

    assert_eq!(harness.tracker.create_calls(), vec![second]);
    assert!(harness.app.world().resource::<AnchorLifecycle>().pending().is_none());
}

#[test]
fn test_set_primary_replaces_previous_anchor() {
    let mut harness = TestHarness::new(FakeTracker::default());

    let first = harness.install_anchor("first", Vec3::ZERO, false);
    let second = harness.install_anchor("second", Vec3::X, false);
    assert_ne!(first, second);

    let world = harness.app.world_mut();
    assert!(world.get_entity(first).is_err());
    assert_eq!(anchor_ids(world), vec![AnchorId::from("second")]);
    assert_eq!(markers(world), vec![AnchorMarker { color: NEW_ANCHOR_COLOR }]);

    let primary = world.resource::<AnchorLifecycle>().primary().cloned().unwrap();
    assert_eq!(primary.entity, second);
    assert!(!primary.recovered);
}

#[test]
fn test_marker_color_follows_latest_install() {
    let mut harness = TestHarness::new(FakeTracker::default());

    harness.install_anchor("new", Vec3::ZERO, false);
    harness.install_anchor("old", Vec3::ZERO, true);
    assert_eq!(
        markers(harness.app.world_mut()),
        vec![AnchorMarker { color: RECOVERED_ANCHOR_COLOR }]
    );

    harness.install_anchor("newer", Vec3::ZERO, false);
    assert_eq!(
        markers(harness.app.world_mut()),
        vec![AnchorMarker { color: NEW_ANCHOR_COLOR }]
    );
}

#[test]
fn test_replacing_primary_despawns_its_annotations() {
    let mut harness = TestHarness::new(FakeTracker::default());
    let first = harness.install_anchor("first", Vec3::ZERO, false);
    let note = harness
        .app
        .world_mut()
        .spawn((Transform::from_xyz(0.0, 1.0, 0.0), ChildOf(first)))
        .id();

    harness.install_anchor("second", Vec3::ZERO, false);

    assert!(harness.app.world().get_entity(note).is_err());
}

#[test]
fn test_install_announces_anchor() {
    let mut harness = TestHarness::new(FakeTracker::default());
    harness.collect::<AnchorInstalled>();

    let entity = harness.install_anchor("a", Vec3::ZERO, true);
    harness.app.update();

    let installed = harness.collected::<AnchorInstalled>();
    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].anchor, entity);
    assert_eq!(installed[0].id, AnchorId::from("a"));
    assert!(installed[0].recovered);
}

#[test]
fn test_squeeze_clears_anchors_and_requests_one_below_viewer() {
    let tracker = FakeTracker::default();
    tracker.persist("a", Vec3::new(1.0, 0.0, 0.0));
    tracker.persist("b", Vec3::new(2.0, 0.0, 0.0));
    let mut harness = TestHarness::new(tracker);
    harness
        .app
        .world_mut()
        .spawn((crate::interaction::Viewer, Transform::from_xyz(1.0, 1.6, 2.0)));
    harness.app.update();

    harness
        .app
        .world_mut()
        .write_message(SqueezeGesture { hand: Hand::Left });

    assert!(run_until(&mut harness.app, |world| {
        world.resource::<AnchorLifecycle>().primary().is_some()
    }));

    assert_eq!(
        harness.tracker.delete_calls(),
        vec![AnchorId::from("a"), AnchorId::from("b")]
    );
    let creates = harness.tracker.create_calls();
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].translation, Vec3::new(1.0, 0.0, 2.0));
    assert_eq!(creates[0].rotation, Quat::IDENTITY);
    // Only the replacement remains persisted
    assert_eq!(harness.tracker.persistent_count(), 1);

    let world = harness.app.world_mut();
    let primary = world.resource::<AnchorLifecycle>().primary().cloned().unwrap();
    assert!(!primary.recovered);
    assert_eq!(markers(world), vec![AnchorMarker { color: NEW_ANCHOR_COLOR }]);
}

#[test]
fn test_delete_stops_at_first_failure() {
    let tracker = FakeTracker::default();
    tracker.persist("a", Vec3::ZERO);
    tracker.persist("b", Vec3::ZERO);
    tracker.persist("c", Vec3::ZERO);
    tracker.fail_delete_of("b");

    let result = delete_all_persistent_anchors(&tracker);

    assert!(matches!(result, Err(crate::error::TrackingError::Delete { .. })));
    assert_eq!(
        tracker.delete_calls(),
        vec![AnchorId::from("a"), AnchorId::from("b")]
    );
    assert_eq!(tracker.persistent_count(), 2);
}

#[test]
fn test_delete_with_nothing_persisted() {
    let tracker = FakeTracker::default();
    assert_eq!(delete_all_persistent_anchors(&tracker), Ok(0));
    assert!(tracker.delete_calls().is_empty());
}

#[test]
fn test_failed_delete_requests_no_anchor() {
    let tracker = FakeTracker::default();
    tracker.persist("a", Vec3::ZERO);
    tracker.fail_delete_of("a");
    let mut harness = TestHarness::new(tracker);
    harness.collect::<AnchorOperationFailed>();

    harness
        .app
        .world_mut()
        .write_message(SqueezeGesture { hand: Hand::Right });

    assert!(run_until(&mut harness.app, |world| {
        !world
            .resource::<crate::test_support::Collected<AnchorOperationFailed>>()
            .0
            .is_empty()
    }));
    harness.app.update();

    let failures = harness.collected::<AnchorOperationFailed>();
    assert_eq!(failures[0].operation, AnchorOperation::Delete);
    assert!(harness.tracker.create_calls().is_empty());
    assert!(harness.app.world().resource::<AnchorLifecycle>().primary().is_none());
}

#[test]
fn test_failed_create_is_reported() {
    let tracker = FakeTracker::default();
    tracker.fail_create("no tracking");
    let mut harness = TestHarness::new(tracker);
    harness.collect::<AnchorOperationFailed>();
    harness
        .app
        .world_mut()
        .resource_mut::<AnchorLifecycle>()
        .request_creation(AnchorPose::on_floor(Vec3::ZERO));

    assert!(run_until(&mut harness.app, |world| {
        !world
            .resource::<crate::test_support::Collected<AnchorOperationFailed>>()
            .0
            .is_empty()
    }));

    let failures = harness.collected::<AnchorOperationFailed>();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].operation, AnchorOperation::Create);
    assert!(harness.app.world().resource::<AnchorLifecycle>().primary().is_none());
}

#[test]
fn test_clear_request_does_not_create_anchor() {
    let tracker = FakeTracker::default();
    tracker.persist("a", Vec3::ZERO);
    let mut harness = TestHarness::new(tracker.clone());

    harness.app.world_mut().write_message(ClearAnchorsRequest);

    assert!(run_until(&mut harness.app, |world| {
        tracker.persistent_count() == 0 && world.query::<&ClearAnchorsTask>().iter(world).count() == 0
    }));
    for _ in 0..3 {
        harness.app.update();
    }

    assert!(tracker.create_calls().is_empty());
    assert!(harness.app.world().resource::<AnchorLifecycle>().pending().is_none());
    assert!(harness.app.world().resource::<AnchorLifecycle>().primary().is_none());
}

#[test]
fn test_clear_requests_collapse_into_one() {
    let mut lifecycle = AnchorLifecycle::default();
    assert_eq!(lifecycle.queued_clear(), None);

    lifecycle.request_clear(AfterClear::Nothing);
    lifecycle.request_clear(AfterClear::RequestAnchorAtViewer);
    lifecycle.request_clear(AfterClear::Nothing);

    assert_eq!(
        lifecycle.queued_clear(),
        Some(AfterClear::RequestAnchorAtViewer)
    );
}

#[test]
fn test_clear_removes_primary_anchor() {
    let tracker = FakeTracker::default();
    tracker.persist("a", Vec3::ZERO);
    let mut harness = TestHarness::new(tracker.clone());
    let anchor = harness.install_anchor("a", Vec3::ZERO, true);

    harness.app.world_mut().write_message(ClearAnchorsRequest);

    assert!(run_until(&mut harness.app, |world| {
        world.resource::<AnchorLifecycle>().primary().is_none()
    }));
    harness.app.update();

    let world = harness.app.world_mut();
    assert!(world.get_entity(anchor).is_err());
    assert!(anchor_ids(world).is_empty());
    assert!(markers(world).is_empty());
    assert_eq!(tracker.persistent_count(), 0);
    assert!(tracker.create_calls().is_empty());
}

#[test]
fn test_failed_clear_keeps_primary_anchor() {
    let tracker = FakeTracker::default();
    tracker.persist("a", Vec3::ZERO);
    tracker.fail_delete_of("a");
    let mut harness = TestHarness::new(tracker);
    harness.collect::<AnchorOperationFailed>();
    let anchor = harness.install_anchor("a", Vec3::ZERO, true);

    harness.app.world_mut().write_message(ClearAnchorsRequest);

    assert!(run_until(&mut harness.app, |world| {
        !world
            .resource::<crate::test_support::Collected<AnchorOperationFailed>>()
            .0
            .is_empty()
    }));

    let primary = harness
        .app
        .world()
        .resource::<AnchorLifecycle>()
        .primary()
        .cloned()
        .unwrap();
    assert_eq!(primary.entity, anchor);
}

#[test]
fn test_gestures_in_one_frame_run_a_single_deletion() {
    let tracker = FakeTracker::default();
    tracker.persist("a", Vec3::ZERO);
    tracker.persist("b", Vec3::ZERO);
    let mut harness = TestHarness::new(tracker.clone());
    harness.collect::<AnchorOperationFailed>();
    harness
        .app
        .world_mut()
        .spawn((crate::interaction::Viewer, Transform::from_xyz(0.0, 1.6, 0.0)));
    harness.app.update();

    let world = harness.app.world_mut();
    world.write_message(SqueezeGesture { hand: Hand::Left });
    world.write_message(SqueezeGesture { hand: Hand::Right });
    world.write_message(ClearAnchorsRequest);
    harness.app.update();

    let world = harness.app.world_mut();
    assert_eq!(world.query::<&ClearAnchorsTask>().iter(world).count(), 1);
    assert_eq!(world.resource::<AnchorLifecycle>().queued_clear(), None);

    assert!(run_until(&mut harness.app, |world| {
        world.resource::<AnchorLifecycle>().primary().is_some()
    }));
    for _ in 0..3 {
        harness.app.update();
    }

    assert_eq!(
        tracker.delete_calls(),
        vec![AnchorId::from("a"), AnchorId::from("b")]
    );
    assert_eq!(tracker.create_calls().len(), 1);
    assert_eq!(tracker.persistent_count(), 1);
    assert!(harness.collected::<AnchorOperationFailed>().is_empty());
}
