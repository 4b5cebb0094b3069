//! Gizmo drawing for anchors, annotation objects and controller rays.

use bevy::gizmos::config::GizmoConfigGroup;
use bevy::prelude::*;

use crate::anchors::AnchorMarker;
use crate::annotations::{AnnotationObject, AnnotationState};
use crate::constants::{CONTROLLER_MARKER_RADIUS, CONTROLLER_RAY_LENGTH};
use crate::interaction::{ControllerLink, ControllerMarker, HitVolume};

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct ViewerGizmoGroup;

pub fn state_color(state: AnnotationState) -> Color {
    match state {
        AnnotationState::Idle => Color::srgb(0.6, 0.6, 0.6),
        AnnotationState::Complete => Color::srgb(0.2, 0.6, 1.0),
        AnnotationState::Playing => Color::srgb(1.0, 0.8, 0.1),
    }
}

pub fn draw_anchor_markers(
    mut gizmos: Gizmos<ViewerGizmoGroup>,
    markers: Query<(&GlobalTransform, &AnchorMarker, &HitVolume)>,
) {
    for (transform, marker, volume) in markers.iter() {
        gizmos.sphere(
            Isometry3d::from_translation(transform.translation()),
            volume.radius,
            marker.color,
        );
    }
}

pub fn draw_annotations(
    mut gizmos: Gizmos<ViewerGizmoGroup>,
    objects: Query<(&GlobalTransform, &AnnotationObject, &HitVolume)>,
) {
    for (transform, object, volume) in objects.iter() {
        gizmos.sphere(
            Isometry3d::from_translation(transform.translation()),
            volume.radius,
            state_color(object.state()),
        );
    }
}

/// Ray for every controller with a live hit-test target, plus its marker
pub fn draw_controller_rays(
    mut gizmos: Gizmos<ViewerGizmoGroup>,
    controllers: Query<(&GlobalTransform, &ControllerLink)>,
    markers: Query<&GlobalTransform, With<ControllerMarker>>,
) {
    for (transform, link) in controllers.iter() {
        if link.hit_test_target.is_none() {
            continue;
        }
        let origin = transform.translation();
        gizmos.line(
            origin,
            origin + transform.forward() * CONTROLLER_RAY_LENGTH,
            Color::srgba(1.0, 1.0, 1.0, 0.6),
        );

        if let Some(marker) = link.marker.and_then(|m| markers.get(m).ok()) {
            gizmos.sphere(
                Isometry3d::from_translation(marker.translation()),
                CONTROLLER_MARKER_RADIUS,
                Color::WHITE,
            );
        }
    }
}
