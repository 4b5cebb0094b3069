//! Ray intersection against hit volumes.

use bevy::prelude::*;

/// Ray-castable bounding sphere centered on the entity's origin.
///
/// The radius is in local units and scales with the entity's largest world scale axis.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HitVolume {
    pub radius: f32,
}

impl HitVolume {
    pub fn sphere(radius: f32) -> Self {
        Self { radius }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub distance: f32,
}

/// Distance along the ray to the first intersection with a sphere, if any.
///
/// `direction` must be normalized. A ray starting inside the sphere hits at 0.
pub fn ray_sphere_distance(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - origin;
    let along = to_center.dot(direction);
    let closest_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;

    if closest_sq > radius_sq {
        return None;
    }

    let half_chord = (radius_sq - closest_sq).sqrt();
    let near = along - half_chord;
    let far = along + half_chord;

    if far < 0.0 {
        // Sphere is behind the ray
        return None;
    }

    Some(near.max(0.0))
}

/// Intersect the ray with every candidate and return the hits nearest first
pub fn cast_ray(
    origin: Vec3,
    direction: Dir3,
    candidates: impl IntoIterator<Item = (Entity, GlobalTransform, HitVolume)>,
) -> Vec<RayHit> {
    let mut hits: Vec<RayHit> = candidates
        .into_iter()
        .filter_map(|(entity, transform, volume)| {
            let (scale, _, center) = transform.to_scale_rotation_translation();
            let radius = volume.radius * scale.abs().max_element();
            ray_sphere_distance(origin, *direction, center, radius)
                .map(|distance| RayHit { entity, distance })
        })
        .collect();

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}
