use crate::engine::camera::stage_camera::{StageCamera, cursor_ray};
use crate::engine::canvas::CanvasRect;
use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Invisible box in the owner's local space used for pointer picking.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CollisionVolume {
    pub centre: Vec3,
    pub half_extents: Vec3,
}

impl CollisionVolume {
    pub fn from_bounds(min: Vec3, max: Vec3) -> Self {
        Self {
            centre: (min + max) * 0.5,
            half_extents: (max - min) * 0.5,
        }
    }

    pub fn inflated(self, factor: f32) -> Self {
        Self {
            centre: self.centre,
            half_extents: self.half_extents * factor,
        }
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let c = self.centre;
        let h = self.half_extents;
        [
            c + Vec3::new(-h.x, -h.y, -h.z),
            c + Vec3::new(h.x, -h.y, -h.z),
            c + Vec3::new(-h.x, h.y, -h.z),
            c + Vec3::new(h.x, h.y, -h.z),
            c + Vec3::new(-h.x, -h.y, h.z),
            c + Vec3::new(h.x, -h.y, h.z),
            c + Vec3::new(-h.x, h.y, h.z),
            c + Vec3::new(h.x, h.y, h.z),
        ]
    }
}

/// Marks the emblem root's whole-model volume, pickable only while assembled.
#[derive(Component)]
pub struct AssembledVolume;

/// Pointer sampled once per frame, shared by every interaction system.
#[derive(Resource, Debug, Clone, Default)]
pub struct PointerState {
    /// Logical pixels relative to the canvas.
    pub cursor: Option<Vec2>,
    /// [-1, 1] on both axes, +Y up.
    pub normalised: Vec2,
    pub ray: Option<Ray3d>,
    pub just_pressed: bool,
}

pub fn update_pointer_state(
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    cameras: Query<(&Camera, &GlobalTransform), With<StageCamera>>,
    canvas_rect: Res<CanvasRect>,
    mut pointer: ResMut<PointerState>,
) {
    let cursor = windows
        .single()
        .ok()
        .and_then(|w| w.cursor_position())
        .or_else(|| touches.first_pressed_position());

    pointer.cursor = cursor;
    pointer.just_pressed =
        mouse_button.just_pressed(MouseButton::Left) || touches.any_just_pressed();

    if let Some(cursor) = cursor {
        pointer.normalised = canvas_rect.normalise_pointer(cursor);
    }

    pointer.ray = match (cursor, cameras.single()) {
        (Some(cursor), Ok((camera, camera_transform))) => {
            cursor_ray(camera, camera_transform, cursor)
        }
        _ => None,
    };
}

/// Nearest volume hit by the ray, with its ray parameter.
pub fn nearest_hit<'a>(
    ray: Ray3d,
    candidates: impl IntoIterator<Item = (Entity, &'a GlobalTransform, &'a CollisionVolume)>,
) -> Option<(Entity, f32)> {
    let origin = ray.origin;
    let direction = ray.direction.as_vec3();

    let mut best: Option<(Entity, f32)> = None;
    for (entity, transform, volume) in candidates {
        if let Some(t) = ray_hits_volume(origin, direction, transform, volume) {
            if best.is_none_or(|(_, best_t)| t < best_t) {
                best = Some((entity, t));
            }
        }
    }
    best
}

pub fn ray_hits_volume(
    origin: Vec3,
    direction: Vec3,
    transform: &GlobalTransform,
    volume: &CollisionVolume,
) -> Option<f32> {
    let inv = transform.compute_matrix().inverse();
    let o_local = inv.transform_point3(origin);
    let d_local = inv.transform_vector3(direction);
    ray_aabb_hit_t(
        o_local,
        d_local,
        volume.centre - volume.half_extents,
        volume.centre + volume.half_extents,
    )
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = Vec3::new(
        if ray_direction.x != 0.0 { 1.0 / ray_direction.x } else { f32::INFINITY },
        if ray_direction.y != 0.0 { 1.0 / ray_direction.y } else { f32::INFINITY },
        if ray_direction.z != 0.0 { 1.0 / ray_direction.z } else { f32::INFINITY },
    );

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let (near, far) = slab(ray_origin[axis], inv[axis], min[axis], max[axis])?;
        t_min = t_min.max(near);
        t_max = t_max.min(far);
        if t_min > t_max {
            return None;
        }
    }

    if t_max < 0.0 {
        return None;
    }
    Some(if t_min >= 0.0 { t_min } else { t_max })
}

// Entry and exit along one axis; a parallel ray outside the slab misses.
fn slab(origin: f32, inv_direction: f32, min: f32, max: f32) -> Option<(f32, f32)> {
    if inv_direction.is_infinite() {
        return (origin >= min && origin <= max).then_some((f32::NEG_INFINITY, f32::INFINITY));
    }
    let a = (min - origin) * inv_direction;
    let b = (max - origin) * inv_direction;
    Some(if a <= b { (a, b) } else { (b, a) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_volume() -> CollisionVolume {
        CollisionVolume {
            centre: Vec3::ZERO,
            half_extents: Vec3::splat(0.5),
        }
    }

    #[test]
    fn ray_hits_front_face() {
        let t = ray_aabb_hit_t(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, Vec3::splat(-0.5), Vec3::splat(0.5));
        assert_eq!(t, Some(4.5));
    }

    #[test]
    fn parallel_ray_outside_slab_misses() {
        let t = ray_aabb_hit_t(Vec3::new(2.0, 0.0, 5.0), Vec3::NEG_Z, Vec3::splat(-0.5), Vec3::splat(0.5));
        assert_eq!(t, None);
    }

    #[test]
    fn box_behind_ray_misses() {
        let t = ray_aabb_hit_t(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, Vec3::splat(-0.5), Vec3::splat(0.5));
        assert_eq!(t, None);
    }

    #[test]
    fn inflated_volume_catches_near_miss() {
        let transform = GlobalTransform::from_translation(Vec3::ZERO);
        let origin = Vec3::new(0.6, 0.0, 5.0);

        assert!(ray_hits_volume(origin, Vec3::NEG_Z, &transform, &unit_volume()).is_none());
        assert!(
            ray_hits_volume(origin, Vec3::NEG_Z, &transform, &unit_volume().inflated(1.5)).is_some()
        );
    }

    #[test]
    fn nearest_volume_wins() {
        let near = GlobalTransform::from_translation(Vec3::new(0.0, 0.0, 1.0));
        let far = GlobalTransform::from_translation(Vec3::new(0.0, 0.0, -2.0));
        let volume = unit_volume();
        let ray = Ray3d::new(Vec3::new(0.0, 0.0, 10.0), Dir3::NEG_Z);

        let hit = nearest_hit(
            ray,
            [
                (Entity::from_raw(1), &far, &volume),
                (Entity::from_raw(2), &near, &volume),
            ],
        );
        assert_eq!(hit.map(|(e, _)| e), Some(Entity::from_raw(2)));
    }

    #[test]
    fn bounds_round_trip_through_corners() {
        let volume = CollisionVolume::from_bounds(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 4.0, 3.0));
        let corners = volume.corners();
        let min = corners.iter().copied().fold(Vec3::INFINITY, Vec3::min);
        let max = corners.iter().copied().fold(Vec3::NEG_INFINITY, Vec3::max);
        assert_eq!(min, Vec3::new(-1.0, 0.0, 2.0));
        assert_eq!(max, Vec3::new(1.0, 4.0, 3.0));
    }
}
