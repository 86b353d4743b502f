use bevy::prelude::*;

pub const DEFAULT_CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 8.0);

/// Marks the camera used for picking, projection and the dive.
#[derive(Component, Debug, Clone, Copy)]
pub struct StageCamera {
    /// Position the camera returns to on a host reset.
    pub home: Vec3,
}

pub fn spawn_stage_camera(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Camera3d::default(),
            Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y),
            StageCamera { home: position },
        ))
        .id()
}

/// Move the camera to a new home, looking at the emblem origin.
pub fn place_stage_camera(transform: &mut Transform, stage_camera: &mut StageCamera, position: Vec3) {
    stage_camera.home = position;
    *transform = Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y);
}

/// Ray from the camera through a cursor position in logical viewport pixels.
pub fn cursor_ray(camera: &Camera, camera_transform: &GlobalTransform, cursor: Vec2) -> Option<Ray3d> {
    camera.viewport_to_world(camera_transform, cursor).ok()
}

/// World-space point to normalised device coordinates, `None` behind the camera.
pub fn project_to_ndc(clip_from_world: Mat4, world_position: Vec3) -> Option<Vec3> {
    let clip = clip_from_world * world_position.extend(1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    Some(clip.truncate() / clip.w)
}

pub fn clip_from_world(camera: &Camera, camera_transform: &GlobalTransform) -> Mat4 {
    camera.clip_from_view() * camera_transform.compute_matrix().inverse()
}
