use super::decomposition::EmblemController;
use super::events::{NavigateToSection, NavigationClicked, NavigationHovered, ResetClickTransition};
use super::fragment::NavigationFragment;
use super::hover::HoverTracker;
use super::picking::{CollisionVolume, PointerState, nearest_hit};
use crate::animation::AnimationCompleted;
use crate::animation::registry::{AnimationRegistry, AnimationTag};
use crate::animation::timeline::{Completion, Timeline};
use crate::animation::tween::{Tween, TweenTrack};
use crate::engine::camera::stage_camera::StageCamera;
use crate::engine::canvas::CanvasOpacity;
use bevy::math::curve::EaseFunction;
use bevy::prelude::*;
use constants::dive::*;

/// Camera position a fixed distance short of the fragment, on the line
/// between the two.
pub fn dive_camera_target(camera: Vec3, fragment: Vec3) -> Vec3 {
    let offset = camera - fragment;
    let distance = offset.length();
    if distance <= DIVE_STOP_DISTANCE {
        return camera;
    }
    fragment + offset / distance * DIVE_STOP_DISTANCE
}

/// Everything the dive timeline captures at click time.
#[derive(Debug, Clone)]
pub struct DiveRequest {
    pub section_id: String,
    pub fragment: Entity,
    pub fragment_world: Vec3,
    pub fragment_scale: Vec3,
    pub camera: Entity,
    pub camera_transform: Transform,
    pub canvas_opacity: f32,
}

pub fn build_dive_timeline(request: &DiveRequest) -> Timeline {
    let from = request.camera_transform;
    let target = dive_camera_target(from.translation, request.fragment_world);
    let facing = from.looking_at(request.fragment_world, Vec3::Y).rotation;

    Timeline::new()
        .push(
            0.0,
            Tween::new(
                TweenTrack::Translation {
                    entity: request.camera,
                    from: from.translation,
                    to: target,
                },
                DIVE_CAMERA_DURATION,
            )
            .with_ease(EaseFunction::CubicInOut),
        )
        .push(
            0.0,
            Tween::new(
                TweenTrack::Rotation {
                    entity: request.camera,
                    from: from.rotation,
                    to: facing,
                },
                DIVE_CAMERA_DURATION,
            )
            .with_ease(EaseFunction::CubicInOut),
        )
        .push(
            DIVE_SCALE_OFFSET,
            Tween::new(
                TweenTrack::Scale {
                    entity: request.fragment,
                    from: request.fragment_scale,
                    to: request.fragment_scale * DIVE_SCALE_FACTOR,
                },
                DIVE_SCALE_DURATION,
            )
            .with_ease(EaseFunction::CubicIn),
        )
        .push(
            DIVE_FADE_OFFSET,
            Tween::new(
                TweenTrack::CanvasOpacity {
                    from: request.canvas_opacity,
                    to: 0.0,
                },
                DIVE_FADE_DURATION,
            ),
        )
        .on_complete(Completion::NavigationDive {
            section_id: request.section_id.clone(),
        })
}

/// Start the dive unless one is already running or the emblem is not yet
/// decomposed. The fragment's hover tweens are dropped so the dive owns its
/// scale.
pub fn start_dive(
    controller: &mut EmblemController,
    registry: &mut AnimationRegistry,
    request: &DiveRequest,
) -> bool {
    if !controller.try_begin_click_transition() {
        debug!("Dive to '{}' ignored", request.section_id);
        return false;
    }

    registry.cancel_tagged(AnimationTag::Hover(request.fragment));
    info!("Camera dive → {}", request.section_id);
    registry.spawn_tagged(AnimationTag::Dive, build_dive_timeline(request));
    true
}

/// Pre-dive state of the clicked fragment, restored by a host reset.
#[derive(Resource, Debug, Default)]
pub struct DiveOrigin {
    pub fragment: Option<(Entity, Vec3)>,
}

pub fn find_section_fragment<'a>(
    section_id: &str,
    fragments: impl IntoIterator<Item = (Entity, &'a NavigationFragment)>,
) -> Option<Entity> {
    fragments
        .into_iter()
        .find(|(_, nav)| nav.section_id == section_id)
        .map(|(entity, _)| entity)
}

/// Pointer clicks on navigation fragments and host `navigate_to_section`
/// requests both start the same dive. Any hover ends when the dive starts.
pub fn handle_navigation_clicks(
    pointer: Res<PointerState>,
    mut requests: EventReader<NavigateToSection>,
    mut controller: ResMut<EmblemController>,
    mut registry: ResMut<AnimationRegistry>,
    mut dive_origin: ResMut<DiveOrigin>,
    mut tracker: ResMut<HoverTracker>,
    canvas_opacity: Res<CanvasOpacity>,
    cameras: Query<(Entity, &Transform), With<StageCamera>>,
    mut fragments: Query<(
        Entity,
        &GlobalTransform,
        &CollisionVolume,
        &Transform,
        &mut NavigationFragment,
    )>,
    mut hovered: EventWriter<NavigationHovered>,
) {
    let mut targets: Vec<Entity> = Vec::new();

    for request in requests.read() {
        match find_section_fragment(
            &request.section_id,
            fragments.iter().map(|(entity, .., nav)| (entity, nav)),
        ) {
            Some(entity) => targets.push(entity),
            None => debug!("No navigation fragment for section '{}'", request.section_id),
        }
    }

    if pointer.just_pressed && controller.accepts_click() {
        let hit = pointer.ray.and_then(|ray| {
            nearest_hit(
                ray,
                fragments
                    .iter()
                    .map(|(entity, global, volume, ..)| (entity, global, volume)),
            )
        });
        if let Some((entity, _)) = hit {
            targets.push(entity);
        }
    }

    if targets.is_empty() {
        return;
    }
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    for target in targets {
        let Ok((fragment, global, _, transform, nav)) = fragments.get(target) else {
            continue;
        };
        let request = DiveRequest {
            section_id: nav.section_id.to_string(),
            fragment,
            fragment_world: global.translation(),
            fragment_scale: transform.scale,
            camera,
            camera_transform: *camera_transform,
            canvas_opacity: canvas_opacity.0,
        };
        if !start_dive(&mut controller, &mut registry, &request) {
            continue;
        }
        dive_origin.fragment = Some((fragment, request.fragment_scale));

        if let Some(previous) = tracker.current.take() {
            registry.cancel_tagged(AnimationTag::Hover(previous));
            if let Ok((.., mut nav)) = fragments.get_mut(previous) {
                nav.hovered = false;
            }
            hovered.write(NavigationHovered(None));
        }
    }
}

/// Report the finished dive. The click-transition flag stays set.
pub fn finish_navigation_dive(
    mut completed: EventReader<AnimationCompleted>,
    mut clicked: EventWriter<NavigationClicked>,
) {
    for AnimationCompleted(completion) in completed.read() {
        if let Completion::NavigationDive { section_id } = completion {
            info!("✓ Dive complete, navigating to {}", section_id);
            clicked.write(NavigationClicked {
                section_id: section_id.clone(),
            });
        }
    }
}

/// Host-side reset after its page transition: clear the flag and put the
/// camera, canvas and clicked fragment back.
pub fn handle_click_transition_reset(
    mut resets: EventReader<ResetClickTransition>,
    mut controller: ResMut<EmblemController>,
    mut registry: ResMut<AnimationRegistry>,
    mut dive_origin: ResMut<DiveOrigin>,
    mut canvas_opacity: ResMut<CanvasOpacity>,
    mut cameras: Query<(&mut Transform, &StageCamera)>,
    mut fragments: Query<&mut Transform, (With<NavigationFragment>, Without<StageCamera>)>,
) {
    if resets.read().count() == 0 {
        return;
    }
    if !controller.reset_click_transition() {
        return;
    }

    registry.cancel_tagged(AnimationTag::Dive);
    canvas_opacity.0 = 1.0;

    for (mut transform, stage_camera) in &mut cameras {
        *transform = Transform::from_translation(stage_camera.home).looking_at(Vec3::ZERO, Vec3::Y);
    }
    if let Some((entity, scale)) = dive_origin.fragment.take() {
        if let Ok(mut transform) = fragments.get_mut(entity) {
            transform.scale = scale;
        }
    }

    info!("Click transition reset");
}

/// Native stand-in for the host page: 1-4 dive into a slot, Escape resets.
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_dive_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut navigate: EventWriter<NavigateToSection>,
    mut reset: EventWriter<ResetClickTransition>,
) {
    use constants::sections::slot;

    const SLOT_KEYS: [KeyCode; 4] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
    ];

    for (index, key) in SLOT_KEYS.iter().enumerate() {
        if keyboard.just_pressed(*key) {
            if let Some(section) = slot(index) {
                navigate.write(NavigateToSection {
                    section_id: section.section_id.to_string(),
                });
            }
        }
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        reset.write(ResetClickTransition);
    }
}
