use super::decomposition::EmblemController;
use super::events::{HoverReport, NavigationHovered};
use super::fragment::{Fragment, NavigationFragment};
use super::materials::EmissiveState;
use super::picking::{CollisionVolume, PointerState, nearest_hit};
use crate::animation::registry::{AnimationRegistry, AnimationTag};
use crate::animation::tween::{Tween, TweenTrack};
use crate::engine::camera::stage_camera::{StageCamera, clip_from_world, project_to_ndc};
use crate::engine::canvas::CanvasRect;
use bevy::prelude::*;
use constants::choreography::{
    HOVER_DURATION, HOVER_EMISSIVE_INTENSITY, HOVER_HIGHLIGHT_COLOUR, HOVER_SCALE,
    IDLE_EMISSIVE_INTENSITY,
};

/// Navigation fragment currently under the pointer.
#[derive(Resource, Debug, Default)]
pub struct HoverTracker {
    pub current: Option<Entity>,
}

pub fn highlight_colour() -> LinearRgba {
    let [r, g, b] = HOVER_HIGHLIGHT_COLOUR;
    LinearRgba::rgb(r, g, b)
}

pub fn hover_in_tweens(
    entity: Entity,
    current: &Transform,
    original: &Transform,
    emissive: &EmissiveState,
) -> [Tween; 3] {
    [
        Tween::new(
            TweenTrack::Scale {
                entity,
                from: current.scale,
                to: original.scale * HOVER_SCALE,
            },
            HOVER_DURATION,
        ),
        Tween::new(
            TweenTrack::EmissiveColour {
                entity,
                from: emissive.colour,
                to: highlight_colour(),
            },
            HOVER_DURATION,
        ),
        Tween::new(
            TweenTrack::EmissiveIntensity {
                entity,
                from: emissive.intensity,
                to: HOVER_EMISSIVE_INTENSITY,
            },
            HOVER_DURATION,
        ),
    ]
}

/// Back to the decomposed idle baseline: original scale, the fragment's own
/// colour, a moderate glow.
pub fn hover_out_tweens(
    entity: Entity,
    current: &Transform,
    original: &Transform,
    emissive: &EmissiveState,
) -> [Tween; 3] {
    [
        Tween::new(
            TweenTrack::Scale {
                entity,
                from: current.scale,
                to: original.scale,
            },
            HOVER_DURATION,
        ),
        Tween::new(
            TweenTrack::EmissiveColour {
                entity,
                from: emissive.colour,
                to: emissive.base_colour,
            },
            HOVER_DURATION,
        ),
        Tween::new(
            TweenTrack::EmissiveIntensity {
                entity,
                from: emissive.intensity,
                to: IDLE_EMISSIVE_INTENSITY,
            },
            HOVER_DURATION,
        ),
    ]
}

/// Replace whatever hover animation the fragment has. Never queues.
pub fn start_hover(registry: &mut AnimationRegistry, entity: Entity, tweens: [Tween; 3]) {
    registry.cancel_tagged(AnimationTag::Hover(entity));
    for tween in tweens {
        registry.spawn_tagged(AnimationTag::Hover(entity), tween);
    }
}

/// Page pixel position of a world point, `None` when behind the camera.
pub fn screen_position(clip_from_world: Mat4, canvas_rect: &CanvasRect, world: Vec3) -> Option<Vec2> {
    project_to_ndc(clip_from_world, world).map(|ndc| canvas_rect.ndc_to_pixels(ndc.truncate()))
}

pub fn track_navigation_hover(
    pointer: Res<PointerState>,
    controller: Res<EmblemController>,
    canvas_rect: Res<CanvasRect>,
    mut tracker: ResMut<HoverTracker>,
    mut registry: ResMut<AnimationRegistry>,
    cameras: Query<(&Camera, &GlobalTransform), With<StageCamera>>,
    mut fragments: Query<(
        Entity,
        &GlobalTransform,
        &CollisionVolume,
        &Transform,
        &Fragment,
        &EmissiveState,
        &mut NavigationFragment,
    )>,
    mut hovered: EventWriter<NavigationHovered>,
) {
    if !controller.accepts_hover() {
        return;
    }

    let hit = pointer.ray.and_then(|ray| {
        nearest_hit(
            ray,
            fragments
                .iter()
                .map(|(entity, global, volume, ..)| (entity, global, volume)),
        )
    });
    let hit = hit.map(|(entity, _)| entity);

    if hit == tracker.current {
        return;
    }

    if let Some(previous) = tracker.current.take() {
        if let Ok((entity, _, _, transform, fragment, emissive, mut nav)) = fragments.get_mut(previous) {
            nav.hovered = false;
            start_hover(
                &mut registry,
                entity,
                hover_out_tweens(entity, transform, &fragment.original, emissive),
            );
        }
        hovered.write(NavigationHovered(None));
    }

    let Some(entered) = hit else {
        return;
    };
    let Ok((entity, global, _, transform, fragment, emissive, mut nav)) = fragments.get_mut(entered) else {
        return;
    };

    nav.hovered = true;
    start_hover(
        &mut registry,
        entity,
        hover_in_tweens(entity, transform, &fragment.original, emissive),
    );

    let position = cameras.single().ok().and_then(|(camera, camera_transform)| {
        screen_position(
            clip_from_world(camera, camera_transform),
            &canvas_rect,
            global.translation(),
        )
    });

    debug!("Hover enter: {} ({})", fragment.name, nav.label);
    hovered.write(NavigationHovered(Some(HoverReport {
        fragment_id: fragment.name.clone(),
        label: nav.label.to_string(),
        position,
    })));
    tracker.current = Some(entity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::tween::PropertyWrite;
    use bevy::ecs::system::RunSystemOnce;
    use constants::sections::SECTION_SLOTS;

    fn apply(writes: Vec<PropertyWrite>, transform: &mut Transform, emissive: &mut EmissiveState) {
        for write in writes {
            match write {
                PropertyWrite::Scale(_, value) => transform.scale = value,
                PropertyWrite::EmissiveColour(_, value) => emissive.colour = value,
                PropertyWrite::EmissiveIntensity(_, value) => emissive.intensity = value,
                other => panic!("unexpected hover write {other:?}"),
            }
        }
    }

    #[test]
    fn immediate_leave_returns_to_idle_baseline() {
        let entity = Entity::from_raw(4);
        let original = Transform::from_scale(Vec3::splat(0.8));
        let base = LinearRgba::rgb(0.6, 0.2, 0.1);
        let mut transform = original;
        let mut emissive = EmissiveState::new(base, IDLE_EMISSIVE_INTENSITY);
        let mut registry = AnimationRegistry::default();

        start_hover(&mut registry, entity, hover_in_tweens(entity, &transform, &original, &emissive));
        apply(registry.advance(0.05).writes, &mut transform, &mut emissive);
        assert!(transform.scale.x > original.scale.x);

        start_hover(&mut registry, entity, hover_out_tweens(entity, &transform, &original, &emissive));
        assert_eq!(registry.len(), 3);

        for _ in 0..30 {
            apply(registry.advance(0.016).writes, &mut transform, &mut emissive);
        }

        assert!(registry.is_empty());
        assert_eq!(transform.scale, original.scale);
        assert_eq!(emissive.colour, base);
        assert_eq!(emissive.intensity, IDLE_EMISSIVE_INTENSITY);
        assert!(emissive.intensity > 0.0);
    }

    #[test]
    fn new_hover_replaces_in_flight_tweens() {
        let entity = Entity::from_raw(9);
        let other = Entity::from_raw(10);
        let transform = Transform::IDENTITY;
        let emissive = EmissiveState::new(LinearRgba::WHITE, IDLE_EMISSIVE_INTENSITY);
        let mut registry = AnimationRegistry::default();

        start_hover(&mut registry, other, hover_in_tweens(other, &transform, &transform, &emissive));
        start_hover(&mut registry, entity, hover_in_tweens(entity, &transform, &transform, &emissive));
        start_hover(&mut registry, entity, hover_out_tweens(entity, &transform, &transform, &emissive));

        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn hover_reaches_highlight() {
        let entity = Entity::from_raw(2);
        let mut transform = Transform::IDENTITY;
        let mut emissive = EmissiveState::new(LinearRgba::BLACK, IDLE_EMISSIVE_INTENSITY);
        let mut registry = AnimationRegistry::default();

        start_hover(&mut registry, entity, hover_in_tweens(entity, &transform, &Transform::IDENTITY, &emissive));
        apply(registry.advance(HOVER_DURATION).writes, &mut transform, &mut emissive);

        assert_eq!(transform.scale, Vec3::splat(HOVER_SCALE));
        assert_eq!(emissive.colour, highlight_colour());
        assert_eq!(emissive.intensity, HOVER_EMISSIVE_INTENSITY);
    }

    #[test]
    fn projection_lands_in_canvas_pixels() {
        let projection = Mat4::perspective_infinite_reverse_rh(1.0, 1.0, 0.1);
        let view = Transform::from_xyz(0.0, 0.0, 5.0)
            .looking_at(Vec3::ZERO, Vec3::Y)
            .compute_matrix()
            .inverse();
        let rect = CanvasRect {
            left: 10.0,
            top: 20.0,
            width: 400.0,
            height: 300.0,
        };

        let centre = screen_position(projection * view, &rect, Vec3::ZERO).unwrap();
        assert!((centre - Vec2::new(210.0, 170.0)).length() < 1e-3);
        assert!(screen_position(projection * view, &rect, Vec3::new(0.0, 0.0, 9.0)).is_none());
    }

    fn hover_world() -> (World, Entity, Entity) {
        let mut world = World::new();
        let mut controller = EmblemController::default();
        controller.try_begin_decomposition();
        controller.finish_decomposition();
        world.insert_resource(controller);
        world.init_resource::<PointerState>();
        world.init_resource::<CanvasRect>();
        world.init_resource::<HoverTracker>();
        world.init_resource::<AnimationRegistry>();
        world.init_resource::<Events<NavigationHovered>>();

        let mut spawn = |slot: usize, name: &str, x: f32| {
            world
                .spawn((
                    Transform::from_xyz(x, 0.0, 0.0),
                    GlobalTransform::from_translation(Vec3::new(x, 0.0, 0.0)),
                    CollisionVolume {
                        centre: Vec3::ZERO,
                        half_extents: Vec3::splat(0.5),
                    },
                    Fragment {
                        index: slot,
                        name: name.into(),
                        original: Transform::from_xyz(x, 0.0, 0.0),
                    },
                    EmissiveState::new(LinearRgba::rgb(0.4, 0.4, 0.4), IDLE_EMISSIVE_INTENSITY),
                    NavigationFragment::from_slot(slot, &SECTION_SLOTS[slot]),
                ))
                .id()
        };
        let a = spawn(0, "shard_a", -2.0);
        let b = spawn(1, "shard_b", 2.0);
        (world, a, b)
    }

    fn point_at(world: &mut World, x: Option<f32>) {
        world.resource_mut::<PointerState>().ray =
            x.map(|x| Ray3d::new(Vec3::new(x, 0.0, 10.0), Dir3::NEG_Z));
        world.run_system_once(track_navigation_hover).unwrap();
    }

    fn hovered(world: &World, entity: Entity) -> bool {
        world.get::<NavigationFragment>(entity).unwrap().hovered
    }

    fn reports(world: &World) -> Vec<Option<String>> {
        world
            .resource::<Events<NavigationHovered>>()
            .iter_current_update_events()
            .map(|event| event.0.as_ref().map(|report| report.fragment_id.clone()))
            .collect()
    }

    #[test]
    fn enter_and_leave_toggle_hovered_flag() {
        let (mut world, a, _) = hover_world();

        point_at(&mut world, Some(-2.0));
        assert!(hovered(&world, a));
        assert_eq!(world.resource::<HoverTracker>().current, Some(a));

        point_at(&mut world, None);
        assert!(!hovered(&world, a));
        assert!(world.resource::<HoverTracker>().current.is_none());
        assert_eq!(reports(&world), vec![Some("shard_a".to_string()), None]);
    }

    #[test]
    fn moving_between_fragments_leaves_before_entering() {
        let (mut world, a, b) = hover_world();

        point_at(&mut world, Some(-2.0));
        point_at(&mut world, Some(2.0));

        assert!(!hovered(&world, a));
        assert!(hovered(&world, b));
        assert_eq!(
            reports(&world),
            vec![Some("shard_a".to_string()), None, Some("shard_b".to_string())]
        );

        let writes = world
            .resource_mut::<AnimationRegistry>()
            .advance(HOVER_DURATION)
            .writes;
        assert!(writes.contains(&PropertyWrite::Scale(a, Vec3::ONE)));
        assert!(writes.contains(&PropertyWrite::Scale(b, Vec3::splat(HOVER_SCALE))));
    }

    #[test]
    fn staying_on_a_fragment_reports_once() {
        let (mut world, _, _) = hover_world();

        point_at(&mut world, Some(-2.0));
        point_at(&mut world, Some(-2.1));

        assert_eq!(reports(&world), vec![Some("shard_a".to_string())]);
        assert_eq!(world.resource::<AnimationRegistry>().len(), 3);
    }

    #[test]
    fn assembled_emblem_ignores_hover() {
        let (mut world, a, _) = hover_world();
        world.insert_resource(EmblemController::default());

        point_at(&mut world, Some(-2.0));

        assert!(!hovered(&world, a));
        assert!(reports(&world).is_empty());
        assert!(world.resource::<AnimationRegistry>().is_empty());
    }
}
