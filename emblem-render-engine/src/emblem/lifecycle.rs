use super::dive::DiveOrigin;
use super::events::UnmountEmblem;
use super::fragment::{DebrisFragment, EmblemRoot, Fragment, NavigationFragment};
use super::hover::HoverTracker;
use super::materials::EmissiveState;
use super::picking::{AssembledVolume, CollisionVolume};
use crate::animation::registry::AnimationRegistry;
use crate::engine::core::app_state::AppState;
use bevy::prelude::*;

/// Cancel every registered animation and forget per-session interaction
/// state. Returns the number of animations cancelled.
pub fn release_session(
    registry: &mut AnimationRegistry,
    tracker: &mut HoverTracker,
    dive_origin: &mut DiveOrigin,
) -> usize {
    tracker.current = None;
    dive_origin.fragment = None;
    registry.cancel_all()
}

/// Host teardown. Meshes stay owned by the scene; only this crate's
/// components are stripped.
pub fn handle_unmount(
    mut commands: Commands,
    mut requests: EventReader<UnmountEmblem>,
    mut registry: ResMut<AnimationRegistry>,
    mut tracker: ResMut<HoverTracker>,
    mut dive_origin: ResMut<DiveOrigin>,
    fragments: Query<Entity, With<Fragment>>,
    roots: Query<Entity, With<EmblemRoot>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if requests.read().count() == 0 {
        return;
    }

    let cancelled = release_session(&mut registry, &mut tracker, &mut dive_origin);

    for entity in &fragments {
        commands.entity(entity).remove::<(
            Fragment,
            NavigationFragment,
            DebrisFragment,
            CollisionVolume,
            EmissiveState,
        )>();
    }
    for entity in &roots {
        commands
            .entity(entity)
            .remove::<(CollisionVolume, AssembledVolume)>();
    }

    info!(
        "→ Transitioning to Unmounted state ({} animations cancelled)",
        cancelled
    );
    next_state.set(AppState::Unmounted);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::registry::AnimationTag;
    use crate::animation::timeline::{Completion, Delay};
    use crate::animation::tween::{Tween, TweenTrack};
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn release_cancels_everything_in_flight() {
        let mut registry = AnimationRegistry::default();
        registry.spawn_tagged(
            AnimationTag::Decomposition,
            Delay::new(4.0, Completion::DecompositionSettled),
        );
        registry.spawn(Tween::new(TweenTrack::CanvasOpacity { from: 1.0, to: 0.0 }, 1.0));
        let mut tracker = HoverTracker {
            current: Some(Entity::from_raw(5)),
        };
        let mut origin = DiveOrigin {
            fragment: Some((Entity::from_raw(5), Vec3::ONE)),
        };

        assert_eq!(release_session(&mut registry, &mut tracker, &mut origin), 2);
        assert!(registry.is_empty());
        assert!(tracker.current.is_none());
        assert!(origin.fragment.is_none());
        assert!(registry.advance(10.0).completions.is_empty());
    }

    #[test]
    fn unmount_strips_fragment_components() {
        let mut world = World::new();
        world.init_resource::<AnimationRegistry>();
        world.init_resource::<HoverTracker>();
        world.init_resource::<DiveOrigin>();
        world.init_resource::<NextState<AppState>>();
        world.init_resource::<Events<UnmountEmblem>>();

        let fragment = world
            .spawn((
                Fragment {
                    index: 0,
                    name: "shard".into(),
                    original: Transform::IDENTITY,
                },
                DebrisFragment::default(),
                EmissiveState::new(LinearRgba::WHITE, 0.1),
            ))
            .id();
        world
            .resource_mut::<AnimationRegistry>()
            .spawn(Delay::new(1.0, Completion::DecompositionSettled));
        world.send_event(UnmountEmblem);

        world.run_system_once(handle_unmount).unwrap();

        assert!(world.resource::<AnimationRegistry>().is_empty());
        assert!(world.get::<Fragment>(fragment).is_none());
        assert!(world.get::<EmissiveState>(fragment).is_none());
        assert!(matches!(
            *world.resource::<NextState<AppState>>(),
            NextState::Pending(AppState::Unmounted)
        ));
    }
}
