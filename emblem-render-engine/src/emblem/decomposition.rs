use super::events::{DecompositionCompleted, DecompositionStarted};
use super::fragment::{DebrisFragment, EmblemRoot, Fragment, NavigationFragment};
use super::materials::EmissiveState;
use super::orbit::{OrbitState, generate_orbit};
use super::picking::{AssembledVolume, CollisionVolume, PointerState, ray_hits_volume};
use crate::animation::AnimationCompleted;
use crate::animation::registry::{AnimationRegistry, AnimationTag};
use crate::animation::timeline::{Completion, Delay};
use crate::animation::tween::{Tween, TweenTrack};
use crate::engine::core::mount_flags::MountFlags;
use bevy::prelude::*;
use constants::choreography::{
    DECOMPOSE_DURATION, EMISSIVE_RAMP_DURATION, EMISSIVE_RAMP_INTENSITY,
    REDUCED_MOTION_DECOMPOSE_DURATION,
};
use rand::Rng;
use serde::Serialize;
use std::f32::consts::TAU;

/// One-way lifecycle of the emblem. There is no path back to `Assembled`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecompositionPhase {
    #[default]
    Assembled,
    Decomposing,
    Decomposed,
}

/// Interaction state machine shared by decomposition, hover and the dive.
///
/// Every guard returns `false` instead of failing so re-entrant triggers
/// are silent no-ops.
#[derive(Resource, Debug, Default)]
pub struct EmblemController {
    phase: DecompositionPhase,
    click_transition_active: bool,
}

impl EmblemController {
    pub fn phase(&self) -> DecompositionPhase {
        self.phase
    }

    pub fn click_transition_active(&self) -> bool {
        self.click_transition_active
    }

    pub fn try_begin_decomposition(&mut self) -> bool {
        if self.phase != DecompositionPhase::Assembled {
            return false;
        }
        self.phase = DecompositionPhase::Decomposing;
        true
    }

    pub fn finish_decomposition(&mut self) -> bool {
        if self.phase != DecompositionPhase::Decomposing {
            return false;
        }
        self.phase = DecompositionPhase::Decomposed;
        true
    }

    /// Sets the dive flag. Only the host clears it again.
    pub fn try_begin_click_transition(&mut self) -> bool {
        if !self.accepts_click() {
            return false;
        }
        self.click_transition_active = true;
        true
    }

    /// Returns whether a click transition was active.
    pub fn reset_click_transition(&mut self) -> bool {
        std::mem::replace(&mut self.click_transition_active, false)
    }

    pub fn accepts_hover(&self) -> bool {
        self.phase == DecompositionPhase::Decomposed && !self.click_transition_active
    }

    pub fn accepts_click(&self) -> bool {
        self.accepts_hover()
    }
}

pub fn decomposition_duration(reduced_motion: bool) -> f32 {
    if reduced_motion {
        REDUCED_MOTION_DECOMPOSE_DURATION
    } else {
        DECOMPOSE_DURATION
    }
}

/// A single timer settles the whole burst instead of joining every tween.
pub fn settle_delay(duration: f32) -> f32 {
    duration.max(EMISSIVE_RAMP_DURATION)
}

/// Current pose of a navigation fragment as the burst starts.
#[derive(Debug, Clone, Copy)]
pub struct NavigationPiece {
    pub entity: Entity,
    pub current: Transform,
    pub original: Transform,
    pub target_position: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct DebrisPiece {
    pub entity: Entity,
    pub current: Transform,
}

#[derive(Debug, Default)]
pub struct DecompositionPlan {
    pub tweens: Vec<Tween>,
    pub orbits: Vec<(Entity, OrbitState)>,
    pub settle_after: f32,
}

/// Build every tween of the burst. All start together with no stagger.
pub fn plan_decomposition(
    root: Option<(Entity, Quat)>,
    navigation: &[NavigationPiece],
    debris: &[DebrisPiece],
    reduced_motion: bool,
    rng: &mut impl Rng,
) -> DecompositionPlan {
    let duration = decomposition_duration(reduced_motion);
    let mut plan = DecompositionPlan {
        settle_after: settle_delay(duration),
        ..default()
    };

    // Undo the idle pointer tilt so fragments land in the root's frame.
    if let Some((entity, rotation)) = root {
        plan.tweens.push(Tween::new(
            TweenTrack::Rotation {
                entity,
                from: rotation,
                to: Quat::IDENTITY,
            },
            duration,
        ));
    }

    for piece in navigation {
        plan.tweens.push(Tween::new(
            TweenTrack::Translation {
                entity: piece.entity,
                from: piece.current.translation,
                to: piece.target_position,
            },
            duration,
        ));
        plan.tweens.push(Tween::new(
            TweenTrack::Scale {
                entity: piece.entity,
                from: piece.current.scale,
                to: piece.original.scale,
            },
            duration,
        ));
        plan.tweens.push(Tween::new(
            TweenTrack::EmissiveIntensity {
                entity: piece.entity,
                from: piece.intensity,
                to: EMISSIVE_RAMP_INTENSITY,
            },
            EMISSIVE_RAMP_DURATION,
        ));
    }

    for piece in debris {
        let orbit = generate_orbit(rng);
        let tumble = Quat::from_euler(
            EulerRot::XYZ,
            rng.gen_range(0.0..TAU),
            rng.gen_range(0.0..TAU),
            rng.gen_range(0.0..TAU),
        );

        plan.tweens.push(Tween::new(
            TweenTrack::Translation {
                entity: piece.entity,
                from: piece.current.translation,
                to: orbit.position(),
            },
            duration,
        ));
        plan.tweens.push(Tween::new(
            TweenTrack::Rotation {
                entity: piece.entity,
                from: piece.current.rotation,
                to: tumble,
            },
            duration,
        ));
        plan.orbits.push((piece.entity, orbit));
    }

    plan
}

/// Enter `Decomposing` and register the burst. Returns the generated debris
/// orbits, or `None` when the emblem is no longer assembled.
pub fn begin_decomposition(
    controller: &mut EmblemController,
    registry: &mut AnimationRegistry,
    root: Option<(Entity, Quat)>,
    navigation: &[NavigationPiece],
    debris: &[DebrisPiece],
    reduced_motion: bool,
    rng: &mut impl Rng,
) -> Option<Vec<(Entity, OrbitState)>> {
    if !controller.try_begin_decomposition() {
        debug!("Decomposition trigger ignored in {:?}", controller.phase());
        return None;
    }

    let plan = plan_decomposition(root, navigation, debris, reduced_motion, rng);
    for tween in plan.tweens {
        registry.spawn_tagged(AnimationTag::Decomposition, tween);
    }
    registry.spawn_tagged(
        AnimationTag::Decomposition,
        Delay::new(plan.settle_after, Completion::DecompositionSettled),
    );

    Some(plan.orbits)
}

/// First press on the assembled model's volume starts the decomposition.
pub fn trigger_decomposition(
    pointer: Res<PointerState>,
    flags: Res<MountFlags>,
    mut controller: ResMut<EmblemController>,
    mut registry: ResMut<AnimationRegistry>,
    roots: Query<
        (Entity, &Transform, &GlobalTransform, &CollisionVolume),
        (With<EmblemRoot>, With<AssembledVolume>),
    >,
    navigation: Query<(Entity, &Transform, &Fragment, &NavigationFragment, &EmissiveState)>,
    mut debris: Query<(Entity, &Transform, &mut DebrisFragment)>,
    mut started: EventWriter<DecompositionStarted>,
) {
    if !pointer.just_pressed || controller.phase() != DecompositionPhase::Assembled {
        return;
    }
    let (Some(ray), Ok((root, root_transform, root_global, volume))) = (pointer.ray, roots.single())
    else {
        return;
    };
    if ray_hits_volume(ray.origin, ray.direction.as_vec3(), root_global, volume).is_none() {
        return;
    }

    let navigation_pieces: Vec<NavigationPiece> = navigation
        .iter()
        .map(|(entity, transform, fragment, nav, emissive)| NavigationPiece {
            entity,
            current: *transform,
            original: fragment.original,
            target_position: nav.target_position,
            intensity: emissive.intensity,
        })
        .collect();
    let debris_pieces: Vec<DebrisPiece> = debris
        .iter()
        .map(|(entity, transform, _)| DebrisPiece {
            entity,
            current: *transform,
        })
        .collect();

    let Some(orbits) = begin_decomposition(
        &mut controller,
        &mut registry,
        Some((root, root_transform.rotation)),
        &navigation_pieces,
        &debris_pieces,
        flags.reduced_motion,
        &mut rand::thread_rng(),
    ) else {
        return;
    };

    for (entity, orbit) in orbits {
        if let Ok((_, _, mut fragment)) = debris.get_mut(entity) {
            fragment.orbit = Some(orbit);
        }
    }

    info!(
        "Decomposition started: {} navigation, {} debris",
        navigation_pieces.len(),
        debris_pieces.len()
    );
    started.write(DecompositionStarted);
}

pub fn settle_decomposition(
    mut completed: EventReader<AnimationCompleted>,
    mut controller: ResMut<EmblemController>,
    mut settled: EventWriter<DecompositionCompleted>,
) {
    for AnimationCompleted(completion) in completed.read() {
        if *completion == Completion::DecompositionSettled && controller.finish_decomposition() {
            info!("→ Emblem decomposed");
            settled.write(DecompositionCompleted);
        }
    }
}
