use super::decomposition::{DecompositionPhase, EmblemController};
use super::fragment::{DebrisFragment, EmblemRoot, Fragment, NavigationFragment};
use super::materials::EmissiveState;
use super::orbit::OrbitState;
use super::picking::PointerState;
use crate::animation::registry::{AnimationRegistry, AnimationTag};
use crate::engine::core::mount_flags::MountFlags;
use bevy::prelude::*;
use constants::choreography::*;

/// What the per-frame choreographer drives this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoreographyMode {
    /// Whole model follows the pointer.
    IdleTilt,
    /// Navigation fragments float and pulse, debris orbits.
    Orbiting,
}

pub fn choreography_mode(
    flags: &MountFlags,
    controller: &EmblemController,
    decomposition_animating: bool,
) -> Option<ChoreographyMode> {
    if flags.reduced_motion {
        return None;
    }
    match controller.phase() {
        DecompositionPhase::Assembled if !decomposition_animating => Some(ChoreographyMode::IdleTilt),
        DecompositionPhase::Decomposed if !controller.click_transition_active() => {
            Some(ChoreographyMode::Orbiting)
        }
        _ => None,
    }
}

/// Smoothed assembled-model tilt, x about the X axis and y about Y.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct IdleTilt(pub Vec2);

pub fn idle_tilt_target(pointer: Vec2) -> Vec2 {
    Vec2::new(-pointer.y * IDLE_TILT_X_GAIN, pointer.x * IDLE_TILT_Y_GAIN)
}

/// Fraction of the remaining distance covered in `dt`. Never overshoots and
/// composes across frames, so two half steps equal one full step.
pub fn approach_factor(dt: f32) -> f32 {
    1.0 - (-IDLE_TILT_RATE * dt.max(0.0)).exp()
}

pub fn step_idle_tilt(current: Vec2, target: Vec2, dt: f32) -> Vec2 {
    current + (target - current) * approach_factor(dt)
}

pub fn float_offset(target_y: f32, t: f32, index: usize) -> f32 {
    target_y + FLOAT_AMPLITUDE * (FLOAT_FREQUENCY * t + index as f32 * FLOAT_PHASE_STEP).sin()
}

pub fn pulse_intensity(t: f32, index: usize) -> f32 {
    PULSE_BASE + PULSE_AMPLITUDE * (PULSE_FREQUENCY * t + index as f32 * PULSE_PHASE_STEP).sin()
}

/// Float, spin and (unless a hover owns it) pulse one navigation fragment.
pub fn update_navigation_fragment(
    transform: &mut Transform,
    emissive: &mut EmissiveState,
    navigation: &NavigationFragment,
    pulse: bool,
    t: f32,
    dt: f32,
) {
    transform.translation.y = float_offset(navigation.target_position.y, t, navigation.slot);
    transform.rotate_y(NAVIGATION_SPIN_RATE * dt);
    if pulse {
        emissive.intensity = pulse_intensity(t, navigation.slot);
    }
}

/// Advance the orbit and the self-rotation about local X and Y.
pub fn update_debris_fragment(transform: &mut Transform, orbit: &mut OrbitState, dt: f32) {
    orbit.advance(dt);
    transform.translation = orbit.position();
    transform.rotation = transform.rotation
        * Quat::from_rotation_x(orbit.spin_x * dt)
        * Quat::from_rotation_y(orbit.spin_y * dt);
}

/// Single ordered per-frame update: root tilt, then navigation, then debris.
pub fn choreograph_fragments(
    time: Res<Time>,
    flags: Res<MountFlags>,
    controller: Res<EmblemController>,
    registry: Res<AnimationRegistry>,
    pointer: Res<PointerState>,
    mut idle_tilt: ResMut<IdleTilt>,
    mut roots: Query<&mut Transform, (With<EmblemRoot>, Without<Fragment>)>,
    mut navigation: Query<
        (Entity, &mut Transform, &mut EmissiveState, &NavigationFragment),
        With<Fragment>,
    >,
    mut debris: Query<
        (&mut Transform, &mut DebrisFragment),
        (With<Fragment>, Without<NavigationFragment>),
    >,
) {
    let decomposition_animating = registry.has_tagged(AnimationTag::Decomposition);
    let Some(mode) = choreography_mode(&flags, &controller, decomposition_animating) else {
        return;
    };

    let dt = time.delta_secs();
    let t = time.elapsed_secs();

    match mode {
        ChoreographyMode::IdleTilt => {
            let target = idle_tilt_target(pointer.normalised);
            idle_tilt.0 = step_idle_tilt(idle_tilt.0, target, dt);
            for mut transform in &mut roots {
                transform.rotation = Quat::from_euler(EulerRot::XYZ, idle_tilt.0.x, idle_tilt.0.y, 0.0);
            }
        }
        ChoreographyMode::Orbiting => {
            for (entity, mut transform, mut emissive, nav) in &mut navigation {
                let pulse = !nav.hovered && !registry.has_tagged(AnimationTag::Hover(entity));
                update_navigation_fragment(&mut transform, &mut emissive, nav, pulse, t, dt);
            }
            for (mut transform, mut fragment) in &mut debris {
                if let Some(orbit) = fragment.orbit.as_mut() {
                    update_debris_fragment(&mut transform, orbit, dt);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emblem::orbit::generate_orbit;
    use constants::sections::SECTION_SLOTS;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn decomposed() -> EmblemController {
        let mut controller = EmblemController::default();
        controller.try_begin_decomposition();
        controller.finish_decomposition();
        controller
    }

    #[test]
    fn approach_is_frame_rate_independent() {
        let target = Vec2::new(0.3, -0.5);
        let one = step_idle_tilt(Vec2::ZERO, target, 0.1);
        let two = step_idle_tilt(step_idle_tilt(Vec2::ZERO, target, 0.05), target, 0.05);
        assert!((one - two).length() < 1e-5);
    }

    #[test]
    fn approach_never_overshoots() {
        let target = Vec2::new(1.0, 1.0);
        let mut tilt = Vec2::ZERO;
        for _ in 0..200 {
            tilt = step_idle_tilt(tilt, target, 0.5);
            assert!(tilt.x <= target.x && tilt.y <= target.y);
        }
        assert!((tilt - target).length() < 1e-4);
    }

    #[test]
    fn tilt_follows_pointer_axes() {
        assert_eq!(idle_tilt_target(Vec2::new(1.0, 1.0)), Vec2::new(-0.3, 0.5));
    }

    #[test]
    fn reduced_motion_disables_all_choreography() {
        let flags = MountFlags {
            reduced_motion: true,
            coarse_pointer: false,
        };
        assert_eq!(choreography_mode(&flags, &EmblemController::default(), false), None);
        assert_eq!(choreography_mode(&flags, &decomposed(), false), None);
    }

    #[test]
    fn mode_follows_phase_and_click_flag() {
        let flags = MountFlags::default();
        assert_eq!(
            choreography_mode(&flags, &EmblemController::default(), false),
            Some(ChoreographyMode::IdleTilt)
        );
        assert_eq!(choreography_mode(&flags, &EmblemController::default(), true), None);

        let mut controller = decomposed();
        assert_eq!(
            choreography_mode(&flags, &controller, false),
            Some(ChoreographyMode::Orbiting)
        );
        controller.try_begin_click_transition();
        assert_eq!(choreography_mode(&flags, &controller, false), None);
    }

    #[test]
    fn hovered_fragment_keeps_its_emissive() {
        let nav = NavigationFragment::from_slot(2, &SECTION_SLOTS[2]);
        let mut transform = Transform::IDENTITY;
        let mut emissive = EmissiveState::new(LinearRgba::WHITE, 1.4);

        update_navigation_fragment(&mut transform, &mut emissive, &nav, false, 3.0, 0.016);
        assert_eq!(emissive.intensity, 1.4);
        assert!((transform.translation.y - float_offset(nav.target_position.y, 3.0, 2)).abs() < 1e-6);

        update_navigation_fragment(&mut transform, &mut emissive, &nav, true, 3.0, 0.016);
        assert!((emissive.intensity - pulse_intensity(3.0, 2)).abs() < 1e-6);
    }

    #[test]
    fn pulse_stays_lit() {
        for step in 0..1000 {
            let value = pulse_intensity(step as f32 * 0.01, step % 4);
            assert!(value >= PULSE_BASE - PULSE_AMPLITUDE - 1e-6);
            assert!(value > 0.0);
        }
    }

    #[test]
    fn debris_update_stays_on_orbit() {
        let mut orbit = generate_orbit(&mut StdRng::seed_from_u64(11));
        let mut transform = Transform::IDENTITY;
        for _ in 0..100 {
            update_debris_fragment(&mut transform, &mut orbit, 0.016);
            let offset = transform.translation - orbit.centre;
            assert!((offset.length() - orbit.radius).abs() < 1e-4);
        }
    }
}
