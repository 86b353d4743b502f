use bevy::math::curve::{Curve, EaseFunction};
use bevy::prelude::*;

/// Animated property with its start and end values.
///
/// Start values are captured by whoever creates the tween, so a tween never
/// reads the world and the same track always samples the same way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenTrack {
    Translation { entity: Entity, from: Vec3, to: Vec3 },
    Rotation { entity: Entity, from: Quat, to: Quat },
    Scale { entity: Entity, from: Vec3, to: Vec3 },
    EmissiveIntensity { entity: Entity, from: f32, to: f32 },
    EmissiveColour {
        entity: Entity,
        from: LinearRgba,
        to: LinearRgba,
    },
    CanvasOpacity { from: f32, to: f32 },
}

/// Single value produced by sampling a track, applied by the animation system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyWrite {
    Translation(Entity, Vec3),
    Rotation(Entity, Quat),
    Scale(Entity, Vec3),
    EmissiveIntensity(Entity, f32),
    EmissiveColour(Entity, LinearRgba),
    CanvasOpacity(f32),
}

impl TweenTrack {
    /// Sample at eased progress. Progress at or past 1.0 yields the exact end value.
    pub fn sample(&self, progress: f32) -> PropertyWrite {
        let done = progress >= 1.0;
        match *self {
            Self::Translation { entity, from, to } => {
                PropertyWrite::Translation(entity, if done { to } else { from.lerp(to, progress) })
            }
            Self::Rotation { entity, from, to } => {
                PropertyWrite::Rotation(entity, if done { to } else { from.slerp(to, progress) })
            }
            Self::Scale { entity, from, to } => {
                PropertyWrite::Scale(entity, if done { to } else { from.lerp(to, progress) })
            }
            Self::EmissiveIntensity { entity, from, to } => PropertyWrite::EmissiveIntensity(
                entity,
                if done { to } else { lerp(from, to, progress) },
            ),
            Self::EmissiveColour { entity, from, to } => PropertyWrite::EmissiveColour(
                entity,
                if done {
                    to
                } else {
                    LinearRgba::new(
                        lerp(from.red, to.red, progress),
                        lerp(from.green, to.green, progress),
                        lerp(from.blue, to.blue, progress),
                        lerp(from.alpha, to.alpha, progress),
                    )
                },
            ),
            Self::CanvasOpacity { from, to } => {
                PropertyWrite::CanvasOpacity(if done { to } else { lerp(from, to, progress) })
            }
        }
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// One property animated over `duration` seconds after an optional `delay`.
#[derive(Debug, Clone)]
pub struct Tween {
    pub track: TweenTrack,
    pub delay: f32,
    pub duration: f32,
    pub ease: EaseFunction,
    elapsed: f32,
}

impl Tween {
    pub fn new(track: TweenTrack, duration: f32) -> Self {
        Self {
            track,
            delay: 0.0,
            duration,
            ease: EaseFunction::QuadraticInOut,
            elapsed: 0.0,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_ease(mut self, ease: EaseFunction) -> Self {
        self.ease = ease;
        self
    }

    /// Seconds from start until the final value is written.
    pub fn end_time(&self) -> f32 {
        self.delay + self.duration
    }

    /// Linear progress in [0, 1], ignoring easing.
    pub fn progress(&self) -> f32 {
        let local = self.elapsed - self.delay;
        if local < 0.0 {
            0.0
        } else if self.duration <= 0.0 {
            1.0
        } else {
            (local / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Advance by `dt` seconds. Returns the write for this frame, or `None`
    /// while the tween is still waiting out its delay.
    pub fn advance(&mut self, dt: f32) -> Option<PropertyWrite> {
        self.elapsed += dt.max(0.0);
        if self.elapsed < self.delay {
            return None;
        }

        let progress = self.progress();
        let eased = if progress >= 1.0 {
            1.0
        } else {
            self.ease.sample_clamped(progress)
        };
        Some(self.track.sample(eased))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> Entity {
        Entity::from_raw(7)
    }

    #[test]
    fn writes_nothing_during_delay() {
        let mut tween = Tween::new(
            TweenTrack::EmissiveIntensity {
                entity: entity(),
                from: 0.0,
                to: 1.0,
            },
            1.0,
        )
        .with_delay(0.5);

        assert_eq!(tween.advance(0.25), None);
        assert!(!tween.is_finished());
        assert!(tween.advance(0.5).is_some());
    }

    #[test]
    fn lands_exactly_on_end_value() {
        let from = Vec3::new(0.1, 0.2, 0.3);
        let to = Vec3::new(1.7, -2.9, 3.3);
        let mut tween = Tween::new(
            TweenTrack::Translation {
                entity: entity(),
                from,
                to,
            },
            0.4,
        )
        .with_ease(EaseFunction::CubicInOut);

        tween.advance(0.1);
        tween.advance(0.1);
        let last = tween.advance(0.3);

        assert_eq!(last, Some(PropertyWrite::Translation(entity(), to)));
        assert!(tween.is_finished());
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let mut tween = Tween::new(TweenTrack::CanvasOpacity { from: 1.0, to: 0.0 }, 0.0);
        assert_eq!(tween.advance(0.0), Some(PropertyWrite::CanvasOpacity(0.0)));
        assert!(tween.is_finished());
    }

    #[test]
    fn midpoint_of_linear_tween_is_halfway() {
        let mut tween = Tween::new(
            TweenTrack::EmissiveIntensity {
                entity: entity(),
                from: 0.0,
                to: 2.0,
            },
            1.0,
        )
        .with_ease(EaseFunction::Linear);

        match tween.advance(0.5) {
            Some(PropertyWrite::EmissiveIntensity(_, value)) => {
                assert!((value - 1.0).abs() < 1e-5)
            }
            other => panic!("unexpected write {other:?}"),
        }
    }
}
