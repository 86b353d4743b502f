use super::tween::{PropertyWrite, Tween};

/// What the engine does once a timeline or delay runs to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Decomposition burst has settled; the emblem becomes interactive.
    DecompositionSettled,
    /// Camera dive into a navigation fragment finished.
    NavigationDive { section_id: String },
}

/// Ordered set of tweens sharing one clock, each starting at its own offset.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    tracks: Vec<Tween>,
    completion: Option<Completion>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tween that starts `offset` seconds into the timeline.
    pub fn push(mut self, offset: f32, tween: Tween) -> Self {
        self.tracks.push(tween.with_delay(offset));
        self
    }

    pub fn on_complete(mut self, completion: Completion) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn completion(&self) -> Option<&Completion> {
        self.completion.as_ref()
    }

    pub fn tracks(&self) -> &[Tween] {
        &self.tracks
    }

    pub fn duration(&self) -> f32 {
        self.tracks
            .iter()
            .map(Tween::end_time)
            .fold(0.0, f32::max)
    }

    /// Advance every track in insertion order, collecting their writes.
    /// Returns true once all tracks have finished.
    pub fn advance(&mut self, dt: f32, writes: &mut Vec<PropertyWrite>) -> bool {
        let mut finished = true;
        for tween in &mut self.tracks {
            if tween.is_finished() {
                continue;
            }
            if let Some(write) = tween.advance(dt) {
                writes.push(write);
            }
            finished &= tween.is_finished();
        }
        finished
    }
}

/// Timer with a completion action and no property writes.
#[derive(Debug, Clone)]
pub struct Delay {
    remaining: f32,
    completion: Completion,
}

impl Delay {
    pub fn new(seconds: f32, completion: Completion) -> Self {
        Self {
            remaining: seconds,
            completion,
        }
    }

    pub fn completion(&self) -> &Completion {
        &self.completion
    }

    pub fn advance(&mut self, dt: f32) -> bool {
        self.remaining -= dt.max(0.0);
        self.remaining <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::tween::TweenTrack;
    use bevy::prelude::*;

    #[test]
    fn tracks_start_at_their_offsets() {
        let entity = Entity::from_raw(3);
        let mut timeline = Timeline::new()
            .push(
                0.0,
                Tween::new(
                    TweenTrack::Translation {
                        entity,
                        from: Vec3::ZERO,
                        to: Vec3::X,
                    },
                    1.0,
                ),
            )
            .push(0.8, Tween::new(TweenTrack::CanvasOpacity { from: 1.0, to: 0.0 }, 0.4));

        assert!((timeline.duration() - 1.2).abs() < 1e-6);

        let mut writes = Vec::new();
        assert!(!timeline.advance(0.5, &mut writes));
        assert_eq!(writes.len(), 1);

        writes.clear();
        assert!(!timeline.advance(0.5, &mut writes));
        assert_eq!(writes.len(), 2);

        writes.clear();
        assert!(timeline.advance(0.5, &mut writes));
        assert_eq!(writes, vec![PropertyWrite::CanvasOpacity(0.0)]);
    }

    #[test]
    fn delay_fires_after_its_duration() {
        let mut delay = Delay::new(2.0, Completion::DecompositionSettled);
        assert!(!delay.advance(1.0));
        assert!(!delay.advance(0.5));
        assert!(delay.advance(0.5));
        assert_eq!(delay.completion(), &Completion::DecompositionSettled);
    }
}
