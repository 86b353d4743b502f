use super::timeline::{Completion, Delay, Timeline};
use super::tween::{PropertyWrite, Tween};
use bevy::prelude::*;
use std::collections::BTreeMap;

/// Opaque handle to a registered tween, timeline or delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationHandle(u64);

/// Groups handles so a whole family can be cancelled at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationTag {
    Decomposition,
    Hover(Entity),
    Dive,
}

#[derive(Debug, Clone)]
pub enum Animation {
    Tween(Tween),
    Timeline(Timeline),
    Delay(Delay),
}

impl From<Tween> for Animation {
    fn from(tween: Tween) -> Self {
        Self::Tween(tween)
    }
}

impl From<Timeline> for Animation {
    fn from(timeline: Timeline) -> Self {
        Self::Timeline(timeline)
    }
}

impl From<Delay> for Animation {
    fn from(delay: Delay) -> Self {
        Self::Delay(delay)
    }
}

#[derive(Debug)]
struct Entry {
    tag: Option<AnimationTag>,
    animation: Animation,
}

/// Output of one registry step: property writes in creation order and the
/// completion actions of everything that finished this frame.
#[derive(Debug, Default)]
pub struct AnimationFrame {
    pub writes: Vec<PropertyWrite>,
    pub completions: Vec<Completion>,
}

/// Owns every live animation so all of them can be force-cancelled.
///
/// Handles are issued in increasing order and entries are kept sorted by
/// handle, so writes are applied oldest first and a newer tween on the same
/// property always wins within a frame.
#[derive(Resource, Debug, Default)]
pub struct AnimationRegistry {
    next_id: u64,
    entries: BTreeMap<AnimationHandle, Entry>,
}

impl AnimationRegistry {
    pub fn spawn(&mut self, animation: impl Into<Animation>) -> AnimationHandle {
        self.insert(None, animation.into())
    }

    pub fn spawn_tagged(
        &mut self,
        tag: AnimationTag,
        animation: impl Into<Animation>,
    ) -> AnimationHandle {
        self.insert(Some(tag), animation.into())
    }

    fn insert(&mut self, tag: Option<AnimationTag>, animation: Animation) -> AnimationHandle {
        let handle = AnimationHandle(self.next_id);
        self.next_id += 1;
        self.entries.insert(handle, Entry { tag, animation });
        handle
    }

    /// Cancel one animation. Cancelled animations are dropped, not paused.
    pub fn cancel(&mut self, handle: AnimationHandle) -> bool {
        self.entries.remove(&handle).is_some()
    }

    pub fn cancel_tagged(&mut self, tag: AnimationTag) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.tag != Some(tag));
        before - self.entries.len()
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.entries.len();
        self.entries.clear();
        cancelled
    }

    pub fn is_active(&self, handle: AnimationHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    pub fn has_tagged(&self, tag: AnimationTag) -> bool {
        self.entries.values().any(|entry| entry.tag == Some(tag))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advance everything by `dt` seconds and drop what finished.
    pub fn advance(&mut self, dt: f32) -> AnimationFrame {
        let mut frame = AnimationFrame::default();
        let mut finished = Vec::new();

        for (handle, entry) in &mut self.entries {
            let done = match &mut entry.animation {
                Animation::Tween(tween) => {
                    if let Some(write) = tween.advance(dt) {
                        frame.writes.push(write);
                    }
                    tween.is_finished()
                }
                Animation::Timeline(timeline) => {
                    let done = timeline.advance(dt, &mut frame.writes);
                    if done {
                        if let Some(completion) = timeline.completion() {
                            frame.completions.push(completion.clone());
                        }
                    }
                    done
                }
                Animation::Delay(delay) => {
                    let done = delay.advance(dt);
                    if done {
                        frame.completions.push(delay.completion().clone());
                    }
                    done
                }
            };

            if done {
                finished.push(*handle);
            }
        }

        for handle in finished {
            self.entries.remove(&handle);
        }

        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::tween::TweenTrack;

    fn fade(to: f32) -> Tween {
        Tween::new(TweenTrack::CanvasOpacity { from: 1.0, to }, 1.0)
    }

    #[test]
    fn cancel_all_empties_registry() {
        let mut registry = AnimationRegistry::default();
        let a = registry.spawn(fade(0.0));
        let b = registry.spawn_tagged(AnimationTag::Dive, Timeline::new().push(0.0, fade(0.5)));
        registry.spawn(Delay::new(1.0, Completion::DecompositionSettled));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.cancel_all(), 3);
        assert!(!registry.is_active(a));
        assert!(!registry.is_active(b));

        let frame = registry.advance(5.0);
        assert!(frame.writes.is_empty());
        assert!(frame.completions.is_empty());
    }

    #[test]
    fn cancel_tagged_only_touches_that_tag() {
        let mut registry = AnimationRegistry::default();
        let first = Entity::from_raw(1);
        let second = Entity::from_raw(2);
        registry.spawn_tagged(AnimationTag::Hover(first), fade(0.0));
        registry.spawn_tagged(AnimationTag::Hover(first), fade(0.2));
        let kept = registry.spawn_tagged(AnimationTag::Hover(second), fade(0.4));

        assert_eq!(registry.cancel_tagged(AnimationTag::Hover(first)), 2);
        assert!(registry.is_active(kept));
        assert!(!registry.has_tagged(AnimationTag::Hover(first)));
    }

    #[test]
    fn finished_animations_are_dropped_and_report_completion() {
        let mut registry = AnimationRegistry::default();
        let tween = registry.spawn(fade(0.0));
        registry.spawn(
            Timeline::new()
                .push(0.0, fade(0.3))
                .on_complete(Completion::NavigationDive {
                    section_id: "work".into(),
                }),
        );

        let frame = registry.advance(0.5);
        assert_eq!(frame.writes.len(), 2);
        assert!(frame.completions.is_empty());

        let frame = registry.advance(0.5);
        assert_eq!(
            frame.completions,
            vec![Completion::NavigationDive {
                section_id: "work".into()
            }]
        );
        assert!(!registry.is_active(tween));
        assert!(registry.is_empty());
    }

    #[test]
    fn writes_follow_creation_order() {
        let mut registry = AnimationRegistry::default();
        registry.spawn(Tween::new(TweenTrack::CanvasOpacity { from: 0.0, to: 0.25 }, 0.0));
        registry.spawn(Tween::new(TweenTrack::CanvasOpacity { from: 0.0, to: 0.75 }, 0.0));

        let frame = registry.advance(0.016);
        assert_eq!(
            frame.writes,
            vec![
                PropertyWrite::CanvasOpacity(0.25),
                PropertyWrite::CanvasOpacity(0.75)
            ]
        );
    }
}
