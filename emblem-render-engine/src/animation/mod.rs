//! Frame-driven tweening and animation lifecycle bookkeeping.
//!
//! Every tween, timeline and delay created by the emblem lives in the
//! [`registry::AnimationRegistry`] resource. The registry advances once per
//! frame on the shared `Time` clock and hands back property writes, which
//! [`advance_animations`] applies to transforms, emissive state and the
//! canvas opacity. Completion actions are re-emitted as
//! [`AnimationCompleted`] events.
//!
//! ```text
//! trigger system ──spawn──> AnimationRegistry ──advance(dt)──> PropertyWrite
//!                                │                               │
//!                          cancel / cancel_all             Transform / EmissiveState
//!                                                                │
//!                                                      AnimationCompleted event
//! ```

/// Handle-keyed store of live animations with cancel-all support.
pub mod registry;

/// Ordered multi-track timelines, delays and their completion actions.
pub mod timeline;

/// Single-property tweens with easing.
pub mod tween;

use crate::emblem::materials::EmissiveState;
use crate::engine::canvas::CanvasOpacity;
use bevy::prelude::*;
use registry::AnimationRegistry;
use timeline::Completion;
use tween::PropertyWrite;

/// Fired once for every timeline or delay that ran to completion.
#[derive(Event, Debug, Clone)]
pub struct AnimationCompleted(pub Completion);

/// Advance all registered animations and apply their writes.
pub fn advance_animations(
    time: Res<Time>,
    mut registry: ResMut<AnimationRegistry>,
    mut transforms: Query<&mut Transform>,
    mut emissive: Query<&mut EmissiveState>,
    mut canvas_opacity: ResMut<CanvasOpacity>,
    mut completed: EventWriter<AnimationCompleted>,
) {
    if registry.is_empty() {
        return;
    }

    let frame = registry.advance(time.delta_secs());

    for write in frame.writes {
        apply_property_write(write, &mut transforms, &mut emissive, &mut canvas_opacity);
    }

    for completion in frame.completions {
        debug!("Animation completed: {:?}", completion);
        completed.write(AnimationCompleted(completion));
    }
}

fn apply_property_write(
    write: PropertyWrite,
    transforms: &mut Query<&mut Transform>,
    emissive: &mut Query<&mut EmissiveState>,
    canvas_opacity: &mut CanvasOpacity,
) {
    // Targets may have been released by an unmount mid-flight.
    match write {
        PropertyWrite::Translation(entity, value) => {
            if let Ok(mut transform) = transforms.get_mut(entity) {
                transform.translation = value;
            }
        }
        PropertyWrite::Rotation(entity, value) => {
            if let Ok(mut transform) = transforms.get_mut(entity) {
                transform.rotation = value;
            }
        }
        PropertyWrite::Scale(entity, value) => {
            if let Ok(mut transform) = transforms.get_mut(entity) {
                transform.scale = value;
            }
        }
        PropertyWrite::EmissiveIntensity(entity, value) => {
            if let Ok(mut state) = emissive.get_mut(entity) {
                state.intensity = value;
            }
        }
        PropertyWrite::EmissiveColour(entity, value) => {
            if let Ok(mut state) = emissive.get_mut(entity) {
                state.colour = value;
            }
        }
        PropertyWrite::CanvasOpacity(value) => {
            canvas_opacity.0 = value;
        }
    }
}

/// Registers the animation registry, its event and the per-frame driver.
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnimationRegistry>()
            .add_event::<AnimationCompleted>();
    }
}
