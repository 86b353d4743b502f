//! Emblem decomposition and navigation.
//!
//! A single glTF model is classified into up to four navigation fragments
//! and any number of debris fragments. The first press on the assembled
//! model starts a one-way decomposition; afterwards debris orbits, the
//! navigation fragments float and pulse, and clicking one dives the camera
//! into it before the host navigates away.
//!
//! ```text
//! Assembled ──press──> Decomposing ──settle timer──> Decomposed ──click──> dive
//!  (idle tilt)          (burst tweens)               (orbit, hover)     (flag held)
//! ```

/// Volume ranking of mesh fragments and slot binding.
pub mod classifier;

/// Per-frame idle tilt, navigation float/pulse and debris orbits.
pub mod choreography;

/// Decomposition state machine and the one-shot burst.
pub mod decomposition;

/// Camera dive timeline, host navigation requests and the host reset.
pub mod dive;

/// Events exchanged with the host bridge.
pub mod events;

/// Fragment components and roles.
pub mod fragment;

/// Hover highlight tweens and screen-space projection for labels.
pub mod hover;

/// Host teardown.
pub mod lifecycle;

/// Per-role material adjustment and emissive state.
pub mod materials;

/// Closed-form debris orbits.
pub mod orbit;

/// Pointer rays and collision volumes.
pub mod picking;

use crate::engine::core::mount_flags::MountFlags;
use bevy::prelude::*;
use choreography::IdleTilt;
use decomposition::EmblemController;
use dive::DiveOrigin;
use events::*;
use hover::HoverTracker;
use picking::PointerState;

/// Resources and events of the emblem. Systems are scheduled in app setup.
pub struct EmblemPlugin;

impl Plugin for EmblemPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MountFlags>()
            .init_resource::<EmblemController>()
            .init_resource::<PointerState>()
            .init_resource::<HoverTracker>()
            .init_resource::<IdleTilt>()
            .init_resource::<DiveOrigin>()
            .add_event::<EmblemReady>()
            .add_event::<DecompositionStarted>()
            .add_event::<DecompositionCompleted>()
            .add_event::<NavigationHovered>()
            .add_event::<NavigationClicked>()
            .add_event::<NavigateToSection>()
            .add_event::<ResetClickTransition>()
            .add_event::<UnmountEmblem>();
    }
}
