//! Events crossing the boundary between the emblem and its host.

use bevy::prelude::*;

/// Classification finished and the emblem is interactive.
#[derive(Event, Debug, Clone)]
pub struct EmblemReady {
    /// Section ids in slot order, only for slots that received a fragment.
    pub navigation: Vec<&'static str>,
    pub debris_count: usize,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct DecompositionStarted;

#[derive(Event, Debug, Clone, Copy)]
pub struct DecompositionCompleted;

/// Payload for the host's label overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverReport {
    pub fragment_id: String,
    pub label: String,
    /// Page pixel position, `None` when the fragment is behind the camera.
    pub position: Option<Vec2>,
}

/// `Some` on pointer-enter of a navigation fragment, `None` on leave.
#[derive(Event, Debug, Clone)]
pub struct NavigationHovered(pub Option<HoverReport>);

/// Camera dive finished; the host should navigate to this section.
#[derive(Event, Debug, Clone)]
pub struct NavigationClicked {
    pub section_id: String,
}

/// Host request to dive into the fragment bound to a section.
#[derive(Event, Debug, Clone)]
pub struct NavigateToSection {
    pub section_id: String,
}

/// Host request to clear the camera-dive flag after its page transition.
#[derive(Event, Debug, Clone, Copy)]
pub struct ResetClickTransition;

/// Host request to tear the emblem down.
#[derive(Event, Debug, Clone, Copy)]
pub struct UnmountEmblem;
