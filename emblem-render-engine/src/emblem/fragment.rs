use crate::emblem::orbit::OrbitState;
use bevy::prelude::*;
use constants::sections::SectionSlot;

/// Root entity of the spawned emblem model. Fragments are re-parented
/// directly under it at classification.
#[derive(Component)]
pub struct EmblemRoot;

/// Identity and rest pose of one mesh fragment.
///
/// `original` is the fragment's transform relative to the emblem root when
/// the model was classified; it is a reference point and never mutated.
#[derive(Component, Debug, Clone)]
pub struct Fragment {
    pub index: usize,
    pub name: String,
    pub original: Transform,
}

/// Role decided once at classification and carried as typed data afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentRole {
    Navigation { slot: usize },
    Debris,
}

/// Interactive fragment bound to a destination section.
#[derive(Component, Debug, Clone)]
pub struct NavigationFragment {
    pub slot: usize,
    pub section_id: &'static str,
    pub label: &'static str,
    pub target_position: Vec3,
    /// Set while the pointer is over the fragment; the hover tween then owns
    /// emissive intensity and the ambient pulse stays off.
    pub hovered: bool,
}

impl NavigationFragment {
    pub fn from_slot(slot: usize, section: &SectionSlot) -> Self {
        Self {
            slot,
            section_id: section.section_id,
            label: section.label,
            target_position: section.target_position,
            hovered: false,
        }
    }
}

/// Decorative fragment. The orbit only exists once decomposition begins.
#[derive(Component, Debug, Clone, Default)]
pub struct DebrisFragment {
    pub orbit: Option<OrbitState>,
}
