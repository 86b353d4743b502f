use super::fragment::FragmentRole;
use bevy::prelude::*;
use constants::materials::*;

/// Emissive colour and intensity of a fragment's own material.
///
/// Hover tweens and the ambient pulse write here; [`apply_emissive_state`]
/// pushes `colour × intensity` to the material.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct EmissiveState {
    /// The fragment's own colour, the baseline hover returns to.
    pub base_colour: LinearRgba,
    pub colour: LinearRgba,
    pub intensity: f32,
}

impl EmissiveState {
    pub fn new(base_colour: LinearRgba, intensity: f32) -> Self {
        Self {
            base_colour,
            colour: base_colour,
            intensity,
        }
    }

    pub fn emissive(&self) -> LinearRgba {
        LinearRgba::rgb(
            self.colour.red * self.intensity,
            self.colour.green * self.intensity,
            self.colour.blue * self.intensity,
        )
    }
}

/// Mean of the three sRGB channels.
pub fn perceived_brightness(colour: Srgba) -> f32 {
    (colour.red + colour.green + colour.blue) / 3.0
}

fn scale_rgb(colour: Srgba, factor: f32) -> Srgba {
    Srgba::new(
        (colour.red * factor).min(1.0),
        (colour.green * factor).min(1.0),
        (colour.blue * factor).min(1.0),
        colour.alpha,
    )
}

/// Base colour and emissive intensity for a role, from the source colour.
pub fn adjust_for_role(colour: Srgba, role: FragmentRole) -> (Srgba, f32) {
    let dark = perceived_brightness(colour) < DARK_BRIGHTNESS_THRESHOLD;
    match (role, dark) {
        (FragmentRole::Navigation { .. }, true) => {
            (scale_rgb(colour, NAVIGATION_DARK_BRIGHTEN), NAVIGATION_DARK_EMISSIVE)
        }
        (FragmentRole::Navigation { .. }, false) => (colour, NAVIGATION_EMISSIVE),
        (FragmentRole::Debris, true) => (scale_rgb(colour, DEBRIS_DARK_BRIGHTEN), DEBRIS_DARK_EMISSIVE),
        (FragmentRole::Debris, false) => (scale_rgb(colour, DEBRIS_DARKEN), DEBRIS_EMISSIVE),
    }
}

/// Per-fragment copy of `source` adjusted for the fragment's role.
///
/// The source material is shared with the cached scene and is only read.
pub fn enhance_material(
    source: &StandardMaterial,
    role: FragmentRole,
) -> (StandardMaterial, EmissiveState) {
    let (colour, intensity) = adjust_for_role(source.base_color.to_srgba(), role);

    let mut material = source.clone();
    material.base_color = Color::Srgba(colour);
    material.metallic = FRAGMENT_METALLIC;
    material.perceptual_roughness = FRAGMENT_ROUGHNESS;
    material.alpha_mode = AlphaMode::Blend;

    let state = EmissiveState::new(LinearRgba::from(colour), intensity);
    material.emissive = state.emissive();

    (material, state)
}

pub fn apply_emissive_state(
    fragments: Query<(&EmissiveState, &MeshMaterial3d<StandardMaterial>), Changed<EmissiveState>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (state, material) in &fragments {
        if let Some(material) = materials.get_mut(&material.0) {
            material.emissive = state.emissive();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAV: FragmentRole = FragmentRole::Navigation { slot: 0 };

    #[test]
    fn dark_navigation_fragment_is_brightened_and_glows() {
        let (colour, intensity) = adjust_for_role(Srgba::rgb(0.1, 0.1, 0.1), NAV);
        assert!((colour.red - 0.25).abs() < 1e-6);
        assert_eq!(intensity, NAVIGATION_DARK_EMISSIVE);
    }

    #[test]
    fn bright_debris_is_darkened_slightly() {
        let (colour, intensity) = adjust_for_role(Srgba::rgb(0.8, 0.6, 0.4), FragmentRole::Debris);
        assert!((colour.red - 0.8 * DEBRIS_DARKEN).abs() < 1e-6);
        assert_eq!(intensity, DEBRIS_EMISSIVE);
    }

    #[test]
    fn brightening_saturates_at_one() {
        let (colour, _) = adjust_for_role(Srgba::rgb(0.6, 0.0, 0.0), NAV);
        assert!(colour.red <= 1.0);
    }

    #[test]
    fn enhanced_copy_leaves_source_untouched() {
        let source = StandardMaterial {
            base_color: Color::srgb(0.05, 0.05, 0.05),
            metallic: 0.0,
            ..default()
        };

        let (material, state) = enhance_material(&source, FragmentRole::Debris);

        assert_eq!(source.metallic, 0.0);
        assert_eq!(source.alpha_mode, AlphaMode::Opaque);
        assert_eq!(material.metallic, FRAGMENT_METALLIC);
        assert_eq!(material.perceptual_roughness, FRAGMENT_ROUGHNESS);
        assert_eq!(material.alpha_mode, AlphaMode::Blend);
        assert_eq!(state.intensity, DEBRIS_DARK_EMISSIVE);
        assert_eq!(state.colour, state.base_colour);
    }
}
