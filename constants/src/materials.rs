/// Mean channel value below which a fragment counts as dark.
pub const DARK_BRIGHTNESS_THRESHOLD: f32 = 0.25;

pub const NAVIGATION_DARK_BRIGHTEN: f32 = 2.5;
pub const NAVIGATION_DARK_EMISSIVE: f32 = 0.8;
pub const NAVIGATION_EMISSIVE: f32 = 0.35;

pub const DEBRIS_DARK_BRIGHTEN: f32 = 1.6;
pub const DEBRIS_DARK_EMISSIVE: f32 = 0.25;
pub const DEBRIS_DARKEN: f32 = 0.85;
pub const DEBRIS_EMISSIVE: f32 = 0.1;

/// Shared by navigation and debris fragments.
pub const FRAGMENT_METALLIC: f32 = 0.75;
pub const FRAGMENT_ROUGHNESS: f32 = 0.3;
