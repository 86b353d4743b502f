use std::ops::Range;

/// Decomposition tween length in seconds.
pub const DECOMPOSE_DURATION: f32 = 4.0;
pub const REDUCED_MOTION_DECOMPOSE_DURATION: f32 = 0.5;

/// Navigation emissive ramp, independent of the decomposition duration.
pub const EMISSIVE_RAMP_DURATION: f32 = 2.0;
pub const EMISSIVE_RAMP_INTENSITY: f32 = 0.9;

// Debris orbits
pub const ORBIT_RADIUS: Range<f32> = 2.0..4.5;
pub const ORBIT_ANGULAR_SPEED: Range<f32> = 0.015..0.055;
/// Half-width of the orbit centre's scatter on X and Y.
pub const ORBIT_CENTRE_SPREAD: f32 = 0.5;
/// Distance behind the navigation plane (applied as negative Z).
pub const ORBIT_CENTRE_DEPTH: Range<f32> = 0.5..1.5;
/// Self-rotation rates about local X and Y are drawn from [-r, r).
pub const DEBRIS_SPIN_RATE: f32 = 0.2;

// Assembled idle pointer follow
pub const IDLE_TILT_X_GAIN: f32 = 0.3;
pub const IDLE_TILT_Y_GAIN: f32 = 0.5;
pub const IDLE_TILT_RATE: f32 = 3.0;

// Navigation float, spin and pulse
pub const FLOAT_AMPLITUDE: f32 = 0.1;
pub const FLOAT_FREQUENCY: f32 = 0.8;
pub const FLOAT_PHASE_STEP: f32 = 0.5;
pub const NAVIGATION_SPIN_RATE: f32 = 0.15;
pub const PULSE_BASE: f32 = 0.65;
pub const PULSE_AMPLITUDE: f32 = 0.25;
pub const PULSE_FREQUENCY: f32 = 1.5;
pub const PULSE_PHASE_STEP: f32 = 0.8;

// Hover highlight
pub const HOVER_DURATION: f32 = 0.3;
pub const HOVER_SCALE: f32 = 1.2;
pub const HOVER_EMISSIVE_INTENSITY: f32 = 1.4;
/// Linear RGB of the highlight hue.
pub const HOVER_HIGHLIGHT_COLOUR: [f32; 3] = [0.35, 0.75, 1.0];
/// Emissive intensity a navigation fragment settles back to after hover.
pub const IDLE_EMISSIVE_INTENSITY: f32 = 0.65;

/// Collision volume inflation on coarse-pointer or narrow-viewport devices.
pub const COARSE_POINTER_HIT_SCALE: f32 = 1.5;
/// Viewports narrower than this (CSS px) count as narrow.
pub const NARROW_VIEWPORT_WIDTH: f32 = 768.0;
