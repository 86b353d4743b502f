//! Shared tuning for the emblem render engine.
//!
//! Everything here is compile-time data: the fixed navigation section slots
//! and the numbers that shape decomposition, choreography, materials and the
//! camera dive.

/// Orbit, float, pulse, idle tilt and hover tuning.
pub mod choreography;

/// Camera dive timeline offsets, durations and distances.
pub mod dive;

/// Brightness thresholds and PBR values for fragment materials.
pub mod materials;

/// Fixed destination sections navigation fragments are bound to.
pub mod sections;
