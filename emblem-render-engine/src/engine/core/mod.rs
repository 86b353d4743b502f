//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, mount-time device
//! flags and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the emblem, animation and RPC plugins plus
/// platform-specific configuration.
pub mod app_setup;

/// Application state machine from loading through running to unmounted.
pub mod app_state;

/// Reduced-motion and coarse-pointer flags, read once at startup.
pub mod mount_flags;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
