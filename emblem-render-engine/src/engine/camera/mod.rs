//! Stage camera the emblem is viewed through.
//!
//! Owns the camera's home position and cursor ray construction; the camera
//! dive moves this camera and a host reset returns it home.

/// Stage camera component, spawn helpers and cursor rays.
pub mod stage_camera;
