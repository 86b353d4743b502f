use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::choreography::{COARSE_POINTER_HIT_SCALE, NARROW_VIEWPORT_WIDTH};
use serde::Serialize;

/// Device and accessibility flags read exactly once, at mount.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MountFlags {
    pub reduced_motion: bool,
    /// Coarse pointer or narrow viewport.
    pub coarse_pointer: bool,
}

impl MountFlags {
    /// Scale applied to navigation collision volumes.
    pub fn hit_scale(&self) -> f32 {
        if self.coarse_pointer {
            COARSE_POINTER_HIT_SCALE
        } else {
            1.0
        }
    }
}

pub fn detect_mount_flags(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let window_width = windows.single().ok().map(|w| w.width());
    let flags = read_mount_flags(window_width);
    info!(
        "Mount flags: reduced_motion={}, coarse_pointer={}",
        flags.reduced_motion, flags.coarse_pointer
    );
    commands.insert_resource(flags);
}

#[cfg(target_arch = "wasm32")]
fn read_mount_flags(window_width: Option<f32>) -> MountFlags {
    let Some(window) = web_sys::window() else {
        return MountFlags::default();
    };

    let matches = |query: &str| {
        window
            .match_media(query)
            .ok()
            .flatten()
            .map(|list| list.matches())
            .unwrap_or(false)
    };

    let viewport_width = window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .map(|w| w as f32)
        .or(window_width);

    MountFlags {
        reduced_motion: matches("(prefers-reduced-motion: reduce)"),
        coarse_pointer: matches("(pointer: coarse)") || is_narrow(viewport_width),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_mount_flags(window_width: Option<f32>) -> MountFlags {
    let args: Vec<String> = std::env::args().collect();
    MountFlags {
        reduced_motion: args.iter().any(|a| a == "--reduced-motion"),
        coarse_pointer: args.iter().any(|a| a == "--coarse-pointer") || is_narrow(window_width),
    }
}

fn is_narrow(width: Option<f32>) -> bool {
    width.is_some_and(|w| w < NARROW_VIEWPORT_WIDTH)
}
