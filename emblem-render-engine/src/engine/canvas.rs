//! Render canvas geometry and opacity.
//!
//! On WASM the canvas element's on-screen rectangle is read back every frame
//! so hover reports land in page pixels, and the dive fade writes the
//! element's CSS opacity. Native builds use the window's logical size and a
//! fullscreen black overlay whose alpha mirrors the fade.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// On-screen rectangle of the render canvas in CSS (logical) pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasRect {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

impl CanvasRect {
    /// Normalised device coordinates to pixel coordinates on the page.
    pub fn ndc_to_pixels(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            self.left + (ndc.x + 1.0) * 0.5 * self.width,
            self.top + (1.0 - ndc.y) * 0.5 * self.height,
        )
    }

    /// Pixel position relative to the canvas to normalised [-1, 1] pointer
    /// coordinates, +Y up.
    pub fn normalise_pointer(&self, cursor: Vec2) -> Vec2 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            (cursor.x / self.width) * 2.0 - 1.0,
            -((cursor.y / self.height) * 2.0 - 1.0),
        )
        .clamp(Vec2::splat(-1.0), Vec2::ONE)
    }
}

/// Opacity of the render canvas, 1.0 fully visible.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CanvasOpacity(pub f32);

impl Default for CanvasOpacity {
    fn default() -> Self {
        Self(1.0)
    }
}

#[derive(Component)]
pub struct CanvasFadeOverlay;

#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_canvas_fade_overlay(commands: &mut Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
        CanvasFadeOverlay,
    ));
}

pub fn update_canvas_rect(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut canvas_rect: ResMut<CanvasRect>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let rect = read_canvas_rect(window);
    if *canvas_rect != rect {
        *canvas_rect = rect;
    }
}

#[cfg(target_arch = "wasm32")]
fn read_canvas_rect(window: &Window) -> CanvasRect {
    use crate::engine::core::window_config::CANVAS_SELECTOR;

    let fallback = CanvasRect {
        left: 0.0,
        top: 0.0,
        width: window.width(),
        height: window.height(),
    };

    let Some(element) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector(CANVAS_SELECTOR).ok().flatten())
    else {
        return fallback;
    };

    let bounds = element.get_bounding_client_rect();
    CanvasRect {
        left: bounds.left() as f32,
        top: bounds.top() as f32,
        width: bounds.width() as f32,
        height: bounds.height() as f32,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_canvas_rect(window: &Window) -> CanvasRect {
    CanvasRect {
        left: 0.0,
        top: 0.0,
        width: window.width(),
        height: window.height(),
    }
}

pub fn apply_canvas_opacity(
    opacity: Res<CanvasOpacity>,
    mut overlays: Query<&mut BackgroundColor, With<CanvasFadeOverlay>>,
) {
    if !opacity.is_changed() {
        return;
    }

    let value = opacity.0.clamp(0.0, 1.0);

    #[cfg(target_arch = "wasm32")]
    {
        use crate::engine::core::window_config::CANVAS_SELECTOR;
        use wasm_bindgen::JsCast;

        let element = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.query_selector(CANVAS_SELECTOR).ok().flatten())
            .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok());

        if let Some(element) = element {
            if let Err(e) = element.style().set_property("opacity", &value.to_string()) {
                error!("Failed to set canvas opacity: {:?}", e);
            }
        }
    }

    for mut background in &mut overlays {
        background.0 = Color::srgba(0.0, 0.0, 0.0, 1.0 - value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_maps_into_canvas_rectangle() {
        let rect = CanvasRect {
            left: 100.0,
            top: 50.0,
            width: 800.0,
            height: 600.0,
        };

        assert_eq!(rect.ndc_to_pixels(Vec2::ZERO), Vec2::new(500.0, 350.0));
        assert_eq!(rect.ndc_to_pixels(Vec2::new(-1.0, 1.0)), Vec2::new(100.0, 50.0));
        assert_eq!(rect.ndc_to_pixels(Vec2::new(1.0, -1.0)), Vec2::new(900.0, 650.0));
    }

    #[test]
    fn pointer_normalises_with_y_up() {
        let rect = CanvasRect {
            left: 0.0,
            top: 0.0,
            width: 200.0,
            height: 100.0,
        };

        assert_eq!(rect.normalise_pointer(Vec2::new(100.0, 50.0)), Vec2::ZERO);
        assert_eq!(rect.normalise_pointer(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(rect.normalise_pointer(Vec2::new(200.0, 100.0)), Vec2::new(1.0, -1.0));
    }
}
