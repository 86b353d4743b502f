use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
// Crate engine modules
use crate::engine::camera::stage_camera::{DEFAULT_CAMERA_POSITION, spawn_stage_camera};
use crate::engine::canvas::{CanvasOpacity, CanvasRect, apply_canvas_opacity, update_canvas_rect};
use crate::engine::core::app_state::{AppState, transition_to_running};
use crate::engine::core::mount_flags::detect_mount_flags;
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::manifest_loader::{
    EmblemManifest, ManifestLoader, load_manifest_system, start_loading,
};
use crate::engine::loading::model_loader::{ModelLoader, check_model_ready};
use crate::engine::loading::progress::LoadingProgress;
// Emblem and animation modules
use crate::animation::{AnimationPlugin, advance_animations};
use crate::emblem::{
    EmblemPlugin,
    choreography::choreograph_fragments,
    classifier::classify_emblem_model,
    decomposition::{settle_decomposition, trigger_decomposition},
    dive::{finish_navigation_dive, handle_click_transition_reset, handle_navigation_clicks},
    hover::track_navigation_hover,
    lifecycle::handle_unmount,
    materials::apply_emissive_state,
    picking::update_pointer_state,
};
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::emblem::dive::handle_dive_keyboard_shortcuts;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        // Registers the emblem manifest as a loadable asset type.
        .add_plugins(JsonAssetPlugin::<EmblemManifest>::new(&["manifest.json"]))
        .add_plugins(AnimationPlugin)
        .add_plugins(EmblemPlugin)
        .add_plugins(WebRpcPlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ManifestLoader>()
        .init_resource::<ModelLoader>()
        .init_resource::<CanvasRect>()
        .init_resource::<CanvasOpacity>();

    // State-based system scheduling
    app.add_systems(Startup, (setup, detect_mount_flags, start_loading).chain())
        .add_systems(
            Update,
            (
                load_manifest_system,
                check_model_ready,
                classify_emblem_model,
                transition_to_running,
            )
                .chain()
                .run_if(in_state(AppState::Loading)),
        );

    // One ordered pass per frame: input, triggers, animation, choreography, output.
    let runtime_systems = (
        update_canvas_rect,
        update_pointer_state,
        trigger_decomposition,
        track_navigation_hover,
        handle_navigation_clicks,
        handle_click_transition_reset,
        advance_animations,
        settle_decomposition,
        finish_navigation_dive,
        choreograph_fragments,
        apply_emissive_state,
        apply_canvas_opacity,
    )
        .chain();

    app.add_systems(Update, runtime_systems.run_if(in_state(AppState::Running)));
    add_teardown_systems(&mut app);

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(
            Update,
            handle_dive_keyboard_shortcuts
                .before(handle_navigation_clicks)
                .run_if(in_state(AppState::Running)),
        );
    }

    app
}

// The host may unmount before loading has finished.
pub(crate) fn add_teardown_systems(app: &mut App) {
    app.add_systems(
        Update,
        handle_unmount
            .after(transition_to_running)
            .after(apply_canvas_opacity)
            .run_if(not(in_state(AppState::Unmounted))),
    );
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 250.0,
        ..default()
    });
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);
    spawn_stage_camera(&mut commands, DEFAULT_CAMERA_POSITION);

    // The WASM build fades the canvas element itself.
    #[cfg(not(target_arch = "wasm32"))]
    {
        crate::engine::canvas::spawn_canvas_fade_overlay(&mut commands);
    }
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
