use crate::engine::loading::progress::LoadingProgress;
use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::scene::SceneInstance;

/// Handles for the model scene requested from the manifest.
#[derive(Resource, Default)]
pub struct ModelLoader {
    pub scene: Option<Handle<Scene>>,
    pub root: Option<Entity>,
}

// Wait until the scene instance under the emblem root has been spawned
pub fn check_model_ready(
    mut loading_progress: ResMut<LoadingProgress>,
    model_loader: Res<ModelLoader>,
    asset_server: Res<AssetServer>,
    scene_spawner: Res<SceneSpawner>,
    instances: Query<&SceneInstance>,
) {
    if loading_progress.scene_ready || loading_progress.load_failed {
        return;
    }

    let (Some(scene), Some(root)) = (model_loader.scene.as_ref(), model_loader.root) else {
        return;
    };

    if let LoadState::Failed(error) = asset_server.load_state(scene.id()) {
        // Loading is the asset collaborator's concern; stay in Loading.
        error!("Emblem model failed to load: {}", error);
        loading_progress.load_failed = true;
        return;
    }

    let Ok(instance) = instances.get(root) else {
        return;
    };

    if scene_spawner.instance_is_ready(**instance) {
        info!("✓ Emblem scene instance ready");
        loading_progress.scene_ready = true;
    }
}
