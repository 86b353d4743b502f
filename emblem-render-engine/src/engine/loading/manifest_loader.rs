use crate::emblem::fragment::EmblemRoot;
use crate::engine::camera::stage_camera::{StageCamera, place_stage_camera};
use crate::engine::loading::model_loader::ModelLoader;
use crate::engine::loading::progress::LoadingProgress;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub const MANIFEST_PATH: &str = "emblem/emblem.manifest.json";

/// Emblem manifest as a Bevy asset. Mirrors the JSON structure exactly.
#[derive(Asset, TypePath, Resource, Debug, Clone, Serialize, Deserialize)]
pub struct EmblemManifest {
    /// glTF/glb path relative to the asset root.
    pub model_path: String,
    #[serde(default)]
    pub scene_index: usize,
    #[serde(default = "default_camera_position")]
    pub camera_position: [f32; 3],
    #[serde(default = "default_model_scale")]
    pub model_scale: f32,
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 0.0, 8.0]
}

fn default_model_scale() -> f32 {
    1.0
}

impl EmblemManifest {
    pub fn camera_position(&self) -> Vec3 {
        Vec3::from_array(self.camera_position)
    }
}

#[derive(Resource, Default)]
pub struct ManifestLoader {
    handle: Option<Handle<EmblemManifest>>,
}

// Start the loading process
pub fn start_loading(mut manifest_loader: ResMut<ManifestLoader>, asset_server: Res<AssetServer>) {
    info!("Loading emblem manifest from: {}", MANIFEST_PATH);
    manifest_loader.handle = Some(asset_server.load(MANIFEST_PATH));
}

// Place the camera and request the model scene once the manifest is parsed
pub fn load_manifest_system(
    mut loading_progress: ResMut<LoadingProgress>,
    manifest_loader: Res<ManifestLoader>,
    mut model_loader: ResMut<ModelLoader>,
    manifests: Res<Assets<EmblemManifest>>,
    asset_server: Res<AssetServer>,
    mut cameras: Query<(&mut Transform, &mut StageCamera)>,
    mut commands: Commands,
) {
    if loading_progress.manifest_loaded {
        return;
    }

    let Some(handle) = manifest_loader.handle.as_ref() else {
        return;
    };
    let Some(manifest) = manifests.get(handle) else {
        return;
    };

    info!("✓ Manifest loaded, model: {}", manifest.model_path);
    commands.insert_resource(manifest.clone());
    loading_progress.manifest_loaded = true;

    if let Ok((mut transform, mut stage_camera)) = cameras.single_mut() {
        place_stage_camera(&mut transform, &mut stage_camera, manifest.camera_position());
    }

    let scene = asset_server
        .load(GltfAssetLabel::Scene(manifest.scene_index).from_asset(manifest.model_path.clone()));
    model_loader.scene = Some(scene.clone());

    let root = commands
        .spawn((
            Name::new("Emblem"),
            EmblemRoot,
            SceneRoot(scene),
            Transform::from_scale(Vec3::splat(manifest.model_scale)),
        ))
        .id();
    model_loader.root = Some(root);
}
