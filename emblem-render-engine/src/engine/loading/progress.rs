use bevy::prelude::*;

#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub manifest_loaded: bool,
    pub scene_ready: bool,
    pub fragments_classified: bool,
    pub load_failed: bool,
}
