use crate::engine::loading::progress::LoadingProgress;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    /// Waiting for the manifest, the model scene and classification.
    #[default]
    Loading,
    /// Fragments classified; the emblem reacts to input every frame.
    Running,
    /// Torn down by the host. Nothing animates or reacts any more.
    Unmounted,
}

// Final transition once the model has been classified
pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.fragments_classified {
        info!("→ Transitioning to Running state");
        next_state.set(AppState::Running);
    }
}
