//! Manifest and model loading.
//!
//! The manifest names the glTF model and stage settings; once it is parsed
//! the model scene is requested and spawned under the emblem root. Loading
//! finishes when the scene instance is ready for classification.

/// Emblem manifest asset and the system that requests the model.
pub mod manifest_loader;

/// Scene readiness tracking for the spawned emblem model.
pub mod model_loader;

/// Loading milestones shared by the loading systems.
pub mod progress;
