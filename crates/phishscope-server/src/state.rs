//! Application state for the API server.

use phishscope_core::{ArtifactPaths, ModelBundle, Pipeline};

/// Shared application state.
///
/// The pipeline holds the bundle behind an `Arc`, so cloning the state per
/// request is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Loaded classification pipeline.
    pub pipeline: Pipeline,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    /// Creates application state from an already built bundle.
    pub fn with_bundle(bundle: ModelBundle) -> Self {
        Self::new(Pipeline::new(bundle))
    }

    /// Loads the model artifacts and creates application state.
    pub fn load(paths: &ArtifactPaths) -> phishscope_core::Result<Self> {
        Pipeline::load(paths).map(Self::new)
    }
}
