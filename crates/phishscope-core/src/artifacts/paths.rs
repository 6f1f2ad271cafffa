//! Artifact locations and pinned digests.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::ArtifactKind;
use crate::error::ArtifactError;

/// Optional SHA-256 digests (hex) pinned per artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDigests {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub vectorizer: Option<String>,
    #[serde(default)]
    pub scaler: Option<String>,
}

/// On-disk `manifest.json` describing a model directory.
///
/// File names are relative to the directory holding the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    #[serde(default = "default_model_file")]
    pub model: String,
    #[serde(default = "default_vectorizer_file")]
    pub vectorizer: String,
    #[serde(default = "default_scaler_file")]
    pub scaler: String,
    #[serde(default)]
    pub digests: ArtifactDigests,
}

fn default_model_file() -> String {
    ArtifactPaths::MODEL_FILE.to_string()
}

fn default_vectorizer_file() -> String {
    ArtifactPaths::VECTORIZER_FILE.to_string()
}

fn default_scaler_file() -> String {
    ArtifactPaths::SCALER_FILE.to_string()
}

/// Where to find the classifier, vectorizer and scaler artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    /// Classifier artifact (`.json` random forest, or `.onnx` with the `ml` feature).
    pub model: PathBuf,
    /// TF-IDF vectorizer artifact.
    pub vectorizer: PathBuf,
    /// Standard scaler artifact.
    pub scaler: PathBuf,
    /// Digests checked before decoding.
    #[serde(default)]
    pub digests: ArtifactDigests,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        let dir = Self::default_dir().unwrap_or_else(|| PathBuf::from("models"));
        Self::from_dir(dir)
    }
}

impl ArtifactPaths {
    pub const MODEL_FILE: &'static str = "model.json";
    pub const VECTORIZER_FILE: &'static str = "vectorizer.json";
    pub const SCALER_FILE: &'static str = "scaler.json";
    pub const MANIFEST_FILE: &'static str = "manifest.json";

    /// Returns the per-user models directory, if one can be determined.
    pub fn default_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "phishscope", "PhishScope").map(|dirs| dirs.data_dir().join("models"))
    }

    /// Uses the default file names inside `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(Self::MODEL_FILE),
            vectorizer: dir.join(Self::VECTORIZER_FILE),
            scaler: dir.join(Self::SCALER_FILE),
            digests: ArtifactDigests::default(),
        }
    }

    /// Reads `dir/manifest.json` when present, otherwise uses default file names.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();
        let manifest_path = dir.join(Self::MANIFEST_FILE);
        if !manifest_path.exists() {
            return Ok(Self::from_dir(dir));
        }

        let bytes = super::read_verified(&manifest_path, None)?;
        let manifest: ArtifactManifest = serde_json::from_slice(&bytes)?;
        tracing::debug!(manifest = %manifest_path.display(), "Using artifact manifest");
        Ok(Self::from_manifest(dir, manifest))
    }

    /// Resolves a manifest's file names against `dir`.
    pub fn from_manifest(dir: impl AsRef<Path>, manifest: ArtifactManifest) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(manifest.model),
            vectorizer: dir.join(manifest.vectorizer),
            scaler: dir.join(manifest.scaler),
            digests: manifest.digests,
        }
    }

    pub fn with_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.model = path.into();
        self
    }

    pub fn with_vectorizer(mut self, path: impl Into<PathBuf>) -> Self {
        self.vectorizer = path.into();
        self
    }

    pub fn with_scaler(mut self, path: impl Into<PathBuf>) -> Self {
        self.scaler = path.into();
        self
    }

    /// Pins digests for all three artifacts.
    pub fn with_digests(mut self, digests: ArtifactDigests) -> Self {
        self.digests = digests;
        self
    }

    /// Returns the path of the given artifact.
    pub fn path(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Classifier => &self.model,
            ArtifactKind::Vectorizer => &self.vectorizer,
            ArtifactKind::Scaler => &self.scaler,
        }
    }

    /// Returns the pinned digest of the given artifact, if any.
    pub fn digest(&self, kind: ArtifactKind) -> Option<&str> {
        match kind {
            ArtifactKind::Classifier => self.digests.model.as_deref(),
            ArtifactKind::Vectorizer => self.digests.vectorizer.as_deref(),
            ArtifactKind::Scaler => self.digests.scaler.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn from_dir_uses_default_names() {
        let paths = ArtifactPaths::from_dir("/srv/models");
        assert_eq!(paths.model, PathBuf::from("/srv/models/model.json"));
        assert_eq!(paths.vectorizer, PathBuf::from("/srv/models/vectorizer.json"));
        assert_eq!(paths.scaler, PathBuf::from("/srv/models/scaler.json"));
        assert_eq!(paths.digest(ArtifactKind::Classifier), None);
    }

    #[test]
    fn builder_overrides_single_paths() {
        let paths = ArtifactPaths::from_dir("models").with_model("models/forest.onnx");
        assert_eq!(paths.path(ArtifactKind::Classifier), Path::new("models/forest.onnx"));
        assert_eq!(
            paths.path(ArtifactKind::Scaler),
            Path::new("models").join("scaler.json")
        );
    }

    #[test]
    fn discover_without_manifest_falls_back() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::discover(dir.path()).unwrap();
        assert_eq!(paths, ArtifactPaths::from_dir(dir.path()));
    }

    #[test]
    fn discover_reads_manifest() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("manifest.json"),
            r#"{"model": "rf_v3.json", "digests": {"scaler": "abc123"}}"#,
        )
        .unwrap();

        let paths = ArtifactPaths::discover(dir.path()).unwrap();
        assert_eq!(paths.model, dir.path().join("rf_v3.json"));
        assert_eq!(paths.vectorizer, dir.path().join("vectorizer.json"));
        assert_eq!(paths.digest(ArtifactKind::Scaler), Some("abc123"));
        assert_eq!(paths.digest(ArtifactKind::Vectorizer), None);
    }

    #[test]
    fn discover_rejects_broken_manifest() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("manifest.json"), "{not json").unwrap();
        assert!(matches!(
            ArtifactPaths::discover(dir.path()),
            Err(ArtifactError::Json(_))
        ));
    }
}
