//! Scaling of the numeric count block.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::artifacts::{self, ArtifactFormat};
use crate::error::{ensure_width, ArtifactError, MismatchStage, Result};

/// Scales a numeric row of fixed width.
pub trait NumericScaler: Send + Sync {
    /// Width accepted and produced by [`transform`](Self::transform).
    fn width(&self) -> usize;

    /// Scales one row.
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>>;
}

/// `standard_scaler` artifact body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StandardScalerArtifact {
    #[serde(default)]
    mean: Option<Vec<f64>>,
    #[serde(default)]
    scale: Option<Vec<f64>>,
}

impl ArtifactFormat for StandardScalerArtifact {
    const KIND: &'static str = "standard_scaler";
}

/// Standardizes features as `(x - mean) / scale`.
///
/// Either part may be absent (the scaler was fit without centering or
/// without scaling). A zero scale is treated as one.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Option<Vec<f64>>,
    scale: Option<Vec<f64>>,
    width: usize,
}

impl StandardScaler {
    /// Creates a scaler from fitted statistics.
    pub fn new(
        mean: Option<Vec<f64>>,
        scale: Option<Vec<f64>>,
    ) -> std::result::Result<Self, ArtifactError> {
        let width = match (&mean, &scale) {
            (Some(m), Some(s)) if m.len() != s.len() => {
                return Err(ArtifactError::Invalid(format!(
                    "scaler mean has {} entries but scale has {}",
                    m.len(),
                    s.len()
                )));
            }
            (Some(m), _) => m.len(),
            (None, Some(s)) => s.len(),
            (None, None) => {
                return Err(ArtifactError::Invalid(
                    "scaler needs a mean or a scale".to_string(),
                ));
            }
        };

        let all_finite = mean
            .iter()
            .chain(scale.iter())
            .flatten()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(ArtifactError::Invalid(
                "scaler statistics must be finite".to_string(),
            ));
        }

        Ok(Self { mean, scale, width })
    }

    /// Loads a `standard_scaler` artifact.
    pub fn load(
        path: &Path,
        pinned_digest: Option<&str>,
    ) -> std::result::Result<Self, ArtifactError> {
        let artifact: StandardScalerArtifact = artifacts::read_artifact(path, pinned_digest)?;
        let scaler = Self::new(artifact.mean, artifact.scale)?;
        tracing::debug!(path = %path.display(), width = scaler.width, "Loaded standard scaler");
        Ok(scaler)
    }
}

impl NumericScaler for StandardScaler {
    fn width(&self) -> usize {
        self.width
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        ensure_width(MismatchStage::Scaler, self.width, row.len())?;

        let scaled = row
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let centered = match &self.mean {
                    Some(mean) => x - mean[i],
                    None => x,
                };
                match &self.scale {
                    Some(scale) if scale[i] != 0.0 => centered / scale[i],
                    _ => centered,
                }
            })
            .collect();
        Ok(scaled)
    }
}
