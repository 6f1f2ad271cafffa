//! Feature vector assembly.
//!
//! Layout of an assembled vector of width `W1 + 13`:
//!
//! | Offset        | Width | Contents                                          |
//! |---------------|-------|---------------------------------------------------|
//! | `0`           | `W1`  | text vectorizer row                               |
//! | `W1`          | 5     | vowels %, consonants %, is_ip, has_port, has_user |
//! | `W1 + 5`      | 8     | scaled counts (see [`UrlFeatures::numeric_block`]) |

use serde::Serialize;

use crate::bundle::ModelBundle;
use crate::error::{ensure_width, MismatchStage, Result};
use crate::features::{self, UrlFeatures, NUMERIC_BLOCK_WIDTH, SCALAR_BLOCK_WIDTH};
use crate::url_parts::{self, UrlParts};

/// Fixed-order numeric vector handed to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Concatenates the text row, the scalar block and the scaled count block.
///
/// `scaled_block` must already be the scaler's output for the URL's count
/// block; this function does no scaling of its own.
pub fn assemble(
    raw: &str,
    parsed: Option<&UrlParts>,
    text_row: &[f64],
    scaled_block: &[f64],
) -> Result<FeatureVector> {
    let scalars = UrlFeatures::from_parts(raw, parsed).scalar_block();
    concat_blocks(text_row, &scalars, scaled_block)
}

fn concat_blocks(
    text_row: &[f64],
    scalars: &[f64; SCALAR_BLOCK_WIDTH],
    scaled_block: &[f64],
) -> Result<FeatureVector> {
    ensure_width(MismatchStage::Scaler, NUMERIC_BLOCK_WIDTH, scaled_block.len())?;

    let mut values =
        Vec::with_capacity(text_row.len() + SCALAR_BLOCK_WIDTH + NUMERIC_BLOCK_WIDTH);
    values.extend_from_slice(text_row);
    values.extend_from_slice(scalars);
    values.extend_from_slice(scaled_block);
    Ok(FeatureVector(values))
}

/// Builds feature vectors for a loaded [`ModelBundle`].
///
/// Every collaborator output is checked against the width the bundle was
/// validated with, so a mismatched artifact is reported where it happens.
pub struct FeatureAssembler<'a> {
    bundle: &'a ModelBundle,
}

impl<'a> FeatureAssembler<'a> {
    pub fn new(bundle: &'a ModelBundle) -> Self {
        Self { bundle }
    }

    /// Width of every vector this assembler produces.
    pub fn expected_width(&self) -> usize {
        self.bundle.feature_width()
    }

    /// Builds the feature vector for `raw`.
    pub fn build(&self, raw: &str) -> Result<FeatureVector> {
        self.build_explained(raw).map(|(vector, _)| vector)
    }

    /// Builds the feature vector along with the unscaled features behind it.
    pub fn build_explained(&self, raw: &str) -> Result<(FeatureVector, UrlFeatures)> {
        let parsed = url_parts::parse(raw);
        let features = UrlFeatures::from_parts(raw, parsed.as_ref());

        let vectorizer = self.bundle.vectorizer();
        let text_row = vectorizer.transform(&features::extract_doc(raw))?;
        ensure_width(MismatchStage::Vectorizer, vectorizer.width(), text_row.len())?;

        let scaled = self.bundle.scaler().transform(&features.numeric_block())?;
        let vector = concat_blocks(&text_row, &features.scalar_block(), &scaled)?;
        ensure_width(
            MismatchStage::Classifier,
            self.bundle.classifier().n_features(),
            vector.len(),
        )?;

        Ok((vector, features))
    }
}
