//! Text vectorization of the URL document.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::artifacts::{self, ArtifactFormat};
use crate::error::{ArtifactError, Result};

/// Turns a document into a numeric row of fixed width.
pub trait TextVectorizer: Send + Sync {
    /// Width of every row produced by [`transform`](Self::transform).
    fn width(&self) -> usize;

    /// Vectorizes a single document.
    fn transform(&self, doc: &str) -> Result<Vec<f64>>;
}

/// Words of two or more word characters.
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("Invalid token pattern"));

/// Row normalization applied after IDF weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Norm {
    #[default]
    L2,
    L1,
    None,
}

/// `tfidf_vectorizer` artifact body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TfIdfArtifact {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    norm: Norm,
    #[serde(default)]
    sublinear_tf: bool,
}

fn default_lowercase() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

impl ArtifactFormat for TfIdfArtifact {
    const KIND: &'static str = "tfidf_vectorizer";
}

/// TF-IDF vectorizer with a fixed, pre-fit vocabulary.
///
/// Tokens are runs of two or more word characters; word n-grams are joined
/// with a single space. Terms outside the vocabulary are ignored.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    lowercase: bool,
    ngram_range: (usize, usize),
    norm: Norm,
    sublinear_tf: bool,
}

impl TfIdfVectorizer {
    /// Creates a vectorizer from a vocabulary and its IDF weights.
    ///
    /// Every vocabulary index must address an IDF weight.
    pub fn new(
        vocabulary: HashMap<String, usize>,
        idf: Vec<f64>,
    ) -> std::result::Result<Self, ArtifactError> {
        if let Some((term, &index)) = vocabulary.iter().find(|(_, &index)| index >= idf.len()) {
            return Err(ArtifactError::Invalid(format!(
                "vocabulary term {:?} has index {} but only {} idf weights",
                term,
                index,
                idf.len()
            )));
        }
        if idf.iter().any(|w| !w.is_finite()) {
            return Err(ArtifactError::Invalid("idf weights must be finite".to_string()));
        }

        Ok(Self {
            vocabulary,
            idf,
            lowercase: true,
            ngram_range: (1, 1),
            norm: Norm::L2,
            sublinear_tf: false,
        })
    }

    /// Loads a `tfidf_vectorizer` artifact.
    pub fn load(
        path: &Path,
        pinned_digest: Option<&str>,
    ) -> std::result::Result<Self, ArtifactError> {
        let artifact: TfIdfArtifact = artifacts::read_artifact(path, pinned_digest)?;
        let (min_n, max_n) = artifact.ngram_range;
        let vectorizer = Self::new(artifact.vocabulary, artifact.idf)?
            .with_lowercase(artifact.lowercase)
            .with_ngram_range(min_n, max_n)?
            .with_norm(artifact.norm)
            .with_sublinear_tf(artifact.sublinear_tf);

        tracing::debug!(
            path = %path.display(),
            width = vectorizer.idf.len(),
            "Loaded TF-IDF vectorizer"
        );
        Ok(vectorizer)
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Sets the inclusive word n-gram range.
    pub fn with_ngram_range(
        mut self,
        min_n: usize,
        max_n: usize,
    ) -> std::result::Result<Self, ArtifactError> {
        if min_n == 0 || min_n > max_n {
            return Err(ArtifactError::Invalid(format!(
                "invalid ngram range ({}, {})",
                min_n, max_n
            )));
        }
        self.ngram_range = (min_n, max_n);
        Ok(self)
    }

    pub fn with_norm(mut self, norm: Norm) -> Self {
        self.norm = norm;
        self
    }

    /// Uses `1 + ln(tf)` instead of raw term counts.
    pub fn with_sublinear_tf(mut self, sublinear_tf: bool) -> Self {
        self.sublinear_tf = sublinear_tf;
        self
    }

    /// Number of distinct terms.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Splits a document into terms, including n-grams.
    pub fn terms(&self, doc: &str) -> Vec<String> {
        let text = if self.lowercase {
            doc.to_lowercase()
        } else {
            doc.to_string()
        };
        let tokens: Vec<&str> = TOKEN_PATTERN.find_iter(&text).map(|m| m.as_str()).collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }

    fn normalize(&self, row: &mut [f64]) {
        let norm = match self.norm {
            Norm::L2 => row.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Norm::L1 => row.iter().map(|v| v.abs()).sum::<f64>(),
            Norm::None => return,
        };
        if norm > 0.0 {
            row.iter_mut().for_each(|v| *v /= norm);
        }
    }
}

impl TextVectorizer for TfIdfVectorizer {
    fn width(&self) -> usize {
        self.idf.len()
    }

    fn transform(&self, doc: &str) -> Result<Vec<f64>> {
        let mut row: Vec<f64> = vec![0.0; self.idf.len()];
        for term in self.terms(doc) {
            if let Some(&index) = self.vocabulary.get(&term) {
                row[index] += 1.0;
            }
        }

        for (index, value) in row.iter_mut().enumerate() {
            if *value > 0.0 {
                let tf = if self.sublinear_tf {
                    1.0 + value.ln()
                } else {
                    *value
                };
                *value = tf * self.idf[index];
            }
        }

        self.normalize(&mut row);
        Ok(row)
    }
}
