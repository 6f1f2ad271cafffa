//! API request and response models.

use serde::{Deserialize, Serialize};

use phishscope_core::{BundleSummary, Label, UrlFeatures};

/// Request body for POST /api/check.
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    /// The URL to classify.
    pub url: String,
    /// Include the extracted features in the response.
    #[serde(default)]
    pub explain: bool,
}

/// Response body for POST /api/check.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    /// `phishing` or `legitimate`.
    pub label: Label,
    /// Display text, e.g. "Phishing URL".
    pub label_text: String,
    /// Classification latency in milliseconds.
    pub latency_ms: u64,
    /// Unscaled features (only when requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<UrlFeatures>,
}

/// Response body for GET /api/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Response body for GET /api/model.
#[derive(Debug, Serialize)]
pub struct ModelResponse {
    #[serde(flatten)]
    pub summary: BundleSummary,
}
