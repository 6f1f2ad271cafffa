//! Subcommand implementations.
//!
//! Output goes to the given writer so commands can be exercised in tests;
//! logs go through `tracing` and never mix with it.

use std::io::Write;

use anyhow::Context;
use serde::Serialize;

use phishscope_core::features::extract_doc;
use phishscope_core::{ArtifactPaths, Pipeline, UrlFeatures, UrlParts};
use phishscope_server::{AppState, Server, ServerConfig};

/// Classifies each URL and writes one line per URL.
pub fn check<W: Write>(
    paths: &ArtifactPaths,
    urls: &[String],
    json: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let pipeline = Pipeline::load(paths).context("failed to load model artifacts")?;

    for url in urls {
        let prediction = pipeline
            .predict(url)
            .with_context(|| format!("failed to classify {:?}", url))?;

        if json {
            serde_json::to_writer(&mut *out, &CheckOutput { url, prediction: &prediction })?;
            writeln!(out)?;
        } else {
            writeln!(out, "Prediction Label: {}", prediction.label)?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    url: &'a str,
    #[serde(flatten)]
    prediction: &'a phishscope_core::Prediction,
}

/// What the pipeline sees for a URL before any model is involved.
#[derive(Debug, Serialize)]
pub struct Inspection {
    pub url: String,
    /// `None` when the URL did not match the structural pattern.
    pub parts: Option<UrlParts>,
    pub document: String,
    pub features: UrlFeatures,
}

impl Inspection {
    pub fn of(url: &str) -> Self {
        let parts = phishscope_core::parse(url);
        let features = UrlFeatures::from_parts(url, parts.as_ref());
        Self {
            url: url.to_string(),
            parts,
            document: extract_doc(url),
            features,
        }
    }
}

/// Writes the parsed components and features of `url` as JSON.
pub fn inspect<W: Write>(url: &str, out: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &Inspection::of(url))?;
    writeln!(out)?;
    Ok(())
}

/// Loads the model and serves the HTTP API until shutdown.
pub async fn serve(paths: &ArtifactPaths, host: String, port: u16) -> anyhow::Result<()> {
    let state = AppState::load(paths).context("failed to load model artifacts")?;
    let config = ServerConfig::default().with_host(host).with_port(port);
    let server = Server::with_state(config, state)?;
    server.run().await?;
    Ok(())
}
