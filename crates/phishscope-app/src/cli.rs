//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use phishscope_core::ArtifactPaths;
use phishscope_server::{DEFAULT_HOST, DEFAULT_PORT};

/// PhishScope - classify URLs as phishing or legitimate
#[derive(Parser, Debug)]
#[command(name = "phishscope", version, about)]
pub struct Args {
    /// Directory holding model.json, vectorizer.json and scaler.json (or a manifest.json)
    #[arg(long, global = true)]
    pub models_dir: Option<PathBuf>,

    /// Override the classifier artifact (.json forest or .onnx)
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    /// Override the vectorizer artifact
    #[arg(long, global = true)]
    pub vectorizer: Option<PathBuf>,

    /// Override the scaler artifact
    #[arg(long, global = true)]
    pub scaler: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Classify one or more URLs
    Check {
        /// URLs to classify
        #[arg(required = true)]
        urls: Vec<String>,

        /// Print one JSON object per URL instead of the label line
        #[arg(long)]
        json: bool,
    },

    /// Show the parsed components and features of a URL (no model needed)
    Inspect {
        /// URL to inspect
        url: String,
    },

    /// Run the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,

        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

impl Args {
    /// Effective log level, taking `--debug` into account.
    pub fn log_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.log_level
        }
    }

    /// Resolves artifact locations from the flags.
    ///
    /// Without `--models-dir` the per-user data directory is used. Per-file
    /// flags override whatever the directory (or its manifest) names.
    pub fn artifact_paths(&self) -> anyhow::Result<ArtifactPaths> {
        let dir = self
            .models_dir
            .clone()
            .or_else(ArtifactPaths::default_dir)
            .unwrap_or_else(|| PathBuf::from("models"));

        let mut paths = ArtifactPaths::discover(&dir)?;
        if let Some(model) = &self.model {
            paths = paths.with_model(model);
        }
        if let Some(vectorizer) = &self.vectorizer {
            paths = paths.with_vectorizer(vectorizer);
        }
        if let Some(scaler) = &self.scaler {
            paths = paths.with_scaler(scaler);
        }
        Ok(paths)
    }
}
