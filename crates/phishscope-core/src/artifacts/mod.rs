//! Versioned model artifacts.
//!
//! Every artifact is a JSON document with a small envelope:
//!
//! ```json
//! { "kind": "standard_scaler", "format_version": "1.0.0", "mean": [...], "scale": [...] }
//! ```
//!
//! The envelope is checked before the body is decoded so a mixed-up file
//! reports a [`ArtifactError::WrongKind`] instead of an opaque JSON error.
//! Artifacts are trusted input; pin a SHA-256 digest in [`ArtifactPaths`]
//! to detect tampering or version drift.

mod paths;

use std::fmt;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use semver::{Version, VersionReq};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub use paths::{ArtifactDigests, ArtifactManifest, ArtifactPaths};

use crate::error::ArtifactError;

/// Artifact format versions this build can read.
pub static SUPPORTED_FORMAT: Lazy<VersionReq> =
    Lazy::new(|| VersionReq::parse("^1").expect("Invalid version requirement"));

/// The three artifacts that make up a model bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Classifier,
    Vectorizer,
    Scaler,
}

impl ArtifactKind {
    pub fn name(&self) -> &'static str {
        match self {
            ArtifactKind::Classifier => "classifier",
            ArtifactKind::Vectorizer => "vectorizer",
            ArtifactKind::Scaler => "scaler",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A JSON artifact body tagged with its envelope `kind`.
pub trait ArtifactFormat: DeserializeOwned {
    /// Value of the envelope's `kind` field.
    const KIND: &'static str;
}

#[derive(Deserialize)]
struct Envelope {
    kind: String,
    format_version: String,
}

/// Reads an artifact file, verifying the pinned digest when given.
pub fn read_artifact<T: ArtifactFormat>(
    path: &Path,
    pinned_digest: Option<&str>,
) -> Result<T, ArtifactError> {
    let bytes = read_verified(path, pinned_digest)?;
    decode_artifact(&bytes)
}

/// Decodes an artifact from bytes after checking its envelope.
pub fn decode_artifact<T: ArtifactFormat>(bytes: &[u8]) -> Result<T, ArtifactError> {
    let envelope: Envelope = serde_json::from_slice(bytes)?;
    if envelope.kind != T::KIND {
        return Err(ArtifactError::WrongKind {
            expected: T::KIND,
            found: envelope.kind,
        });
    }
    check_version(&envelope.format_version)?;
    Ok(serde_json::from_slice(bytes)?)
}

fn check_version(raw: &str) -> Result<(), ArtifactError> {
    let version =
        Version::parse(raw).map_err(|e| ArtifactError::InvalidVersion(raw.to_string(), e))?;
    if !SUPPORTED_FORMAT.matches(&version) {
        return Err(ArtifactError::UnsupportedVersion {
            found: version,
            supported: SUPPORTED_FORMAT.clone(),
        });
    }
    Ok(())
}

/// Reads a file in one shot, then checks it against the pinned digest.
pub fn read_verified(path: &Path, pinned_digest: Option<&str>) -> Result<Vec<u8>, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(expected) = pinned_digest {
        let actual = sha256_hex(&bytes);
        if !actual.eq_ignore_ascii_case(expected.trim()) {
            tracing::warn!(path = %path.display(), "Rejected artifact with unexpected digest");
            return Err(ArtifactError::DigestMismatch {
                path: path.to_path_buf(),
                expected: expected.to_string(),
                actual,
            });
        }
    }

    Ok(bytes)
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[derive(Debug, Deserialize)]
    struct Dummy {
        value: u32,
    }

    impl ArtifactFormat for Dummy {
        const KIND: &'static str = "dummy";
    }

    #[test]
    fn decodes_matching_envelope() {
        let json = br#"{"kind": "dummy", "format_version": "1.2.0", "value": 7}"#;
        let dummy: Dummy = decode_artifact(json).unwrap();
        assert_eq!(dummy.value, 7);
    }

    #[test]
    fn rejects_wrong_kind() {
        let json = br#"{"kind": "standard_scaler", "format_version": "1.0.0", "value": 7}"#;
        let err = decode_artifact::<Dummy>(json).unwrap_err();
        assert!(matches!(err, ArtifactError::WrongKind { expected: "dummy", .. }));
    }

    #[test]
    fn rejects_future_major_version() {
        let json = br#"{"kind": "dummy", "format_version": "2.0.0", "value": 7}"#;
        let err = decode_artifact::<Dummy>(json).unwrap_err();
        assert!(matches!(err, ArtifactError::UnsupportedVersion { .. }));
    }

    #[test]
    fn rejects_malformed_version() {
        let json = br#"{"kind": "dummy", "format_version": "one", "value": 7}"#;
        let err = decode_artifact::<Dummy>(json).unwrap_err();
        assert!(matches!(err, ArtifactError::InvalidVersion(..)));
    }

    #[test]
    fn rejects_missing_envelope() {
        let err = decode_artifact::<Dummy>(br#"{"value": 7}"#).unwrap_err();
        assert!(matches!(err, ArtifactError::Json(_)));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = read_verified(Path::new("nonexistent/artifact.json"), None).unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound(_)));
    }

    #[test]
    fn digest_pinning() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();
        let good = "2CF24DBA5FB0A30E26E83B2AC5B9E29E1B161E5C1FA7425E73043362938B9824";

        assert!(read_verified(file.path(), Some(good)).is_ok());

        let err = read_verified(file.path(), Some("00")).unwrap_err();
        assert!(matches!(err, ArtifactError::DigestMismatch { .. }));
    }

    #[test]
    fn sha256_hex_is_lowercase() {
        assert_eq!(
            sha256_hex(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
