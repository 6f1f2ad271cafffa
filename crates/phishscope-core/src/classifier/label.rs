//! Classification labels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{InferenceError, Result};

/// Outcome of classifying a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// Class code 0.
    Phishing,
    /// Class code 1.
    Legitimate,
}

impl Label {
    /// Maps a classifier output code to a label.
    ///
    /// Codes other than 0 and 1 are an error, never a default label.
    pub fn from_class_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Label::Phishing),
            1 => Ok(Label::Legitimate),
            other => Err(InferenceError::UnrecognizedClass(other)),
        }
    }

    /// Returns the class code the classifier was trained with.
    pub fn class_code(&self) -> i64 {
        match self {
            Label::Phishing => 0,
            Label::Legitimate => 1,
        }
    }

    /// Returns the human-readable label text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Phishing => "Phishing URL",
            Label::Legitimate => "Legitimate URL",
        }
    }

    pub fn is_phishing(&self) -> bool {
        matches!(self, Label::Phishing)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
