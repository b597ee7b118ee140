//! Result encoder: wrap a parse outcome in a self-describing JSON envelope.

use serde::{Deserialize, Serialize};

use crate::error::SdlError;
use crate::types::ScenarioDocument;

/// Canned response used when envelope serialization itself fails.
const FALLBACK: &str = r#"{"status":"ERROR","errorMessage":"failed to serialize response to JSON"}"#;

/// The success/error wrapper returned for every parse call.
///
/// Exactly one of the two shapes is ever produced:
/// `{"status":"OK","result":{...}}` or
/// `{"status":"ERROR","errorMessage":"..."}`.
///
/// The error arm is lossy on purpose: line/column details survive only as
/// text inside `errorMessage`, since the envelope schema has no structured
/// position fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Envelope {
    #[serde(rename = "OK")]
    Success { result: ScenarioDocument },
    #[serde(rename = "ERROR")]
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

impl Envelope {
    /// Wrap a pipeline outcome.
    #[must_use]
    pub fn from_result(result: Result<ScenarioDocument, SdlError>) -> Self {
        match result {
            Ok(doc) => Envelope::Success { result: doc },
            Err(err) => Envelope::Error {
                error_message: err.to_string(),
            },
        }
    }

    /// Serialize to a JSON string. Never fails: if serialization errs, a
    /// canned `ERROR` envelope is returned instead.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| FALLBACK.to_owned())
    }

    /// Decode an envelope previously produced by [`Envelope::to_json`].
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if the text is not a
    /// well-formed envelope.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }
}

impl From<Result<ScenarioDocument, SdlError>> for Envelope {
    fn from(result: Result<ScenarioDocument, SdlError>) -> Self {
        Envelope::from_result(result)
    }
}
