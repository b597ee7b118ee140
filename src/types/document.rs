use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SdlError;

use super::node::Node;

/// A fully bound and validated scenario.
///
/// Every known field is always present in serialized output: absent optional
/// fields appear as explicit `null`, never omitted. Downstream consumers rely
/// on field presence, so the `Option` fields are serialized unconditionally.
/// Keys outside the known schema are carried in `extra` and flatten back into
/// the object in their original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub infrastructure: Option<Node>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Node>,
}

/// The root result shape: `{ "scenario": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDocument {
    pub scenario: Scenario,
}

impl ScenarioDocument {
    /// Parse and validate SDL text.
    ///
    /// # Errors
    ///
    /// Returns [`SdlError`] describing the first failure in the pipeline.
    pub fn from_sdl(input: &str) -> Result<Self, SdlError> {
        crate::parse_sdl(input)
    }

    /// Read a file and parse its contents as SDL.
    ///
    /// # Errors
    ///
    /// Returns [`SdlError`] on I/O failure or any parse/validation failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SdlError> {
        let text = fs::read_to_string(path)?;
        crate::parse_sdl(&text)
    }
}
