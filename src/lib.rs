//! Parsing engine for the Scenario Definition Language (SDL).
//!
//! SDL is a YAML-subset text format describing a scenario: a name, an
//! optional time window, a description, and an infrastructure block. This
//! crate turns SDL text into a validated [`ScenarioDocument`] or a
//! descriptive [`SdlError`], optionally wrapped in a JSON success/error
//! [`Envelope`].
//!
//! The pipeline is a pure transform with no retained state, so independent
//! call sites may parse concurrently without locking.
//!
//! ```
//! use sdl_engine::parse_sdl;
//!
//! let doc = parse_sdl(
//!     "name: test-scenario\nstart: 2022-01-20T13:00:00Z\nend: 2022-01-20T23:00:00Z",
//! )
//! .unwrap();
//! assert_eq!(doc.scenario.name, "test-scenario");
//! assert!(doc.scenario.description.is_none());
//! ```

mod bind;
mod envelope;
mod error;
mod lex;
mod parse;
mod types;
mod validate;

pub use envelope::Envelope;
pub use error::SdlError;
pub use lex::{tokenize, LexError, Token, TokenKind, Tokens};
pub use parse::StructureError;
pub use types::{Node, NodeKind, Scalar, Scenario, ScenarioDocument, Span};
pub use validate::ValidationError;

/// Parse and validate SDL text into a [`ScenarioDocument`].
///
/// # Errors
///
/// Returns [`SdlError`] describing the first failure in the pipeline; no
/// partial result is produced.
pub fn parse_sdl(input: &str) -> Result<ScenarioDocument, SdlError> {
    let tree = parse::parse(lex::tokenize(input))?;
    let bound = bind::bind(&tree)?;
    Ok(validate::validate(bound)?)
}

/// Parse SDL text into the generic [`Node`] tree, without schema binding or
/// validation. The root is always a mapping.
///
/// # Errors
///
/// Returns [`SdlError`] if tokenizing or structural parsing fails.
pub fn parse_tree(input: &str) -> Result<Node, SdlError> {
    parse::parse(lex::tokenize(input))
}

/// Parse SDL text and wrap the outcome in an [`Envelope`]. Never fails.
#[must_use]
pub fn parse_to_envelope(input: &str) -> Envelope {
    Envelope::from_result(parse_sdl(input))
}
