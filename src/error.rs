use thiserror::Error;

use crate::lex::LexError;
use crate::parse::StructureError;
use crate::validate::ValidationError;

/// Unified error type covering every stage of the parse pipeline.
///
/// Returned by [`parse_sdl()`](crate::parse_sdl) and the convenience
/// constructors on [`ScenarioDocument`](crate::ScenarioDocument). Every
/// variant is recoverable: the engine never panics across its boundary, and
/// the caller may retry with corrected input.
#[derive(Debug, Error)]
pub enum SdlError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An internal invariant was broken; indicates a bug in the engine.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_errors_display_transparently() {
        let err = SdlError::from(LexError::TabIndent { line: 1, column: 1 });
        assert_eq!(
            err.to_string(),
            "tab character in indentation (line 1, column 1); indent with spaces"
        );

        let err = SdlError::from(ValidationError::MissingName);
        assert_eq!(err.to_string(), "scenario is missing required field 'name'");
    }

    #[test]
    fn internal_error_message() {
        let err = SdlError::Internal("frame stack exhausted".into());
        assert_eq!(err.to_string(), "internal error: frame stack exhausted");
    }
}
