use thiserror::Error;

/// Errors produced while tokenizing SDL text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("tab character in indentation (line {line}, column {column}); indent with spaces")]
    TabIndent { line: u32, column: u32 },

    #[error("unindent does not match any outer indentation level (line {line}, column {column})")]
    InconsistentIndent { line: u32, column: u32 },

    #[error("unterminated quoted scalar (line {line}, column {column})")]
    UnterminatedQuote { line: u32, column: u32 },

    #[error("unexpected text after value (line {line}, column {column})")]
    TrailingContent { line: u32, column: u32 },

    #[error(
        "mapping on a sequence-item line is not supported (line {line}, column {column}); \
         place the mapping on an indented block below the '-'"
    )]
    CompactMapping { line: u32, column: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_carries_position() {
        let err = LexError::UnterminatedQuote { line: 4, column: 9 };
        assert_eq!(err.to_string(), "unterminated quoted scalar (line 4, column 9)");
    }
}
