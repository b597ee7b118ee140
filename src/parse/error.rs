use thiserror::Error;

/// Errors raised when the token stream does not form a well-shaped document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("duplicate key '{key}' (line {line}, column {column})")]
    DuplicateKey { key: String, line: u32, column: u32 },

    #[error("unexpected indentation (line {line}, column {column}); nothing opens a block here")]
    UnexpectedIndent { line: u32, column: u32 },

    #[error("expected a 'key:' entry (line {line}, column {column})")]
    ExpectedKey { line: u32, column: u32 },

    #[error("expected a '-' sequence item (line {line}, column {column})")]
    ExpectedItem { line: u32, column: u32 },

    #[error(
        "sequence item is not allowed here (line {line}, column {column}); \
         sequence items belong in an indented block under a key"
    )]
    UnexpectedItem { line: u32, column: u32 },
}
