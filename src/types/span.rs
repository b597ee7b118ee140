use std::fmt;

/// A 1-based line/column position in the source text.
///
/// Positions are diagnostic metadata: they ride along on tokens and nodes so
/// errors can point at the offending text, but they are excluded from
/// equality and never serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Span::new(3, 7).to_string(), "line 3, column 7");
    }
}
