//! Tokenizer: raw SDL text to an indentation-aware token stream.
//!
//! Lines are scanned one at a time. Leading spaces drive an indent stack that
//! emits `Indent`/`Dedent` tokens; the remainder of each line is parsed by the
//! winnow grammar in [`grammar`] into `Key`, `Scalar`, and `Dash` tokens.
//! Blank lines and `#` comments produce no tokens. The stream always ends
//! with dedents closing every open level followed by a single `Eof`.

mod error;
mod grammar;

pub use error::LexError;

use std::collections::VecDeque;

use winnow::combinator::opt;
use winnow::prelude::*;

use crate::types::Scalar;

/// A single lexical token with its 1-based source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A mapping key, without its trailing colon.
    Key(String),
    /// A typed scalar value.
    Scalar(Scalar),
    /// The `-` marker opening a sequence item.
    Dash,
    Indent,
    Dedent,
    Newline,
    Eof,
}

/// Tokenize SDL text into a lazy stream of tokens.
///
/// The stream is finite and not restartable: after `Eof` (or the first error)
/// it yields `None` forever.
pub fn tokenize(input: &str) -> Tokens<'_> {
    Tokens {
        lines: input.lines().enumerate(),
        indents: vec![0],
        queue: VecDeque::new(),
        last_line: 0,
        done: false,
    }
}

/// Lazy token stream over borrowed source text.
#[derive(Debug)]
pub struct Tokens<'i> {
    lines: std::iter::Enumerate<std::str::Lines<'i>>,
    indents: Vec<usize>,
    queue: VecDeque<Token>,
    last_line: u32,
    done: bool,
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tok) = self.queue.pop_front() {
                return Some(Ok(tok));
            }
            if self.done {
                return None;
            }
            let Some((idx, raw)) = self.lines.next() else {
                self.finish();
                continue;
            };
            let line = idx as u32 + 1;
            self.last_line = line;
            if let Err(err) = self.scan_line(line, raw) {
                self.done = true;
                self.queue.clear();
                return Some(Err(err));
            }
        }
    }
}

impl Tokens<'_> {
    /// Close all open indentation levels and emit the final `Eof`.
    fn finish(&mut self) {
        let line = self.last_line + 1;
        while self.indents.len() > 1 {
            self.indents.pop();
            self.queue.push_back(Token {
                kind: TokenKind::Dedent,
                line,
                column: 1,
            });
        }
        self.queue.push_back(Token {
            kind: TokenKind::Eof,
            line,
            column: 1,
        });
        self.done = true;
    }

    /// Scan one line into the queue. Blank and comment-only lines add nothing.
    fn scan_line(&mut self, line: u32, raw: &str) -> Result<(), LexError> {
        let trimmed = raw.trim_end();
        let mut width = 0;
        for (i, ch) in trimmed.char_indices() {
            match ch {
                ' ' => width += 1,
                '\t' => {
                    return Err(LexError::TabIndent {
                        line,
                        column: i as u32 + 1,
                    })
                }
                _ => break,
            }
        }
        let content = &trimmed[width..];
        if content.is_empty() || content.starts_with('#') {
            return Ok(());
        }

        self.balance_indent(line, width)?;
        self.scan_content(line, width, content)?;
        self.queue.push_back(Token {
            kind: TokenKind::Newline,
            line,
            column: trimmed.len() as u32 + 1,
        });
        Ok(())
    }

    fn balance_indent(&mut self, line: u32, width: usize) -> Result<(), LexError> {
        let current = self.indents.last().copied().unwrap_or(0);
        if width > current {
            self.indents.push(width);
            self.queue.push_back(Token {
                kind: TokenKind::Indent,
                line,
                column: 1,
            });
        } else if width < current {
            loop {
                let top = self.indents.last().copied().unwrap_or(0);
                if top == width {
                    break;
                }
                if top < width || self.indents.len() == 1 {
                    return Err(LexError::InconsistentIndent {
                        line,
                        column: width as u32 + 1,
                    });
                }
                self.indents.pop();
                self.queue.push_back(Token {
                    kind: TokenKind::Dedent,
                    line,
                    column: 1,
                });
            }
        }
        Ok(())
    }

    fn scan_content(&mut self, line: u32, indent: usize, content: &str) -> Result<(), LexError> {
        let column = indent as u32 + 1;

        // Sequence item marker.
        if content == "-" || content.starts_with("- ") {
            self.queue.push_back(Token {
                kind: TokenKind::Dash,
                line,
                column,
            });
            let rest = content[1..].trim_start();
            let rest_column = (indent + content.len() - rest.len()) as u32 + 1;
            if rest.is_empty() || rest.starts_with('#') {
                return Ok(());
            }
            if looks_like_key(rest) {
                return Err(LexError::CompactMapping {
                    line,
                    column: rest_column,
                });
            }
            return self.scan_scalar(line, rest_column, rest);
        }

        // `key:` or `key: value`.
        let mut input = content;
        if let Ok(Some(name)) = opt(grammar::key_prefix).parse_next(&mut input) {
            self.queue.push_back(Token {
                kind: TokenKind::Key(name),
                line,
                column,
            });
            let value = input.trim_start();
            if value.is_empty() || value.starts_with('#') {
                return Ok(());
            }
            let value_column = (indent + content.len() - value.len()) as u32 + 1;
            return self.scan_scalar(line, value_column, value);
        }

        // A bare scalar line; the parser decides whether it is legal here.
        self.scan_scalar(line, column, content)
    }

    /// Scan a scalar occupying the remainder of a line.
    fn scan_scalar(&mut self, line: u32, column: u32, text: &str) -> Result<(), LexError> {
        let scalar = if text.starts_with('"') || text.starts_with('\'') {
            let mut input = text;
            let s = grammar::quoted
                .parse_next(&mut input)
                .map_err(|_| LexError::UnterminatedQuote { line, column })?;
            let trailing = input.trim_start();
            if !trailing.is_empty() && !trailing.starts_with('#') {
                let at = column + (text.len() - trailing.len()) as u32;
                return Err(LexError::TrailingContent { line, column: at });
            }
            Scalar::Str(s)
        } else {
            let cut = match text.find(" #") {
                Some(i) => text[..i].trim_end(),
                None => text,
            };
            grammar::classify(cut)
        };
        self.queue.push_back(Token {
            kind: TokenKind::Scalar(scalar),
            line,
            column,
        });
        Ok(())
    }
}

fn looks_like_key(text: &str) -> bool {
    let mut input = text;
    matches!(opt(grammar::key_prefix).parse_next(&mut input), Ok(Some(_)))
}
