use winnow::combinator::alt;
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use crate::types::Scalar;

// -- Keys -------------------------------------------------------------------

/// Bareword key: alphanumeric or `_` start, then word chars plus `-` and `.`.
fn bare_key<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.'
        }),
    )
        .take()
        .parse_next(input)
}

/// A mapping key with its trailing colon. The colon must end the line or be
/// followed by whitespace, otherwise the text is a plain scalar (`a:b`).
pub(super) fn key_prefix(input: &mut &str) -> ModalResult<String> {
    let name = alt((quoted, bare_key.map(str::to_owned))).parse_next(input)?;
    ':'.parse_next(input)?;
    if !input.is_empty() {
        one_of([' ', '\t']).parse_next(input)?;
    }
    Ok(name)
}

// -- Quoted scalars ---------------------------------------------------------

fn double_quoted(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

/// Single quotes carry no escapes; the text runs to the closing quote.
fn single_quoted(input: &mut &str) -> ModalResult<String> {
    '\''.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        if ch == '\'' {
            return Ok(s);
        }
        s.push(ch);
    }
}

pub(super) fn quoted(input: &mut &str) -> ModalResult<String> {
    alt((double_quoted, single_quoted)).parse_next(input)
}

// -- Unquoted scalar typing -------------------------------------------------

/// Type an unquoted scalar the way the SDL corpus expects: explicit null
/// spellings, booleans, then integers and floats, and string for everything
/// else. Timestamps stay strings here; the validator gives them a type.
pub(super) fn classify(raw: &str) -> Scalar {
    match raw {
        "" | "~" | "null" | "Null" | "NULL" => Scalar::Null,
        "true" | "True" | "TRUE" => Scalar::Bool(true),
        "false" | "False" | "FALSE" => Scalar::Bool(false),
        _ => {
            if let Ok(i) = raw.parse::<i64>() {
                return Scalar::Int(i);
            }
            if looks_numeric(raw) {
                if let Ok(f) = raw.parse::<f64>() {
                    return Scalar::Float(f);
                }
            }
            Scalar::Str(raw.to_owned())
        }
    }
}

// Guards the f64 parse so that words Rust accepts ("inf", "NaN") stay strings.
fn looks_numeric(raw: &str) -> bool {
    raw.contains(|c: char| c.is_ascii_digit())
        && raw
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
}
