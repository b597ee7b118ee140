//! Schema validation: required fields, timestamp parsing, range checks.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::bind::BoundScenario;
use crate::types::{Node, NodeKind, Scalar, Scenario, ScenarioDocument};

/// Schema validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("scenario is missing required field 'name'")]
    MissingName,

    #[error("field 'name' must be non-empty text (line {line}, column {column})")]
    EmptyName { line: u32, column: u32 },

    #[error("field '{field}' must be text, found {found} (line {line}, column {column})")]
    NotText {
        field: &'static str,
        found: String,
        line: u32,
        column: u32,
    },

    #[error(
        "invalid timestamp in field '{field}': '{literal}' is not RFC 3339 \
         (line {line}, column {column})"
    )]
    InvalidTimestamp {
        field: &'static str,
        literal: String,
        line: u32,
        column: u32,
    },

    #[error("invalid time range: end '{end}' precedes start '{start}'")]
    InvalidRange { start: String, end: String },

    #[error("field 'infrastructure' must be a mapping or sequence (line {line}, column {column})")]
    InfrastructureNotStructured { line: u32, column: u32 },

    #[error("field 'scenario' must be a mapping (line {line}, column {column})")]
    ScenarioNotMapping { line: u32, column: u32 },
}

/// Check the bound fields and produce the final typed document.
pub(crate) fn validate(bound: BoundScenario) -> Result<ScenarioDocument, ValidationError> {
    let name = required_name(bound.name)?;
    let start = timestamp("start", bound.start)?;
    let end = timestamp("end", bound.end)?;
    if let (Some(s), Some(e)) = (&start, &end) {
        if e < s {
            return Err(ValidationError::InvalidRange {
                start: s.to_rfc3339(),
                end: e.to_rfc3339(),
            });
        }
    }
    let description = optional_text("description", bound.description)?;
    let infrastructure = structured(bound.infrastructure)?;

    Ok(ScenarioDocument {
        scenario: Scenario {
            name,
            start,
            end,
            description,
            infrastructure,
            extra: bound.extra,
        },
    })
}

fn required_name(node: Option<Node>) -> Result<String, ValidationError> {
    let Some(node) = node else {
        return Err(ValidationError::MissingName);
    };
    let span = node.span;
    match node.kind {
        NodeKind::Scalar(Scalar::Null) => Err(ValidationError::MissingName),
        NodeKind::Scalar(Scalar::Str(s)) if s.is_empty() => Err(ValidationError::EmptyName {
            line: span.line,
            column: span.column,
        }),
        NodeKind::Scalar(Scalar::Str(s)) => Ok(s),
        other => Err(ValidationError::NotText {
            field: "name",
            found: other.describe(),
            line: span.line,
            column: span.column,
        }),
    }
}

fn optional_text(
    field: &'static str,
    node: Option<Node>,
) -> Result<Option<String>, ValidationError> {
    let Some(node) = node else { return Ok(None) };
    let span = node.span;
    match node.kind {
        NodeKind::Scalar(Scalar::Null) => Ok(None),
        NodeKind::Scalar(Scalar::Str(s)) => Ok(Some(s)),
        other => Err(ValidationError::NotText {
            field,
            found: other.describe(),
            line: span.line,
            column: span.column,
        }),
    }
}

fn timestamp(
    field: &'static str,
    node: Option<Node>,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let Some(node) = node else { return Ok(None) };
    let span = node.span;
    let literal = match node.kind {
        NodeKind::Scalar(Scalar::Null) => return Ok(None),
        NodeKind::Scalar(scalar) => scalar.to_string(),
        other => {
            return Err(ValidationError::NotText {
                field,
                found: other.describe(),
                line: span.line,
                column: span.column,
            })
        }
    };
    match DateTime::parse_from_rfc3339(&literal) {
        Ok(dt) => Ok(Some(dt.with_timezone(&Utc))),
        Err(_) => Err(ValidationError::InvalidTimestamp {
            field,
            literal,
            line: span.line,
            column: span.column,
        }),
    }
}

fn structured(node: Option<Node>) -> Result<Option<Node>, ValidationError> {
    let Some(node) = node else { return Ok(None) };
    match &node.kind {
        NodeKind::Mapping(_) | NodeKind::Sequence(_) => Ok(Some(node)),
        NodeKind::Scalar(Scalar::Null) => Ok(None),
        NodeKind::Scalar(_) => Err(ValidationError::InfrastructureNotStructured {
            line: node.span.line,
            column: node.span.column,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::tokenize;

    fn check(input: &str) -> Result<ScenarioDocument, crate::SdlError> {
        let tree = crate::parse::parse(tokenize(input))?;
        let bound = crate::bind::bind(&tree)?;
        Ok(validate(bound)?)
    }

    #[test]
    fn minimal_valid_scenario() {
        let doc = check("name: test-scenario").unwrap();
        assert_eq!(doc.scenario.name, "test-scenario");
        assert_eq!(doc.scenario.start, None);
        assert_eq!(doc.scenario.end, None);
        assert_eq!(doc.scenario.description, None);
        assert_eq!(doc.scenario.infrastructure, None);
    }

    #[test]
    fn timestamps_parse_to_utc() {
        let doc = check("name: n\nstart: 2022-01-20T13:00:00Z\nend: 2022-01-20T23:00:00+02:00")
            .unwrap();
        let start = doc.scenario.start.unwrap();
        let end = doc.scenario.end.unwrap();
        assert_eq!(start.to_rfc3339(), "2022-01-20T13:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2022-01-20T21:00:00+00:00");
    }

    #[test]
    fn missing_name_rejected() {
        assert!(matches!(
            check("description: d").unwrap_err(),
            crate::SdlError::Validation(ValidationError::MissingName)
        ));
    }

    #[test]
    fn null_name_rejected() {
        assert!(matches!(
            check("name:").unwrap_err(),
            crate::SdlError::Validation(ValidationError::MissingName)
        ));
    }

    #[test]
    fn empty_name_rejected() {
        assert!(matches!(
            check(r#"name: """#).unwrap_err(),
            crate::SdlError::Validation(ValidationError::EmptyName { line: 1, .. })
        ));
    }

    #[test]
    fn non_text_name_rejected() {
        let err = check("name: 42").unwrap_err();
        assert!(matches!(
            err,
            crate::SdlError::Validation(ValidationError::NotText {
                field: "name",
                ..
            })
        ));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn malformed_timestamp_names_field_and_literal() {
        let err = check("name: n\nstart: not-a-date").unwrap_err();
        match err {
            crate::SdlError::Validation(ValidationError::InvalidTimestamp {
                field,
                literal,
                line,
                ..
            }) => {
                assert_eq!(field, "start");
                assert_eq!(literal, "not-a-date");
                assert_eq!(line, 2);
            }
            other => panic!("expected InvalidTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn date_without_time_is_not_rfc3339() {
        assert!(matches!(
            check("name: n\nend: 2022-01-20").unwrap_err(),
            crate::SdlError::Validation(ValidationError::InvalidTimestamp { field: "end", .. })
        ));
    }

    #[test]
    fn end_before_start_rejected() {
        assert!(matches!(
            check("name: n\nstart: 2022-01-20T23:00:00Z\nend: 2022-01-20T13:00:00Z").unwrap_err(),
            crate::SdlError::Validation(ValidationError::InvalidRange { .. })
        ));
    }

    #[test]
    fn equal_start_and_end_allowed() {
        let doc =
            check("name: n\nstart: 2022-01-20T13:00:00Z\nend: 2022-01-20T13:00:00Z").unwrap();
        assert_eq!(doc.scenario.start, doc.scenario.end);
    }

    #[test]
    fn end_without_start_allowed() {
        let doc = check("name: n\nend: 2022-01-20T13:00:00Z").unwrap();
        assert!(doc.scenario.start.is_none());
        assert!(doc.scenario.end.is_some());
    }

    #[test]
    fn null_description_is_absent() {
        let doc = check("name: n\ndescription: null").unwrap();
        assert_eq!(doc.scenario.description, None);
    }

    #[test]
    fn non_text_description_rejected() {
        assert!(matches!(
            check("name: n\ndescription:\n  nested: 1").unwrap_err(),
            crate::SdlError::Validation(ValidationError::NotText {
                field: "description",
                ..
            })
        ));
    }

    #[test]
    fn infrastructure_mapping_accepted() {
        let doc = check("name: n\ninfrastructure:\n  networks:\n    net1:\n      name: one")
            .unwrap();
        let infra = doc.scenario.infrastructure.unwrap();
        assert!(infra.as_mapping().is_some());
    }

    #[test]
    fn infrastructure_sequence_accepted() {
        let doc = check("name: n\ninfrastructure:\n  - a\n  - b").unwrap();
        let infra = doc.scenario.infrastructure.unwrap();
        assert_eq!(infra.as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn scalar_infrastructure_rejected() {
        assert!(matches!(
            check("name: n\ninfrastructure: oops").unwrap_err(),
            crate::SdlError::Validation(ValidationError::InfrastructureNotStructured { .. })
        ));
    }

    #[test]
    fn null_infrastructure_is_absent() {
        let doc = check("name: n\ninfrastructure: ~").unwrap();
        assert_eq!(doc.scenario.infrastructure, None);
    }
}
