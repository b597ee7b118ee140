//! Schema binder: generic document tree to the scenario field slots.
//!
//! Accepts both observed document shapes: a `scenario:` wrapper around the
//! fields, or the fields directly at the top level. Known field keys match
//! ASCII case-insensitively, as the SDL corpus uses `name`, `Name`, and
//! `NAME` interchangeably. Unknown keys are never dropped; they are carried
//! through in an ordered passthrough map.

use indexmap::IndexMap;

use crate::error::SdlError;
use crate::parse::StructureError;
use crate::types::{Node, NodeKind, Scalar};
use crate::validate::ValidationError;

/// The schema-shaped but not yet validated form of a scenario.
///
/// Every known field slot is always present. A slot holds the raw node from
/// the source, including an explicit null; the validator turns nulls into
/// absence and gives the rest their types.
#[derive(Debug, Default)]
pub(crate) struct BoundScenario {
    pub name: Option<Node>,
    pub start: Option<Node>,
    pub end: Option<Node>,
    pub description: Option<Node>,
    pub infrastructure: Option<Node>,
    pub extra: IndexMap<String, Node>,
}

pub(crate) fn bind(root: &Node) -> Result<BoundScenario, SdlError> {
    let NodeKind::Mapping(top) = &root.kind else {
        return Err(SdlError::Internal("document root is not a mapping".into()));
    };

    let mut bound = BoundScenario::default();
    let wrapper = top.iter().find(|(k, _)| k.eq_ignore_ascii_case("scenario"));

    match wrapper {
        Some((wrapper_key, node)) => {
            match &node.kind {
                NodeKind::Mapping(body) => bind_fields(body, &mut bound)?,
                NodeKind::Scalar(Scalar::Null) => {}
                _ => {
                    return Err(ValidationError::ScenarioNotMapping {
                        line: node.span.line,
                        column: node.span.column,
                    }
                    .into())
                }
            }
            // Keys alongside the wrapper go through the same field matching
            // as the wrapper body, so a field spelled both inside and outside
            // collides instead of appearing twice in the output. A second
            // spelling of the wrapper key itself is likewise a duplicate.
            for (key, value) in top {
                if key == wrapper_key {
                    continue;
                }
                if key.eq_ignore_ascii_case("scenario") {
                    return Err(duplicate(key, value));
                }
                bind_entry(key, value, &mut bound)?;
            }
        }
        None => bind_fields(top, &mut bound)?,
    }

    Ok(bound)
}

fn bind_fields(body: &IndexMap<String, Node>, bound: &mut BoundScenario) -> Result<(), SdlError> {
    for (key, value) in body {
        bind_entry(key, value, bound)?;
    }
    Ok(())
}

fn bind_entry(key: &str, value: &Node, bound: &mut BoundScenario) -> Result<(), SdlError> {
    let slot = match key.to_ascii_lowercase().as_str() {
        "name" => &mut bound.name,
        "start" => &mut bound.start,
        "end" => &mut bound.end,
        "description" => &mut bound.description,
        "infrastructure" => &mut bound.infrastructure,
        _ => {
            if bound.extra.insert(key.to_owned(), value.clone()).is_some() {
                return Err(duplicate(key, value));
            }
            return Ok(());
        }
    };
    // Exact repeats within one level are caught by the parser; this catches
    // case variants (`name:` then `NAME:`) and wrapper-sibling repeats.
    if slot.is_some() {
        return Err(duplicate(key, value));
    }
    *slot = Some(value.clone());
    Ok(())
}

fn duplicate(key: &str, value: &Node) -> SdlError {
    StructureError::DuplicateKey {
        key: key.to_owned(),
        line: value.span.line,
        column: value.span.column,
    }
    .into()
}
