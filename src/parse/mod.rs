//! Structural parser: token stream to generic document tree.
//!
//! Works on an explicit stack of frames instead of recursion, so document
//! depth costs stack entries, not call frames. `Indent` under a pending key
//! or pending `-` item pushes a frame; `Dedent` pops one and attaches the
//! finished node to its parent. Each token is handled once, so parsing is
//! linear in input length.

mod error;

pub use error::StructureError;

use indexmap::IndexMap;

use crate::error::SdlError;
use crate::lex::{LexError, Token, TokenKind};
use crate::types::{Node, NodeKind, Scalar, Span};

enum Container {
    /// Pushed on `Indent`; becomes a mapping or sequence at the first
    /// content token of the new block.
    Unresolved,
    Mapping(IndexMap<String, Node>),
    Sequence(Vec<Node>),
}

struct Frame {
    container: Container,
    /// A `key:` waiting for its value (mapping frames).
    pending_key: Option<(String, Span)>,
    /// A `-` waiting for its value (sequence frames).
    pending_item: Option<Span>,
    span: Span,
}

impl Frame {
    fn root() -> Self {
        Frame {
            container: Container::Mapping(IndexMap::new()),
            pending_key: None,
            pending_item: None,
            span: Span::new(1, 1),
        }
    }

    fn unresolved(span: Span) -> Self {
        Frame {
            container: Container::Unresolved,
            pending_key: None,
            pending_item: None,
            span,
        }
    }
}

/// Build the document tree from a token stream. The root is always a
/// mapping, possibly empty.
pub(crate) fn parse<I>(tokens: I) -> Result<Node, SdlError>
where
    I: IntoIterator<Item = Result<Token, LexError>>,
{
    let mut stack = vec![Frame::root()];

    for tok in tokens {
        let tok = tok?;
        let span = Span::new(tok.line, tok.column);
        match tok.kind {
            TokenKind::Key(name) => {
                let frame = top(&mut stack)?;
                if matches!(frame.container, Container::Unresolved) {
                    frame.container = Container::Mapping(IndexMap::new());
                }
                match &mut frame.container {
                    Container::Mapping(map) => {
                        // A previous `key:` with nothing beneath it resolves
                        // to an explicit null.
                        if let Some((prev, pspan)) = frame.pending_key.take() {
                            map.insert(prev, Node::scalar(Scalar::Null, pspan));
                        }
                        if map.contains_key(&name) {
                            return Err(StructureError::DuplicateKey {
                                key: name,
                                line: span.line,
                                column: span.column,
                            }
                            .into());
                        }
                        frame.pending_key = Some((name, span));
                    }
                    Container::Sequence(_) => {
                        return Err(StructureError::ExpectedItem {
                            line: span.line,
                            column: span.column,
                        }
                        .into());
                    }
                    Container::Unresolved => {
                        return Err(internal("unresolved frame after resolution"))
                    }
                }
            }
            TokenKind::Scalar(scalar) => {
                let frame = top(&mut stack)?;
                if let Some((key, _)) = frame.pending_key.take() {
                    match &mut frame.container {
                        Container::Mapping(map) => {
                            map.insert(key, Node::scalar(scalar, span));
                        }
                        _ => return Err(internal("pending key on non-mapping frame")),
                    }
                } else if frame.pending_item.take().is_some() {
                    match &mut frame.container {
                        Container::Sequence(items) => {
                            items.push(Node::scalar(scalar, span));
                        }
                        _ => return Err(internal("pending item on non-sequence frame")),
                    }
                } else {
                    let err = match frame.container {
                        Container::Sequence(_) => StructureError::ExpectedItem {
                            line: span.line,
                            column: span.column,
                        },
                        _ => StructureError::ExpectedKey {
                            line: span.line,
                            column: span.column,
                        },
                    };
                    return Err(err.into());
                }
            }
            TokenKind::Dash => {
                let frame = top(&mut stack)?;
                if matches!(frame.container, Container::Unresolved) {
                    frame.container = Container::Sequence(Vec::new());
                }
                match &mut frame.container {
                    Container::Sequence(items) => {
                        // A previous bare `-` resolves to an explicit null.
                        if let Some(pspan) = frame.pending_item.take() {
                            items.push(Node::scalar(Scalar::Null, pspan));
                        }
                        frame.pending_item = Some(span);
                    }
                    Container::Mapping(_) => {
                        return Err(StructureError::UnexpectedItem {
                            line: span.line,
                            column: span.column,
                        }
                        .into());
                    }
                    Container::Unresolved => {
                        return Err(internal("unresolved frame after resolution"))
                    }
                }
            }
            TokenKind::Indent => {
                let frame = top(&mut stack)?;
                if frame.pending_key.is_none() && frame.pending_item.is_none() {
                    return Err(StructureError::UnexpectedIndent {
                        line: span.line,
                        column: span.column,
                    }
                    .into());
                }
                stack.push(Frame::unresolved(span));
            }
            TokenKind::Dedent => {
                let child = stack
                    .pop()
                    .ok_or_else(|| internal("dedent below document root"))?;
                let node = finish(child)?;
                let parent = top(&mut stack)?;
                attach(parent, node)?;
            }
            TokenKind::Newline => {}
            TokenKind::Eof => {
                let mut child = stack
                    .pop()
                    .ok_or_else(|| internal("frame stack exhausted"))?;
                while let Some(mut parent) = stack.pop() {
                    let node = finish(child)?;
                    attach(&mut parent, node)?;
                    child = parent;
                }
                return finish(child);
            }
        }
    }

    Err(internal("token stream ended without EOF"))
}

fn top(stack: &mut [Frame]) -> Result<&mut Frame, SdlError> {
    stack
        .last_mut()
        .ok_or_else(|| internal("frame stack exhausted"))
}

fn finish(frame: Frame) -> Result<Node, SdlError> {
    let Frame {
        container,
        pending_key,
        pending_item,
        span,
    } = frame;
    match container {
        Container::Mapping(mut map) => {
            if let Some((key, kspan)) = pending_key {
                map.insert(key, Node::scalar(Scalar::Null, kspan));
            }
            Ok(Node::new(NodeKind::Mapping(map), span))
        }
        Container::Sequence(mut items) => {
            if let Some(pspan) = pending_item {
                items.push(Node::scalar(Scalar::Null, pspan));
            }
            Ok(Node::new(NodeKind::Sequence(items), span))
        }
        Container::Unresolved => Err(internal("block closed before any content")),
    }
}

fn attach(parent: &mut Frame, node: Node) -> Result<(), SdlError> {
    match &mut parent.container {
        Container::Mapping(map) => {
            let Some((key, _)) = parent.pending_key.take() else {
                return Err(internal("nested block without a pending key"));
            };
            map.insert(key, node);
            Ok(())
        }
        Container::Sequence(items) => {
            if parent.pending_item.take().is_none() {
                return Err(internal("nested block without a pending item"));
            }
            items.push(node);
            Ok(())
        }
        Container::Unresolved => Err(internal("nested block under unresolved frame")),
    }
}

fn internal(msg: &str) -> SdlError {
    SdlError::Internal(msg.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::tokenize;

    fn tree(input: &str) -> Result<Node, SdlError> {
        parse(tokenize(input))
    }

    fn mapping(node: &Node) -> &IndexMap<String, Node> {
        node.as_mapping().expect("expected a mapping")
    }

    #[test]
    fn flat_mapping() {
        let root = tree("name: test\ncount: 3\nratio: 0.5\nready: true").unwrap();
        let map = mapping(&root);
        assert_eq!(map["name"].as_str(), Some("test"));
        assert_eq!(map["count"].kind, NodeKind::Scalar(Scalar::Int(3)));
        assert_eq!(map["ratio"].kind, NodeKind::Scalar(Scalar::Float(0.5)));
        assert_eq!(map["ready"].kind, NodeKind::Scalar(Scalar::Bool(true)));
    }

    #[test]
    fn nested_mappings() {
        let root = tree("infrastructure:\n  networks:\n    net1:\n      name: one").unwrap();
        let infra = mapping(&mapping(&root)["infrastructure"]);
        let net1 = mapping(&mapping(&infra["networks"])["net1"]);
        assert_eq!(net1["name"].as_str(), Some("one"));
    }

    #[test]
    fn sequence_of_scalars() {
        let root = tree("deps:\n  - first\n  - second").unwrap();
        let items = mapping(&root)["deps"].as_sequence().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_str(), Some("first"));
        assert_eq!(items[1].as_str(), Some("second"));
    }

    #[test]
    fn mapping_inside_sequence_item() {
        let root = tree("vms:\n  -\n    name: win10\n    cpu: 2").unwrap();
        let items = mapping(&root)["vms"].as_sequence().unwrap();
        let vm = mapping(&items[0]);
        assert_eq!(vm["name"].as_str(), Some("win10"));
        assert_eq!(vm["cpu"].kind, NodeKind::Scalar(Scalar::Int(2)));
    }

    #[test]
    fn bare_dash_is_null_item() {
        let root = tree("deps:\n  - one\n  -").unwrap();
        let items = mapping(&root)["deps"].as_sequence().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[1].is_null());
    }

    #[test]
    fn key_without_value_is_null() {
        let root = tree("name: x\ndescription:").unwrap();
        assert!(mapping(&root)["description"].is_null());
    }

    #[test]
    fn empty_input_is_empty_mapping() {
        let root = tree("").unwrap();
        assert!(mapping(&root).is_empty());
    }

    #[test]
    fn duplicate_key_rejected() {
        let err = tree("name: a\nname: b").unwrap_err();
        assert!(matches!(
            err,
            SdlError::Structure(StructureError::DuplicateKey { ref key, line: 2, .. }) if key == "name"
        ));
    }

    #[test]
    fn duplicate_key_in_nested_block_rejected() {
        let err = tree("infra:\n  a: 1\n  a: 2").unwrap_err();
        assert!(matches!(
            err,
            SdlError::Structure(StructureError::DuplicateKey { ref key, .. }) if key == "a"
        ));
    }

    #[test]
    fn duplicate_detected_against_valueless_key() {
        let err = tree("name:\nname: b").unwrap_err();
        assert!(matches!(
            err,
            SdlError::Structure(StructureError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn same_key_at_different_levels_allowed() {
        let root = tree("name: outer\nchild:\n  name: inner").unwrap();
        let map = mapping(&root);
        assert_eq!(map["name"].as_str(), Some("outer"));
        assert_eq!(mapping(&map["child"])["name"].as_str(), Some("inner"));
    }

    #[test]
    fn top_level_sequence_rejected() {
        let err = tree("- one\n- two").unwrap_err();
        assert!(matches!(
            err,
            SdlError::Structure(StructureError::UnexpectedItem { line: 1, .. })
        ));
    }

    #[test]
    fn bare_scalar_line_rejected() {
        let err = tree("name: x\nstray").unwrap_err();
        assert!(matches!(
            err,
            SdlError::Structure(StructureError::ExpectedKey { line: 2, .. })
        ));
    }

    #[test]
    fn key_inside_sequence_rejected() {
        let err = tree("deps:\n  - one\n  name: x").unwrap_err();
        assert!(matches!(
            err,
            SdlError::Structure(StructureError::ExpectedItem { line: 3, .. })
        ));
    }

    #[test]
    fn indent_after_completed_entry_rejected() {
        let err = tree("name: x\n  stray: 1").unwrap_err();
        assert!(matches!(
            err,
            SdlError::Structure(StructureError::UnexpectedIndent { line: 2, .. })
        ));
    }

    #[test]
    fn lex_errors_pass_through() {
        let err = tree("a:\n\tb: 1").unwrap_err();
        assert!(matches!(err, SdlError::Lex(_)));
    }

    #[test]
    fn deeply_nested_does_not_recurse() {
        // 200 levels; the frame stack absorbs the depth.
        let mut text = String::new();
        for depth in 0..200 {
            text.push_str(&" ".repeat(depth * 2));
            text.push_str(&format!("k{depth}:\n"));
        }
        text.push_str(&" ".repeat(200 * 2));
        text.push_str("leaf: 1");
        let root = tree(&text).unwrap();
        let mut node = &mapping(&root)["k0"];
        for depth in 1..200 {
            node = &mapping(node)[&format!("k{depth}")];
        }
        assert_eq!(mapping(node)["leaf"].kind, NodeKind::Scalar(Scalar::Int(1)));
    }
}
