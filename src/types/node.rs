use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::span::Span;

/// A single node in the parsed document tree.
///
/// Nodes form a strict tree: every node is owned by its parent, there is no
/// sharing and no cycles. The span records where the node's first token
/// appeared in the source; it is ignored by equality and not serialized.
#[derive(Debug, Clone)]
pub struct Node {
    pub span: Span,
    pub kind: NodeKind,
}

/// The three structural shapes a node can take.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// An ordered set of unique key/value entries.
    Mapping(IndexMap<String, Node>),
    /// An ordered list of items.
    Sequence(Vec<Node>),
    /// A leaf value.
    Scalar(Scalar),
}

/// Typed leaf values.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Node {
    #[must_use]
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { span, kind }
    }

    #[must_use]
    pub fn scalar(scalar: Scalar, span: Span) -> Self {
        Self::new(NodeKind::Scalar(scalar), span)
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar(Scalar::Null))
    }

    #[must_use]
    pub fn as_mapping(&self) -> Option<&IndexMap<String, Node>> {
        match &self.kind {
            NodeKind::Mapping(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Sequence(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }
}

impl NodeKind {
    /// Human-readable rendering for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            NodeKind::Mapping(_) => "a mapping".to_owned(),
            NodeKind::Sequence(_) => "a sequence".to_owned(),
            NodeKind::Scalar(s) => s.to_string(),
        }
    }
}

// Spans are excluded: two trees parsed from differently formatted sources
// compare equal when their structure and values match.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::scalar(scalar, Span::default())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => write!(f, "{s}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Null => write!(f, "null"),
        }
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.kind {
            NodeKind::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            NodeKind::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            NodeKind::Scalar(scalar) => match scalar {
                Scalar::Str(s) => serializer.serialize_str(s),
                Scalar::Int(i) => serializer.serialize_i64(*i),
                Scalar::Float(v) => serializer.serialize_f64(*v),
                Scalar::Bool(b) => serializer.serialize_bool(*b),
                Scalar::Null => serializer.serialize_unit(),
            },
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = Node;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a mapping, sequence, or scalar")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
                Ok(Scalar::Bool(v).into())
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
                Ok(Scalar::Int(v).into())
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
                match i64::try_from(v) {
                    Ok(i) => Ok(Scalar::Int(i).into()),
                    Err(_) => Ok(Scalar::Float(v as f64).into()),
                }
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
                Ok(Scalar::Float(v).into())
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
                Ok(Scalar::Str(v.to_owned()).into())
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
                Ok(Scalar::Str(v).into())
            }

            fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
                Ok(Scalar::Null.into())
            }

            fn visit_none<E: de::Error>(self) -> Result<Node, E> {
                Ok(Scalar::Null.into())
            }

            fn visit_some<D2>(self, deserializer: D2) -> Result<Node, D2::Error>
            where
                D2: Deserializer<'de>,
            {
                Node::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Node, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element::<Node>()? {
                    items.push(item);
                }
                Ok(Node::new(NodeKind::Sequence(items), Span::default()))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Node, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, Node>()? {
                    if entries.insert(key.clone(), value).is_some() {
                        return Err(de::Error::custom(format!("duplicate key '{key}'")));
                    }
                }
                Ok(Node::new(NodeKind::Mapping(entries), Span::default()))
            }
        }

        deserializer.deserialize_any(NodeVisitor)
    }
}
