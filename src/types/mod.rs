mod document;
mod node;
mod span;

pub use document::{Scenario, ScenarioDocument};
pub use node::{Node, NodeKind, Scalar};
pub use span::Span;
