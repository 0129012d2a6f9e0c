//! Insertion content

use dom::{Document, NodeId, Result};
use vdom::{Child, VNode};

/// What insertion operations accept
#[derive(Debug, Clone)]
pub enum Content {
    /// Parsed as markup at insertion time
    Markup(String),
    /// A detached builder element
    Builder(VNode),
    /// An existing node; inserting it moves it
    Node(NodeId),
}

impl From<&str> for Content {
    fn from(markup: &str) -> Self {
        Content::Markup(markup.to_string())
    }
}

impl From<String> for Content {
    fn from(markup: String) -> Self {
        Content::Markup(markup)
    }
}

impl From<VNode> for Content {
    fn from(node: VNode) -> Self {
        Content::Builder(node)
    }
}

impl From<&VNode> for Content {
    fn from(node: &VNode) -> Self {
        Content::Builder(node.clone())
    }
}

impl From<NodeId> for Content {
    fn from(node: NodeId) -> Self {
        Content::Node(node)
    }
}

impl Content {
    /// Nodes to insert, in order. Markup yields its top-level nodes as
    /// parsed inside `context`, the element receiving them.
    pub(crate) fn into_nodes(self, doc: &Document, context: NodeId) -> Result<Vec<NodeId>> {
        match self {
            Content::Markup(markup) => doc.parse_fragment_in(context, &markup),
            Content::Builder(node) => Ok(vec![Child::Builder(node).resolve(doc)?]),
            Content::Node(node) => Ok(vec![Child::Node(node).resolve(doc)?]),
        }
    }
}
