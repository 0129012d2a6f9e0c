//! Query entry points
//!
//! `query` resolves a selector or an existing node into wrapped handles.
//! Scoped queries run once per scope node with the selector rewritten to
//! match only below that node, and results are concatenated in scope order.

use dom::{Document, NodeId, Result};

use crate::handle::NodeHandle;

/// What to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Selector(&'a str),
    /// Wrapped directly, no search
    Node(NodeId),
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(selector: &'a str) -> Self {
        Target::Selector(selector)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(selector: &'a String) -> Self {
        Target::Selector(selector)
    }
}

impl From<NodeId> for Target<'_> {
    fn from(node: NodeId) -> Self {
        Target::Node(node)
    }
}

/// Where a selector search runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope<'a> {
    /// The whole document, in tree order
    #[default]
    Document,
    /// Strict descendants of one node
    Node(NodeId),
    /// Strict descendants of each node, concatenated in this order
    Nodes(&'a [NodeId]),
}

/// Result of [`query`]: a node target gives one handle, a selector gives
/// a list
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Node(NodeHandle),
    Nodes(Vec<NodeHandle>),
}

impl Selection {
    pub fn into_vec(self) -> Vec<NodeHandle> {
        match self {
            Selection::Node(handle) => vec![handle],
            Selection::Nodes(handles) => handles,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::Node(_) => 1,
            Selection::Nodes(handles) => handles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first(&self) -> Option<&NodeHandle> {
        match self {
            Selection::Node(handle) => Some(handle),
            Selection::Nodes(handles) => handles.first(),
        }
    }
}

/// Resolve `target` within `scope`
pub fn query<'a>(doc: &Document, target: impl Into<Target<'a>>, scope: Scope<'_>) -> Result<Selection> {
    let selector = match target.into() {
        Target::Node(node) => {
            doc.tree().get(node)?;
            return Ok(Selection::Node(wrap(doc, node)));
        }
        Target::Selector(selector) => selector,
    };

    let found = match scope {
        Scope::Document => doc.query_selector_all(selector)?,
        Scope::Node(node) => doc.query_selector_all_in(node, selector)?,
        Scope::Nodes(nodes) => {
            let mut found = Vec::new();
            for &node in nodes {
                found.extend(doc.query_selector_all_in(node, selector)?);
            }
            found
        }
    };

    tracing::debug!(selector, matches = found.len(), "query");
    Ok(Selection::Nodes(found.into_iter().map(|id| wrap(doc, id)).collect()))
}

/// Every element matching `selector` in the document
pub fn select(doc: &Document, selector: &str) -> Result<Vec<NodeHandle>> {
    query(doc, selector, Scope::Document).map(Selection::into_vec)
}

/// Matches below each handle in `scope`, in scope order. Handles are
/// expected to share one document; an empty scope yields nothing.
pub fn select_in(selector: &str, scope: &[NodeHandle]) -> Result<Vec<NodeHandle>> {
    let Some(first) = scope.first() else {
        return Ok(Vec::new());
    };
    let nodes: Vec<NodeId> = scope.iter().map(NodeHandle::get).collect();
    query(first.document(), selector, Scope::Nodes(&nodes)).map(Selection::into_vec)
}

pub fn wrap(doc: &Document, node: NodeId) -> NodeHandle {
    NodeHandle::new(doc, node)
}
