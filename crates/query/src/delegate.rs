//! Delegated listeners
//!
//! [`delegate`] wraps a handler so it only runs when the event target, or
//! one of its ancestors below the node the listener is attached to,
//! matches a selector. The matched node is handed to the handler.

use dom::{DomArena, Event, NodeId, NodeType, Result, SearchBoundary, SelectorList};

use crate::handle::NodeHandle;

/// Nearest-match upward search for one selector
#[derive(Debug, Clone)]
pub struct DelegationMatcher {
    selector: SelectorList,
    boundary: SearchBoundary,
}

impl DelegationMatcher {
    pub fn new(selector: &str, boundary: SearchBoundary) -> Result<Self> {
        Ok(Self {
            selector: SelectorList::parse(selector)?,
            boundary,
        })
    }

    pub fn boundary(&self) -> SearchBoundary {
        self.boundary
    }

    /// Walk from `target` towards the root. The walk fails on reaching
    /// `bound`, so the bound node itself is never matched.
    pub fn find_match(&self, tree: &DomArena, target: NodeId, bound: NodeId) -> Option<NodeId> {
        self.find_within(tree, target, bound, self.boundary)
    }

    fn find_within(
        &self,
        tree: &DomArena,
        target: NodeId,
        bound: NodeId,
        boundary: SearchBoundary,
    ) -> Option<NodeId> {
        let mut current = target;
        loop {
            if current == bound {
                return None;
            }
            let parent = tree.parent_id(current).ok()?;
            if boundary == SearchBoundary::ExcludeRoot && is_top(tree, parent) {
                return None;
            }
            if self.selector.matches(tree, current, None) {
                return Some(current);
            }
            current = parent?;
        }
    }
}

/// Wrap `handler` for delegation, using the document's configured
/// boundary at dispatch time. The selector is parsed once, up front.
pub fn delegate<F>(selector: &str, handler: F) -> Result<impl Fn(&Event) + 'static>
where
    F: Fn(&NodeHandle, &Event) + 'static,
{
    let matcher = DelegationMatcher::new(selector, SearchBoundary::default())?;
    Ok(move |event: &Event| {
        let boundary = event.document().config().delegation_boundary;
        run(&matcher, boundary, &handler, event);
    })
}

/// Like [`delegate`] with a fixed boundary
pub fn delegate_with<F>(
    selector: &str,
    boundary: SearchBoundary,
    handler: F,
) -> Result<impl Fn(&Event) + 'static>
where
    F: Fn(&NodeHandle, &Event) + 'static,
{
    let matcher = DelegationMatcher::new(selector, boundary)?;
    Ok(move |event: &Event| run(&matcher, matcher.boundary, &handler, event))
}

/// Whether a node with this parent is the top element of its tree
fn is_top(tree: &DomArena, parent: Option<NodeId>) -> bool {
    match parent {
        None => true,
        Some(parent) => tree
            .get(parent)
            .is_ok_and(|node| node.node_type == NodeType::Document),
    }
}

fn run<F>(matcher: &DelegationMatcher, boundary: SearchBoundary, handler: &F, event: &Event)
where
    F: Fn(&NodeHandle, &Event),
{
    let doc = event.document();
    let matched = {
        let tree = doc.tree();
        matcher.find_within(&tree, event.target(), event.current_target(), boundary)
    };
    match matched {
        Some(node) => {
            tracing::debug!(node, event_type = event.event_type(), "delegated match");
            handler(&NodeHandle::new(doc, node), event);
        }
        None => {
            tracing::trace!(node = event.target(), event_type = event.event_type(), "no delegated match");
        }
    }
}
