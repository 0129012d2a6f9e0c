//! Node handles
//!
//! A `NodeHandle` is a `(Document, NodeId)` pair. Handles carry no state
//! of their own: two handles are equal when they wrap the same node of
//! the same document, and any number of them may wrap one node.
//!
//! Selector arguments follow one rule everywhere: an empty string means
//! "no filter", anything else must parse or the error is returned as is.

use std::fmt;

use dom::{Document, DomArena, Event, ListenerId, NodeId, Result, SelectorList};

use crate::content::Content;

#[derive(Clone)]
pub struct NodeHandle {
    doc: Document,
    node: NodeId,
}

impl PartialEq for NodeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.doc.same(&other.doc)
    }
}

impl Eq for NodeHandle {}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .doc
            .tree()
            .get(self.node)
            .map(|n| n.node_name.clone())
            .unwrap_or_default();
        f.debug_struct("NodeHandle")
            .field("node", &self.node)
            .field("name", &name)
            .finish()
    }
}

/// `None` for the empty selector
fn parse_filter(selector: &str) -> Result<Option<SelectorList>> {
    if selector.is_empty() {
        return Ok(None);
    }
    SelectorList::parse(selector).map(Some)
}

fn passes(filter: &Option<SelectorList>, tree: &DomArena, node: NodeId) -> bool {
    tree.get(node).is_ok_and(|n| n.is_element())
        && filter
            .as_ref()
            .map_or(true, |list| list.matches(tree, node, None))
}

impl NodeHandle {
    pub fn new(doc: &Document, node: NodeId) -> Self {
        Self {
            doc: doc.clone(),
            node,
        }
    }

    /// The wrapped node
    pub fn get(&self) -> NodeId {
        self.node
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    fn wrap(&self, node: NodeId) -> Self {
        Self::new(&self.doc, node)
    }

    fn wrap_all(&self, nodes: impl IntoIterator<Item = NodeId>) -> Vec<Self> {
        nodes.into_iter().map(|node| self.wrap(node)).collect()
    }

    // ----------------------------------------------------------------
    // Traversal
    // ----------------------------------------------------------------

    /// Immediate parent, or None for a root
    pub fn parent(&self) -> Option<NodeHandle> {
        let parent = self.doc.tree().parent_id(self.node).ok().flatten();
        parent.map(|node| self.wrap(node))
    }

    /// Nearest strict ancestor matching `selector`; the parent when the
    /// selector is empty
    pub fn ancestor(&self, selector: &str) -> Result<Option<NodeHandle>> {
        let Some(list) = parse_filter(selector)? else {
            return Ok(self.parent());
        };
        let found = {
            let tree = self.doc.tree();
            tree.ancestors(self.node)?
                .into_iter()
                .find(|&id| list.matches(&tree, id, None))
        };
        Ok(found.map(|node| self.wrap(node)))
    }

    /// Element children, in order
    pub fn children(&self, selector: &str) -> Result<Vec<NodeHandle>> {
        let filter = parse_filter(selector)?;
        let found: Vec<NodeId> = {
            let tree = self.doc.tree();
            tree.child_ids(self.node)?
                .iter()
                .copied()
                .filter(|&id| passes(&filter, &tree, id))
                .collect()
        };
        Ok(self.wrap_all(found))
    }

    /// Matching elements at any depth below this node; the element
    /// children when the selector is empty
    pub fn descendants(&self, selector: &str) -> Result<Vec<NodeHandle>> {
        if selector.is_empty() {
            return self.children("");
        }
        let found = self.doc.query_selector_all_in(self.node, selector)?;
        Ok(self.wrap_all(found))
    }

    /// Element siblings excluding this node; empty without a parent
    pub fn siblings(&self, selector: &str) -> Result<Vec<NodeHandle>> {
        let filter = parse_filter(selector)?;
        let found: Vec<NodeId> = {
            let tree = self.doc.tree();
            let Some(parent) = tree.parent_id(self.node)? else {
                return Ok(Vec::new());
            };
            tree.child_ids(parent)?
                .iter()
                .copied()
                .filter(|&id| id != self.node && passes(&filter, &tree, id))
                .collect()
        };
        Ok(self.wrap_all(found))
    }

    /// Nearest following element sibling matching `selector`
    pub fn next(&self, selector: &str) -> Result<Option<NodeHandle>> {
        self.walk_siblings(selector, DomArena::next_sibling)
    }

    /// Nearest preceding element sibling matching `selector`
    pub fn prev(&self, selector: &str) -> Result<Option<NodeHandle>> {
        self.walk_siblings(selector, DomArena::prev_sibling)
    }

    fn walk_siblings(
        &self,
        selector: &str,
        step: fn(&DomArena, NodeId) -> Result<Option<NodeId>>,
    ) -> Result<Option<NodeHandle>> {
        let filter = parse_filter(selector)?;
        let found = {
            let tree = self.doc.tree();
            let mut current = step(&tree, self.node)?;
            loop {
                match current {
                    Some(id) if passes(&filter, &tree, id) => break Some(id),
                    Some(id) => current = step(&tree, id)?,
                    None => break None,
                }
            }
        };
        Ok(found.map(|node| self.wrap(node)))
    }

    // ----------------------------------------------------------------
    // Insertion
    // ----------------------------------------------------------------

    /// Insert content at the start of the children. Returns the first
    /// child afterwards.
    pub fn prepend(&self, content: impl Into<Content>) -> Result<Option<NodeHandle>> {
        let nodes = content.into().into_nodes(&self.doc, self.node)?;
        let first = {
            let mut tree = self.doc.tree_mut();
            let reference = tree.child_ids(self.node)?.first().copied();
            for node in nodes {
                tree.insert_before(self.node, node, reference)?;
            }
            tree.child_ids(self.node)?.first().copied()
        };
        tracing::trace!(node = self.node, "prepend");
        Ok(first.map(|node| self.wrap(node)))
    }

    /// Insert content at the end of the children. Returns the last child
    /// afterwards.
    pub fn append(&self, content: impl Into<Content>) -> Result<Option<NodeHandle>> {
        let nodes = content.into().into_nodes(&self.doc, self.node)?;
        let last = {
            let mut tree = self.doc.tree_mut();
            for node in nodes {
                tree.append_child(self.node, node)?;
            }
            tree.child_ids(self.node)?.last().copied()
        };
        tracing::trace!(node = self.node, "append");
        Ok(last.map(|node| self.wrap(node)))
    }

    /// Insert content as the previous sibling(s). Returns the inserted
    /// node now directly before this one; None without a parent.
    pub fn before(&self, content: impl Into<Content>) -> Result<Option<NodeHandle>> {
        let Some(parent) = self.parent() else {
            return Ok(None);
        };
        let nodes = content.into().into_nodes(&self.doc, parent.node)?;
        let adjacent = {
            let mut tree = self.doc.tree_mut();
            let mut inserted = Vec::new();
            for node in nodes {
                inserted.extend(tree.insert_adjacent_before(self.node, node)?);
            }
            inserted.last().copied()
        };
        Ok(adjacent.map(|node| self.wrap(node)))
    }

    /// Insert content as the next sibling(s). Returns the inserted node
    /// now directly after this one; None without a parent.
    pub fn after(&self, content: impl Into<Content>) -> Result<Option<NodeHandle>> {
        let Some(parent) = self.parent() else {
            return Ok(None);
        };
        let nodes = content.into().into_nodes(&self.doc, parent.node)?;
        let adjacent = {
            let mut tree = self.doc.tree_mut();
            let mut inserted = Vec::new();
            let mut reference = self.node;
            for node in nodes {
                let placed = tree.insert_after(reference, node)?;
                if let Some(&last) = placed.last() {
                    reference = last;
                }
                inserted.extend(placed);
            }
            inserted.first().copied()
        };
        Ok(adjacent.map(|node| self.wrap(node)))
    }

    /// Replace all children with `content`. Markup is parsed, a builder
    /// is serialized and re-parsed, a node is moved in. Returns this handle.
    pub fn render(&self, content: impl Into<Content>) -> Result<NodeHandle> {
        let nodes = match content.into() {
            Content::Builder(builder) => self.doc.parse_fragment_in(self.node, &builder.to_markup()?)?,
            other => other.into_nodes(&self.doc, self.node)?,
        };
        {
            let mut tree = self.doc.tree_mut();
            tree.clear_children(self.node)?;
            for node in nodes {
                tree.append_child(self.node, node)?;
            }
        }
        tracing::debug!(node = self.node, "rendered content");
        Ok(self.clone())
    }

    // ----------------------------------------------------------------
    // Classes
    // ----------------------------------------------------------------

    pub fn classes(&self) -> Result<Vec<String>> {
        self.doc.tree().class_list(self.node)
    }

    pub fn has(&self, class: &str) -> Result<bool> {
        self.doc.tree().has_class(self.node, class)
    }

    pub fn add(&self, class: &str) -> Result<()> {
        self.doc.tree_mut().add_class(self.node, class)
    }

    pub fn remove(&self, class: &str) -> Result<()> {
        self.doc.tree_mut().remove_class(self.node, class)
    }

    /// Returns false, changing nothing, when `old` is absent
    pub fn replace(&self, old: &str, new: &str) -> Result<bool> {
        self.doc.tree_mut().replace_class(self.node, old, new)
    }

    /// Returns whether the class is present afterwards
    pub fn toggle(&self, class: &str) -> Result<bool> {
        self.doc.tree_mut().toggle_class(self.node, class)
    }

    // ----------------------------------------------------------------
    // Events
    // ----------------------------------------------------------------

    /// Attach a listener until the returned binding is removed
    pub fn on<F>(&self, event_type: &str, handler: F) -> Result<EventBinding>
    where
        F: Fn(&Event) + 'static,
    {
        let id = self.doc.add_event_listener(self.node, event_type, handler)?;
        Ok(EventBinding {
            doc: self.doc.clone(),
            id,
        })
    }
}

/// One attached listener
#[derive(Debug, Clone)]
pub struct EventBinding {
    doc: Document,
    id: ListenerId,
}

impl EventBinding {
    /// Detach the listener. Returns false if it was already removed.
    pub fn remove(&self) -> bool {
        self.doc.remove_event_listener(self.id)
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}
