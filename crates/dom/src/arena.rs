//! Arena-based tree storage
//!
//! All nodes of a document, attached or detached, live in one `Vec`.
//! Nodes are addressed by `NodeId` (a 4-byte index, not a pointer) and
//! are never freed: removing a node only unlinks it, so an id stays
//! valid for the lifetime of the arena.
//!
//! ```text
//! Arena: Vec<DomNode>
//!        [Doc][html][head][body][detached p][#text]...
//!          ↑ parent/children links are indices into the same Vec
//! ```
//!
//! Insertion follows platform tree semantics: a node has at most one
//! parent, inserting it elsewhere first unlinks it, and inserting a
//! DocumentFragment moves the fragment's children instead.

use smallvec::SmallVec;

use crate::error::{DomError, Result};
use crate::types::{Attribute, DomNode, NodeId, NodeType};

/// Arena allocator for tree nodes
#[derive(Debug, Clone)]
pub struct DomArena {
    /// All nodes stored sequentially (cache-friendly)
    nodes: Vec<DomNode>,

    /// Document node ID (if set)
    root_id: Option<NodeId>,
}

impl DomArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create arena with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root_id: None,
        }
    }

    /// Arena holding a blank `<html><head></head><body></body></html>`
    /// document. Returns the arena and its document node.
    pub fn blank_document() -> (Self, NodeId) {
        let mut arena = Self::new();
        let root = arena.create_document();
        let html = arena.create_element("html");
        arena.link_last(root, html);
        for section in ["head", "body"] {
            let id = arena.create_element(section);
            arena.link_last(html, id);
        }
        (arena, root)
    }

    /// Attach a freshly created, detached node as the last child of `parent`
    fn link_last(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child as usize].parent_id = Some(parent);
        self.nodes[parent as usize].children_ids.push(child);
    }

    fn add_node(&mut self, node_type: NodeType, node_name: String) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        self.nodes.push(DomNode::new(node_id, node_type, node_name));
        node_id
    }

    /// Create the document node and make it the arena root
    pub fn create_document(&mut self) -> NodeId {
        let id = self.add_node(NodeType::Document, "#document".to_string());
        self.root_id = Some(id);
        id
    }

    /// Create a detached element; ASCII letters in the tag are lowercased
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.add_node(NodeType::Element, tag.to_ascii_lowercase())
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        let id = self.add_node(NodeType::Text, "#text".to_string());
        self.nodes[id as usize].node_value = text.to_string();
        id
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, data: &str) -> NodeId {
        let id = self.add_node(NodeType::Comment, "#comment".to_string());
        self.nodes[id as usize].node_value = data.to_string();
        id
    }

    /// Create an empty, detached document fragment
    pub fn create_fragment(&mut self) -> NodeId {
        self.add_node(NodeType::DocumentFragment, "#document-fragment".to_string())
    }

    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.add_node(NodeType::DocumentType, name.to_string())
    }

    pub fn create_processing_instruction(&mut self, target: &str, data: &str) -> NodeId {
        let id = self.add_node(NodeType::ProcessingInstruction, target.to_string());
        self.nodes[id as usize].node_value = data.to_string();
        id
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Linked ids always point inside the arena
    fn node(&self, node_id: NodeId) -> &DomNode {
        &self.nodes[node_id as usize]
    }

    /// Get node, failing unless it is an element
    pub fn element(&self, node_id: NodeId) -> Result<&DomNode> {
        let node = self.get(node_id)?;
        if node.is_element() {
            Ok(node)
        } else {
            Err(DomError::InvalidNodeType {
                expected: "Element".to_string(),
                actual: node.node_type.name().to_string(),
            })
        }
    }

    fn element_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.element(node_id)?;
        self.get_mut(node_id)
    }

    /// Get root node ID
    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    /// Total number of nodes, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ----------------------------------------------------------------
    // Navigation
    // ----------------------------------------------------------------

    /// Get children of a node
    pub fn children(&self, node_id: NodeId) -> Result<Vec<&DomNode>> {
        let node = self.get(node_id)?;
        Ok(node.children_ids.iter().map(|&id| self.node(id)).collect())
    }

    /// Child ids of a node, all node types, in order
    pub fn child_ids(&self, node_id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.get(node_id)?.children_ids)
    }

    /// Element children only (text, comments, ... excluded)
    pub fn element_children(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        let node = self.get(node_id)?;
        Ok(node
            .children_ids
            .iter()
            .copied()
            .filter(|&id| self.node(id).is_element())
            .collect())
    }

    /// Get parent of a node
    pub fn parent(&self, node_id: NodeId) -> Result<Option<&DomNode>> {
        let node = self.get(node_id)?;
        Ok(node.parent_id.map(|id| self.node(id)))
    }

    pub fn parent_id(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.get(node_id)?.parent_id)
    }

    fn sibling(&self, node_id: NodeId, offset: isize) -> Result<Option<NodeId>> {
        let Some(parent) = self.get(node_id)?.parent_id else {
            return Ok(None);
        };
        let siblings = &self.node(parent).children_ids;
        let pos = siblings
            .iter()
            .position(|&id| id == node_id)
            .ok_or(DomError::NodeNotFound(node_id))?;
        let target = pos as isize + offset;
        if target < 0 {
            return Ok(None);
        }
        Ok(siblings.get(target as usize).copied())
    }

    /// Next sibling of any node type
    pub fn next_sibling(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        self.sibling(node_id, 1)
    }

    /// Previous sibling of any node type
    pub fn prev_sibling(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        self.sibling(node_id, -1)
    }

    /// Ancestors, nearest first
    pub fn ancestors(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut current = self.get(node_id)?.parent_id;
        while let Some(id) = current {
            out.push(id);
            current = self.node(id).parent_id;
        }
        Ok(out)
    }

    pub fn is_descendant_of(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.nodes.get(node_id as usize).and_then(|n| n.parent_id);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent_id;
        }
        false
    }

    /// All descendants in tree order, excluding the node itself
    pub fn descendants(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.get(node_id)?.children_ids.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children_ids.iter().rev().copied());
        }

        Ok(out)
    }

    /// Traverse tree depth-first (iterative, no recursion)
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// Traverse tree breadth-first
    pub fn traverse_bf<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(start_id);

        while let Some(node_id) = queue.pop_front() {
            let node = self.get(node_id)?;
            visit(node)?;
            queue.extend(node.children_ids.iter().copied());
        }

        Ok(())
    }

    /// Find the first node in tree order under `start_id` (inclusive)
    /// that satisfies the predicate
    pub fn find<F>(&self, start_id: NodeId, predicate: F) -> Result<Option<NodeId>>
    where
        F: Fn(&DomNode) -> bool,
    {
        let start = self.get(start_id)?;
        if predicate(start) {
            return Ok(Some(start_id));
        }
        Ok(self
            .descendants(start_id)?
            .into_iter()
            .find(|&id| predicate(self.node(id))))
    }

    /// Concatenated character data of all descendant text nodes
    pub fn text_content(&self, node_id: NodeId) -> Result<String> {
        let node = self.get(node_id)?;
        if matches!(
            node.node_type,
            NodeType::Text | NodeType::Comment | NodeType::ProcessingInstruction
        ) {
            return Ok(node.node_value.clone());
        }

        let mut text = String::new();
        self.traverse_df(node_id, |node| {
            if node.is_text() {
                text.push_str(&node.node_value);
            }
            Ok(())
        })?;
        Ok(text)
    }

    // ----------------------------------------------------------------
    // Mutation
    // ----------------------------------------------------------------

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let parent_node = self.get(parent)?;
        let child_node = self.get(child)?;

        if !parent_node.node_type.is_container() {
            return Err(DomError::HierarchyRequest(format!(
                "{} node cannot have children",
                parent_node.node_type.name()
            )));
        }
        if child_node.node_type == NodeType::Document {
            return Err(DomError::HierarchyRequest(
                "document node cannot be inserted".to_string(),
            ));
        }
        if parent == child || self.is_descendant_of(parent, child) {
            return Err(DomError::HierarchyRequest(
                "node cannot be inserted into itself or its descendant".to_string(),
            ));
        }
        Ok(())
    }

    /// Unlink a node from its parent (no-op when already detached)
    pub fn detach(&mut self, node_id: NodeId) -> Result<()> {
        let Some(parent) = self.get(node_id)?.parent_id else {
            return Ok(());
        };
        self.nodes[parent as usize]
            .children_ids
            .retain(|id| *id != node_id);
        self.nodes[node_id as usize].parent_id = None;
        Ok(())
    }

    /// Unlink every child of a node
    pub fn clear_children(&mut self, node_id: NodeId) -> Result<()> {
        let children = std::mem::take(&mut self.get_mut(node_id)?.children_ids);
        for child in children {
            self.nodes[child as usize].parent_id = None;
        }
        Ok(())
    }

    /// Insert `child` into `parent` before `reference` (or at the end).
    ///
    /// Returns the ids actually inserted: the node itself, or the former
    /// children of a fragment, in order.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<Vec<NodeId>> {
        self.check_insert(parent, child)?;
        if let Some(reference) = reference {
            if self.get(reference)?.parent_id != Some(parent) {
                return Err(DomError::HierarchyRequest(
                    "reference node is not a child of the parent".to_string(),
                ));
            }
        }

        let moved: SmallVec<[NodeId; 4]> = if self.node(child).node_type == NodeType::DocumentFragment {
            std::mem::take(&mut self.nodes[child as usize].children_ids)
        } else {
            if reference == Some(child) {
                return Ok(vec![child]);
            }
            self.detach(child)?;
            smallvec::smallvec![child]
        };

        let mut index = match reference {
            Some(reference) => self
                .node(parent)
                .children_ids
                .iter()
                .position(|&id| id == reference)
                .ok_or(DomError::NodeNotFound(reference))?,
            None => self.node(parent).children_ids.len(),
        };

        for &id in &moved {
            self.nodes[id as usize].parent_id = Some(parent);
            self.nodes[parent as usize].children_ids.insert(index, id);
            index += 1;
        }

        Ok(moved.into_vec())
    }

    /// Append as last child
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<Vec<NodeId>> {
        self.insert_before(parent, child, None)
    }

    /// Insert as first child
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<Vec<NodeId>> {
        let first = self.get(parent)?.children_ids.first().copied();
        self.insert_before(parent, child, first)
    }

    /// Insert as the immediate next sibling of `target`.
    /// Nothing happens when `target` has no parent.
    pub fn insert_after(&mut self, target: NodeId, child: NodeId) -> Result<Vec<NodeId>> {
        let Some(parent) = self.get(target)?.parent_id else {
            return Ok(Vec::new());
        };
        let next = self.next_sibling(target)?;
        self.insert_before(parent, child, next)
    }

    /// Insert as the immediate previous sibling of `target`.
    /// Nothing happens when `target` has no parent.
    pub fn insert_adjacent_before(&mut self, target: NodeId, child: NodeId) -> Result<Vec<NodeId>> {
        let Some(parent) = self.get(target)?.parent_id else {
            return Ok(Vec::new());
        };
        self.insert_before(parent, child, Some(target))
    }

    // ----------------------------------------------------------------
    // Attributes
    // ----------------------------------------------------------------

    /// Attributes in insertion order
    pub fn attributes(&self, node_id: NodeId) -> Result<&[Attribute]> {
        Ok(&self.get(node_id)?.attributes)
    }

    pub fn get_attribute(&self, node_id: NodeId, name: &str) -> Result<Option<&str>> {
        Ok(self.get(node_id)?.attr(name))
    }

    pub fn has_attribute(&self, node_id: NodeId, name: &str) -> Result<bool> {
        Ok(self.get(node_id)?.attr(name).is_some())
    }

    /// Set an attribute; an existing attribute keeps its position
    pub fn set_attribute(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let node = self.element_mut(node_id)?;
        match node
            .attributes
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            Some(attr) => attr.value = value.to_string(),
            None => node.attributes.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
        Ok(())
    }

    /// Remove an attribute, returning whether it existed
    pub fn remove_attribute(&mut self, node_id: NodeId, name: &str) -> Result<bool> {
        let node = self.element_mut(node_id)?;
        let before = node.attributes.len();
        node.attributes.retain(|a| !a.name.eq_ignore_ascii_case(name));
        Ok(node.attributes.len() != before)
    }

    // ----------------------------------------------------------------
    // Class list (ordered, unique; backed by the `class` attribute)
    // ----------------------------------------------------------------

    pub fn class_list(&self, node_id: NodeId) -> Result<Vec<String>> {
        Ok(self
            .element(node_id)?
            .classes()
            .into_iter()
            .map(String::from)
            .collect())
    }

    /// Empty or whitespace-containing tokens never match
    pub fn has_class(&self, node_id: NodeId, token: &str) -> Result<bool> {
        Ok(self.element(node_id)?.classes().contains(&token))
    }

    pub fn add_class(&mut self, node_id: NodeId, token: &str) -> Result<()> {
        validate_token(token)?;
        let mut tokens = self.class_list(node_id)?;
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
        self.write_classes(node_id, tokens)
    }

    pub fn remove_class(&mut self, node_id: NodeId, token: &str) -> Result<()> {
        validate_token(token)?;
        let mut tokens = self.class_list(node_id)?;
        tokens.retain(|t| t != token);
        self.write_classes(node_id, tokens)
    }

    /// Replace `old` with `new` in place. Returns false (no change) when
    /// `old` is not present.
    pub fn replace_class(&mut self, node_id: NodeId, old: &str, new: &str) -> Result<bool> {
        validate_token(old)?;
        validate_token(new)?;
        let tokens = self.class_list(node_id)?;
        if !tokens.iter().any(|t| t == old) {
            return Ok(false);
        }

        let mut replaced: Vec<String> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let token = if token == old { new.to_string() } else { token };
            if !replaced.contains(&token) {
                replaced.push(token);
            }
        }
        self.write_classes(node_id, replaced)?;
        Ok(true)
    }

    /// Toggle a class, returning whether it is present afterwards
    pub fn toggle_class(&mut self, node_id: NodeId, token: &str) -> Result<bool> {
        if self.has_class(node_id, token)? {
            self.remove_class(node_id, token)?;
            Ok(false)
        } else {
            self.add_class(node_id, token)?;
            Ok(true)
        }
    }

    fn write_classes(&mut self, node_id: NodeId, tokens: Vec<String>) -> Result<()> {
        // No attribute is created just to hold an empty list
        if tokens.is_empty() && !self.has_attribute(node_id, "class")? {
            return Ok(());
        }
        self.set_attribute(node_id, "class", &tokens.join(" "))
    }
}

impl Default for DomArena {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_token(token: &str) -> Result<()> {
    if token.is_empty() || token.chars().any(|c| c.is_ascii_whitespace()) {
        return Err(DomError::InvalidToken(token.to_string()));
    }
    Ok(())
}
