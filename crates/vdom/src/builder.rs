//! Detached element builder
//!
//! A `VNode` wraps one element created in a document's arena but not yet
//! attached anywhere. Builder methods consume and return the handle so
//! calls chain: `build(&doc, "p.note")?.set_text("hi")?.to_markup()?`.

use std::fmt;

use dom::{Document, DomError, NodeId, Result};
use serde_json::Value;

use crate::shorthand::Shorthand;

/// Something that can be attached as a child
#[derive(Debug, Clone)]
pub enum Child {
    /// A builder handle, unwrapped to its element
    Builder(VNode),
    /// Any existing node of the same document
    Node(NodeId),
}

impl From<VNode> for Child {
    fn from(node: VNode) -> Self {
        Child::Builder(node)
    }
}

impl From<&VNode> for Child {
    fn from(node: &VNode) -> Self {
        Child::Builder(node.clone())
    }
}

impl From<NodeId> for Child {
    fn from(node: NodeId) -> Self {
        Child::Node(node)
    }
}

impl Child {
    /// The node id to insert into `doc`
    pub fn resolve(&self, doc: &Document) -> Result<NodeId> {
        match self {
            Child::Builder(node) if !node.doc.same(doc) => Err(DomError::WrongDocument),
            Child::Builder(node) => Ok(node.node),
            Child::Node(id) => {
                doc.tree().get(*id)?;
                Ok(*id)
            }
        }
    }
}

/// Handle to one detached, builder-created element
#[derive(Debug, Clone)]
pub struct VNode {
    doc: Document,
    node: NodeId,
}

impl VNode {
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// The underlying element
    pub fn to_node(&self) -> NodeId {
        self.node
    }

    /// Append children in order. Iteration stops at the first `None`;
    /// later items are not attached.
    pub fn with_children<I, C>(self, children: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<C>>,
        C: Into<Child>,
    {
        for child in children {
            let Some(child) = child else {
                break;
            };
            append(&self.doc, self.node, child.into())?;
        }
        Ok(self)
    }

    pub fn with_child(self, child: impl Into<Child>) -> Result<Self> {
        append(&self.doc, self.node, child.into())?;
        Ok(self)
    }

    /// Append parsed markup after the existing children, or replace them
    /// when `replace` is set
    pub fn set_html(self, markup: &str, replace: bool) -> Result<Self> {
        let nodes = self.doc.parse_fragment_in(self.node, markup)?;
        {
            let mut tree = self.doc.tree_mut();
            if replace {
                tree.clear_children(self.node)?;
            }
            for node in nodes {
                tree.append_child(self.node, node)?;
            }
        }
        Ok(self)
    }

    /// Append a text node holding `text` verbatim
    pub fn set_text(self, text: &str) -> Result<Self> {
        {
            let mut tree = self.doc.tree_mut();
            let node = tree.create_text(text);
            tree.append_child(self.node, node)?;
        }
        Ok(self)
    }

    /// Concatenated text of the element's subtree
    pub fn read_text(&self) -> Result<String> {
        self.doc.text_content(self.node)
    }

    /// Outer markup of the element
    pub fn to_markup(&self) -> Result<String> {
        self.doc.outer_html(self.node)
    }
}

impl fmt::Display for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let markup = self.to_markup().map_err(|_| fmt::Error)?;
        f.write_str(&markup)
    }
}

fn append(doc: &Document, parent: NodeId, child: Child) -> Result<()> {
    let id = child.resolve(doc)?;
    doc.tree_mut().append_child(parent, id)?;
    Ok(())
}

/// Build a detached element from a shorthand string
pub fn build(doc: &Document, tag: &str) -> Result<VNode> {
    build_with(doc, tag, &Value::Null)
}

/// Build a detached element from a shorthand string and an attribute
/// object. Non-object `attributes` carry no attributes.
///
/// Merge rules, applied in this order:
/// - explicit keys in their own order; `class` becomes the shorthand
///   classes followed by the explicit ones, `id` yields to a shorthand id,
///   `data: {k: v}` expands to `data-k` attributes
/// - shorthand classes and id not already placed by an explicit key
/// - `[key=value]` blocks, overriding any explicit value; a shorthand
///   `#id` still wins over an `[id=...]` block
pub fn build_with(doc: &Document, tag: &str, attributes: &Value) -> Result<VNode> {
    let shorthand = Shorthand::parse(tag);
    if !is_valid_tag_name(&shorthand.tag) {
        return Err(DomError::InvalidTagName(shorthand.tag));
    }

    let node = {
        let mut tree = doc.tree_mut();
        let node = tree.create_element(&shorthand.tag);
        let mut placed_class = false;
        let mut placed_id = false;

        if let Some(explicit) = attributes.as_object() {
            for (key, value) in explicit {
                match (key.as_str(), value) {
                    ("class", _) => {
                        placed_class = true;
                        let mut classes = shorthand.classes.clone();
                        let extra = attribute_value(value).unwrap_or_default();
                        for token in extra.split_ascii_whitespace() {
                            if !classes.iter().any(|c| c == token) {
                                classes.push(token.to_string());
                            }
                        }
                        tree.set_attribute(node, "class", &classes.join(" "))?;
                    }
                    ("id", _) => {
                        let id = shorthand.id.clone().or_else(|| attribute_value(value));
                        if let Some(id) = id {
                            placed_id = true;
                            tree.set_attribute(node, "id", &id)?;
                        }
                    }
                    ("data", Value::Object(entries)) => {
                        for (name, value) in entries {
                            if let Some(value) = attribute_value(value) {
                                tree.set_attribute(node, &format!("data-{name}"), &value)?;
                            }
                        }
                    }
                    _ => {
                        if let Some(value) = attribute_value(value) {
                            tree.set_attribute(node, key, &value)?;
                        }
                    }
                }
            }
        }

        if !placed_class && !shorthand.classes.is_empty() {
            tree.set_attribute(node, "class", &shorthand.classes.join(" "))?;
        }
        if !placed_id {
            if let Some(id) = &shorthand.id {
                tree.set_attribute(node, "id", id)?;
            }
        }
        for (key, value) in &shorthand.attributes {
            if key == "id" && shorthand.id.is_some() {
                continue;
            }
            tree.set_attribute(node, key, value)?;
        }
        node
    };

    tracing::debug!(tag, node, "built element");
    Ok(VNode {
        doc: doc.clone(),
        node,
    })
}

/// String form of an attribute value; `None` means "do not set"
fn attribute_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(attribute_value)
                .collect::<Vec<_>>()
                .join(" "),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

fn is_valid_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':') || !c.is_ascii())
}
