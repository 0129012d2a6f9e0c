//! In-memory element construction
//!
//! Elements are built detached, in the arena of the document they will
//! eventually join, then handed to the query layer (or appended by id).
//!
//! ```text
//! build(&doc, "ul#menu.nav")?            →  <ul id="menu" class="nav">
//!     .with_children([Some(item_a), ...])    (stops at the first None)
//!     .to_node()                         →  NodeId, ready to insert
//! ```

pub mod builder;
pub mod shorthand;

pub use builder::{build, build_with, Child, VNode};
pub use shorthand::Shorthand;

use dom::{Document, NodeId, Result};

/// Move items into a new detached DocumentFragment. Iteration stops at
/// the first `None`, like [`VNode::with_children`].
pub fn fragment<I, C>(doc: &Document, items: I) -> Result<NodeId>
where
    I: IntoIterator<Item = Option<C>>,
    C: Into<Child>,
{
    let fragment = doc.create_fragment();
    for item in items {
        let Some(item) = item else {
            break;
        };
        let id = item.into().resolve(doc)?;
        doc.tree_mut().append_child(fragment, id)?;
    }
    Ok(fragment)
}

/// Detached text node
pub fn text(doc: &Document, value: &str) -> NodeId {
    doc.create_text(value)
}

/// Parse markup as `<body>` content into a detached DocumentFragment of
/// its top-level nodes
pub fn markup(doc: &Document, source: &str) -> Result<NodeId> {
    doc.parse_fragment_node(source)
}
