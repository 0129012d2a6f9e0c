//! Shared document handle
//!
//! `Document` is a cheap-to-clone `Rc` handle owning the arena, the
//! listener registry and the configuration. Borrows of the arena are
//! short-lived: every method takes and releases its own borrow, so
//! nothing is held while user callbacks run.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::arena::DomArena;
use crate::config::DocumentConfig;
use crate::error::{DomError, Result};
use crate::events::ListenerRegistry;
use crate::parser;
use crate::selector::SelectorList;
use crate::serializer::DomSerializer;
use crate::types::{NodeId, NodeType};

pub(crate) struct DocumentInner {
    pub(crate) tree: RefCell<DomArena>,
    pub(crate) listeners: RefCell<ListenerRegistry>,
    root: NodeId,
    config: DocumentConfig,
}

#[derive(Clone)]
pub struct Document {
    pub(crate) inner: Rc<DocumentInner>,
}

impl Document {
    /// Blank `<html><head></head><body></body></html>` document
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    pub fn with_config(config: DocumentConfig) -> Self {
        let (tree, root) = DomArena::blank_document();
        Self::from_arena(tree, root, config)
    }

    /// Document node with no children
    pub fn empty() -> Self {
        let mut tree = DomArena::new();
        let root = tree.create_document();
        Self::from_arena(tree, root, DocumentConfig::default())
    }

    /// Parse a complete markup document
    pub fn parse(markup: &str) -> Result<Self> {
        Self::parse_with_config(markup, DocumentConfig::default())
    }

    pub fn parse_with_config(markup: &str, config: DocumentConfig) -> Result<Self> {
        let tree = parser::parse_document(markup, config.parse)?;
        let root = tree.root_id().ok_or(DomError::NodeNotFound(0))?;
        Ok(Self::from_arena(tree, root, config))
    }

    fn from_arena(tree: DomArena, root: NodeId, config: DocumentConfig) -> Self {
        Self {
            inner: Rc::new(DocumentInner {
                tree: RefCell::new(tree),
                listeners: RefCell::new(ListenerRegistry::default()),
                root,
                config,
            }),
        }
    }

    /// The Document node
    pub fn root(&self) -> NodeId {
        self.inner.root
    }

    /// The top-level element (`<html>`)
    pub fn document_element(&self) -> Option<NodeId> {
        let tree = self.tree();
        tree.element_children(self.root()).ok()?.first().copied()
    }

    fn section(&self, tag: &str) -> Option<NodeId> {
        let html = self.document_element()?;
        let tree = self.tree();
        tree.element_children(html)
            .ok()?
            .into_iter()
            .find(|&id| tree.get(id).is_ok_and(|n| n.node_name == tag))
    }

    pub fn head(&self) -> Option<NodeId> {
        self.section("head")
    }

    pub fn body(&self) -> Option<NodeId> {
        self.section("body")
    }

    /// Borrow the tree. Panics if a mutable borrow is live.
    pub fn tree(&self) -> Ref<'_, DomArena> {
        self.inner.tree.borrow()
    }

    /// Borrow the tree mutably. Panics if any other borrow is live.
    pub fn tree_mut(&self) -> RefMut<'_, DomArena> {
        self.inner.tree.borrow_mut()
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.inner.config
    }

    /// Whether both handles refer to the same document
    pub fn same(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // ----------------------------------------------------------------
    // Node creation
    // ----------------------------------------------------------------

    pub fn create_element(&self, tag: &str) -> NodeId {
        self.tree_mut().create_element(tag)
    }

    pub fn create_text(&self, text: &str) -> NodeId {
        self.tree_mut().create_text(text)
    }

    pub fn create_fragment(&self) -> NodeId {
        self.tree_mut().create_fragment()
    }

    // ----------------------------------------------------------------
    // Selection
    // ----------------------------------------------------------------

    /// Every matching element in the document, in tree order
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        let found = self.tree().select_all(self.root(), &list, None)?;
        tracing::trace!(selector, found = found.len(), "document query");
        Ok(found)
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        self.tree().select_first(self.root(), &list, None)
    }

    /// Matching elements strictly inside `scope`, with every selector in
    /// the list anchored at `scope` (`:scope <selector>`)
    pub fn query_selector_all_in(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        let tree = self.tree();
        let found = if tree.get(scope)?.is_element() {
            tree.select_all(scope, &list.scoped(), Some(scope))?
        } else {
            tree.select_all(scope, &list, None)?
        };
        tracing::trace!(selector, scope, found = found.len(), "scoped query");
        Ok(found)
    }

    pub fn matches(&self, node: NodeId, selector: &str) -> Result<bool> {
        let list = SelectorList::parse(selector)?;
        self.tree().matches(node, &list)
    }

    pub fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        self.tree().closest(node, &list)
    }

    // ----------------------------------------------------------------
    // Markup
    // ----------------------------------------------------------------

    /// Parse markup as `<body>` content into detached top-level nodes
    /// owned by this document
    pub fn parse_fragment(&self, markup: &str) -> Result<Vec<NodeId>> {
        parser::parse_fragment(&mut self.tree_mut(), markup, parser::DEFAULT_CONTEXT, self.config().parse)
    }

    /// Parse markup as it would be parsed inside `context`: table rows
    /// stay rows inside a `<tbody>`, text stays text inside a `<textarea>`.
    /// Non-element contexts parse as `<body>` content.
    pub fn parse_fragment_in(&self, context: NodeId, markup: &str) -> Result<Vec<NodeId>> {
        let context_tag = {
            let tree = self.tree();
            let node = tree.get(context)?;
            match node.node_type {
                NodeType::Element => node.node_name.clone(),
                _ => parser::DEFAULT_CONTEXT.to_string(),
            }
        };
        parser::parse_fragment(&mut self.tree_mut(), markup, &context_tag, self.config().parse)
    }

    /// Parse markup into a new DocumentFragment holding the top-level nodes
    pub fn parse_fragment_node(&self, markup: &str) -> Result<NodeId> {
        let nodes = self.parse_fragment(markup)?;
        let mut tree = self.tree_mut();
        let fragment = tree.create_fragment();
        for node in nodes {
            tree.append_child(fragment, node)?;
        }
        Ok(fragment)
    }

    /// Replace the children of `node` with parsed markup
    pub fn set_inner_html(&self, node: NodeId, markup: &str) -> Result<()> {
        let container = self.tree().get(node)?.node_type;
        if !container.is_container() {
            return Err(DomError::InvalidNodeType {
                expected: "Element".to_string(),
                actual: container.name().to_string(),
            });
        }
        let nodes = self.parse_fragment_in(node, markup)?;
        let mut tree = self.tree_mut();
        tree.clear_children(node)?;
        for child in nodes {
            tree.append_child(node, child)?;
        }
        Ok(())
    }

    pub fn outer_html(&self, node: NodeId) -> Result<String> {
        DomSerializer::with_config(self.config().serialize.clone()).outer_html(&self.tree(), node)
    }

    pub fn inner_html(&self, node: NodeId) -> Result<String> {
        DomSerializer::with_config(self.config().serialize.clone()).inner_html(&self.tree(), node)
    }

    pub fn text_content(&self, node: NodeId) -> Result<String> {
        self.tree().text_content(node)
    }

    /// Node type of `node`, if it exists
    pub fn node_type(&self, node: NodeId) -> Option<NodeType> {
        self.tree().get(node).ok().map(|n| n.node_type)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes = self.inner.tree.try_borrow().map(|t| t.len()).ok();
        f.debug_struct("Document")
            .field("root", &self.inner.root)
            .field("nodes", &nodes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAV: &str = r#"<!DOCTYPE html>
<html><head><title>t</title></head><body>
<nav id="nav"><div class="menu"><a class="one" href="/1">One</a><a class="two" href="/2">Two</a></div></nav>
<div id="mobile-menu"><a class="one" href="/m1">M1</a></div>
</body></html>"#;

    #[test]
    fn test_new_document_skeleton() {
        let doc = Document::new();
        let html = doc.document_element().unwrap();
        assert_eq!(doc.tree().get(html).unwrap().node_name, "html");
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
        assert_eq!(doc.outer_html(doc.root()).unwrap(), "<html><head></head><body></body></html>");
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::empty();
        assert!(doc.document_element().is_none());
        assert!(doc.body().is_none());
        assert_eq!(doc.node_type(doc.root()), Some(NodeType::Document));
    }

    #[test]
    fn test_query_document_and_scope() {
        let doc = Document::parse(NAV).unwrap();
        assert_eq!(doc.query_selector_all("a.one").unwrap().len(), 2);

        let menu = doc.query_selector("#mobile-menu").unwrap().unwrap();
        let scoped = doc.query_selector_all_in(menu, "a").unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(doc.tree().get_attribute(scoped[0], "href").unwrap(), Some("/m1"));

        // "div a" only counts divs inside the scope
        assert!(doc.query_selector_all_in(menu, "div a").unwrap().is_empty());
    }

    #[test]
    fn test_selector_errors_surface() {
        let doc = Document::parse(NAV).unwrap();
        assert!(matches!(
            doc.query_selector_all("a[href"),
            Err(DomError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn test_closest_and_matches() {
        let doc = Document::parse(NAV).unwrap();
        let link = doc.query_selector(".two").unwrap().unwrap();
        let nav = doc.closest(link, "nav").unwrap();
        assert_eq!(nav, doc.query_selector("#nav").unwrap());
        assert!(doc.matches(link, "div > a").unwrap());
    }

    #[test]
    fn test_inner_html_roundtrip() {
        let doc = Document::new();
        let body = doc.body().unwrap();
        doc.set_inner_html(body, "<p class=\"x\">a &amp; b</p>").unwrap();
        assert_eq!(doc.inner_html(body).unwrap(), "<p class=\"x\">a &amp; b</p>");
        assert_eq!(doc.text_content(body).unwrap(), "a & b");

        doc.set_inner_html(body, "<i>replaced</i>").unwrap();
        assert_eq!(doc.inner_html(body).unwrap(), "<i>replaced</i>");
    }

    #[test]
    fn test_inner_html_parses_in_element_context() {
        let doc = Document::parse("<table><tbody id=\"rows\"></tbody></table>").unwrap();
        let rows = doc.query_selector("#rows").unwrap().unwrap();
        doc.set_inner_html(rows, "<tr><td>a</td></tr>").unwrap();
        assert_eq!(doc.inner_html(rows).unwrap(), "<tr><td>a</td></tr>");

        // A text node is no element, so its markup parses as body content
        let text = doc.create_text("t");
        let nodes = doc.parse_fragment_in(text, "<tr><td>b</td></tr>").unwrap();
        assert_eq!(doc.tree().get(nodes[0]).unwrap().node_name, "#text");
    }

    #[test]
    fn test_parse_fragment_node() {
        let doc = Document::new();
        let fragment = doc.parse_fragment_node("<b>1</b><b>2</b>").unwrap();
        assert_eq!(doc.tree().child_ids(fragment).unwrap().len(), 2);
        assert_eq!(doc.outer_html(fragment).unwrap(), "<b>1</b><b>2</b>");
    }

    #[test]
    fn test_handles_share_state() {
        let doc = Document::new();
        let other = doc.clone();
        assert!(doc.same(&other));
        assert!(!doc.same(&Document::new()));

        let p = other.create_element("p");
        assert!(doc.tree().get(p).is_ok());
    }
}
