//! Markup parsing
//!
//! Uses html5ever's RcDom and converts the result into arena nodes.
//! Fragments are parsed against a context element, the way `innerHTML`
//! is; the children of the synthetic `<html>` root are then adopted as
//! detached nodes.

use html5ever::tendril::TendrilSink;
use html5ever::{ns, LocalName, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use serde::{Deserialize, Serialize};

use crate::arena::DomArena;
use crate::error::Result;
use crate::types::NodeId;

/// Controls which nodes of the parsed markup are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Keep text nodes that contain only whitespace
    pub keep_whitespace_text: bool,
    pub keep_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            keep_whitespace_text: true,
            keep_comments: true,
        }
    }
}

/// Context used when markup has no element to be parsed into
pub const DEFAULT_CONTEXT: &str = "body";

/// Parse a complete document into a fresh arena
pub fn parse_document(markup: &str, options: ParseOptions) -> Result<DomArena> {
    let dom = html5ever::parse_document(RcDom::default(), Default::default()).one(markup);

    let mut arena = DomArena::with_capacity(markup.len() / 16 + 16);
    let document = arena.create_document();
    for child in dom.document.children.borrow().iter() {
        convert_node(child, &mut arena, Some(document), options)?;
    }

    tracing::debug!(bytes = markup.len(), nodes = arena.len(), "parsed document");
    Ok(arena)
}

/// Parse markup as the content of a `context` element into `arena`,
/// returning the detached top-level nodes in source order
pub fn parse_fragment(
    arena: &mut DomArena,
    markup: &str,
    context: &str,
    options: ParseOptions,
) -> Result<Vec<NodeId>> {
    let context_name = QualName::new(None, ns!(html), LocalName::from(context.to_ascii_lowercase()));
    let dom = html5ever::parse_fragment(RcDom::default(), Default::default(), context_name, vec![], false)
        .one(markup);

    let mut top_level = Vec::new();
    for html in dom.document.children.borrow().iter() {
        if !is_element(html, "html") {
            continue;
        }
        for child in html.children.borrow().iter() {
            if let Some(id) = convert_node(child, arena, None, options)? {
                top_level.push(id);
            }
        }
    }

    tracing::trace!(bytes = markup.len(), context, nodes = top_level.len(), "parsed fragment");
    Ok(top_level)
}

fn is_element(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, RcNodeData::Element { name, .. } if &*name.local == tag)
}

/// Convert one RcDom node (and its subtree), appending it to `parent`
/// when given. Returns None for nodes filtered out by `options`.
fn convert_node(
    handle: &Handle,
    arena: &mut DomArena,
    parent: Option<NodeId>,
    options: ParseOptions,
) -> Result<Option<NodeId>> {
    let id = match &handle.data {
        RcNodeData::Document => return Ok(None),
        RcNodeData::Doctype { name, .. } => arena.create_doctype(name),
        RcNodeData::Text { contents } => {
            let text = contents.borrow();
            if !options.keep_whitespace_text && text.trim().is_empty() {
                return Ok(None);
            }
            arena.create_text(&text)
        }
        RcNodeData::Comment { contents } => {
            if !options.keep_comments {
                return Ok(None);
            }
            arena.create_comment(contents)
        }
        RcNodeData::ProcessingInstruction { target, contents } => {
            arena.create_processing_instruction(target, contents)
        }
        RcNodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let id = arena.create_element(&name.local);
            for attr in attrs.borrow().iter() {
                let attr_name = match &attr.name.prefix {
                    Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                    None => attr.name.local.to_string(),
                };
                arena.set_attribute(id, &attr_name, &attr.value)?;
            }

            // Template contents are flattened into ordinary children
            if let Some(contents) = template_contents.borrow().as_ref() {
                for child in contents.children.borrow().iter() {
                    convert_node(child, arena, Some(id), options)?;
                }
            }
            for child in handle.children.borrow().iter() {
                convert_node(child, arena, Some(id), options)?;
            }
            id
        }
    };

    if let Some(parent) = parent {
        arena.append_child(parent, id)?;
    }
    Ok(Some(id))
}
