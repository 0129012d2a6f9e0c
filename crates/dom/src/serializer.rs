//! Markup serializer
//!
//! Follows the HTML fragment serialization rules:
//! - void elements get no end tag and no children
//! - text is escaped, except inside raw-text elements (`script`, `style`, ...)
//! - attributes are emitted in insertion order with `"` quoting
//! - documents and fragments serialize as their children

use serde::{Deserialize, Serialize};

use crate::arena::DomArena;
use crate::error::Result;
use crate::types::*;

/// Serializer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    pub include_comments: bool,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            include_comments: true,
        }
    }
}

/// Tree to markup serializer
pub struct DomSerializer {
    config: SerializerConfig,
}

impl DomSerializer {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Markup for the node itself and its subtree
    pub fn outer_html(&self, arena: &DomArena, node_id: NodeId) -> Result<String> {
        let mut output = String::with_capacity(256);
        self.serialize_node(arena, node_id, &mut output)?;
        Ok(output)
    }

    /// Markup for the node's children only
    pub fn inner_html(&self, arena: &DomArena, node_id: NodeId) -> Result<String> {
        let mut output = String::with_capacity(256);
        self.serialize_children(arena, node_id, &mut output)?;
        Ok(output)
    }

    fn serialize_children(&self, arena: &DomArena, node_id: NodeId, output: &mut String) -> Result<()> {
        let node = arena.get(node_id)?;
        if node.tag_name().is_some_and(|tag| VOID_ELEMENTS.contains(&tag)) {
            return Ok(());
        }
        for &child_id in &node.children_ids {
            self.serialize_node(arena, child_id, output)?;
        }
        Ok(())
    }

    /// Serialize a single node recursively
    fn serialize_node(&self, arena: &DomArena, node_id: NodeId, output: &mut String) -> Result<()> {
        let node = arena.get(node_id)?;

        match node.node_type {
            NodeType::Element => {
                output.push('<');
                output.push_str(&node.node_name);
                for attr in &node.attributes {
                    output.push(' ');
                    output.push_str(&attr.name);
                    output.push_str("=\"");
                    escape_into(&attr.value, true, output);
                    output.push('"');
                }
                output.push('>');

                if VOID_ELEMENTS.contains(&node.node_name.as_str()) {
                    return Ok(());
                }

                self.serialize_children(arena, node_id, output)?;

                output.push_str("</");
                output.push_str(&node.node_name);
                output.push('>');
            }
            NodeType::Text => {
                let raw = arena
                    .parent(node_id)?
                    .and_then(|parent| parent.tag_name())
                    .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
                if raw {
                    output.push_str(&node.node_value);
                } else {
                    escape_into(&node.node_value, false, output);
                }
            }
            NodeType::Comment => {
                if self.config.include_comments {
                    output.push_str("<!--");
                    output.push_str(&node.node_value);
                    output.push_str("-->");
                }
            }
            NodeType::ProcessingInstruction => {
                output.push_str("<?");
                output.push_str(&node.node_name);
                output.push(' ');
                output.push_str(&node.node_value);
                output.push('>');
            }
            NodeType::DocumentType => {
                output.push_str("<!DOCTYPE ");
                output.push_str(&node.node_name);
                output.push('>');
            }
            NodeType::Document | NodeType::DocumentFragment => {
                self.serialize_children(arena, node_id, output)?;
            }
        }

        Ok(())
    }
}

impl Default for DomSerializer {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_into(text: &str, attribute: bool, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            '"' if attribute => output.push_str("&quot;"),
            '<' if !attribute => output.push_str("&lt;"),
            '>' if !attribute => output.push_str("&gt;"),
            c => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_element_tree() {
        let mut arena = DomArena::new();
        let div = arena.create_element("div");
        arena.set_attribute(div, "id", "main").unwrap();
        arena.set_attribute(div, "title", "a \"quoted\" & more").unwrap();
        let text = arena.create_text("1 < 2 & 3 > 2");
        let br = arena.create_element("br");
        let comment = arena.create_comment(" note ");
        arena.append_child(div, text).unwrap();
        arena.append_child(div, br).unwrap();
        arena.append_child(div, comment).unwrap();

        let serializer = DomSerializer::new();
        assert_eq!(
            serializer.outer_html(&arena, div).unwrap(),
            "<div id=\"main\" title=\"a &quot;quoted&quot; &amp; more\">1 &lt; 2 &amp; 3 &gt; 2<br><!-- note --></div>"
        );
        assert_eq!(
            serializer.inner_html(&arena, div).unwrap(),
            "1 &lt; 2 &amp; 3 &gt; 2<br><!-- note -->"
        );
    }

    #[test]
    fn test_raw_text_is_not_escaped() {
        let mut arena = DomArena::new();
        let script = arena.create_element("script");
        let code = arena.create_text("if (a < b && c) {}");
        arena.append_child(script, code).unwrap();

        let output = DomSerializer::new().outer_html(&arena, script).unwrap();
        assert_eq!(output, "<script>if (a < b && c) {}</script>");
    }

    #[test]
    fn test_comments_can_be_dropped() {
        let mut arena = DomArena::new();
        let frag = arena.create_fragment();
        let comment = arena.create_comment("x");
        let text = arena.create_text("\u{a0}y");
        arena.append_child(frag, comment).unwrap();
        arena.append_child(frag, text).unwrap();

        let serializer = DomSerializer::with_config(SerializerConfig {
            include_comments: false,
        });
        assert_eq!(serializer.outer_html(&arena, frag).unwrap(), "&nbsp;y");
    }
}
