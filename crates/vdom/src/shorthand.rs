//! `tag#id.class[key=value]` element shorthand
//!
//! Bracket blocks are collected and removed first (so values may contain
//! `.` or `#`), then the rest is split on `.`/`#`: the first piece is the
//! tag, `#piece` sets the id (last one wins), `.piece` appends a class.
//! A string with no delimiter and no bracket block is the tag verbatim.

/// Parsed view of a shorthand string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shorthand {
    pub tag: String,
    pub id: Option<String>,
    /// Unique, in encounter order
    pub classes: Vec<String>,
    /// `[key=value]` pairs in encounter order
    pub attributes: Vec<(String, String)>,
}

impl Shorthand {
    pub fn parse(input: &str) -> Self {
        let (rest, attributes) = extract_brackets(input);
        let has_delimiter = rest.contains(['.', '#']);

        if !has_delimiter && attributes.is_empty() {
            return Self {
                tag: input.to_string(),
                ..Self::default()
            };
        }

        let mut shorthand = Self {
            attributes,
            ..Self::default()
        };

        let tag_end = rest.find(['.', '#']).unwrap_or(rest.len());
        shorthand.tag = rest[..tag_end].to_string();

        let mut remaining = &rest[tag_end..];
        while let Some(delimiter) = remaining.chars().next() {
            let body = &remaining[1..];
            let end = body.find(['.', '#']).unwrap_or(body.len());
            let piece = &body[..end];
            remaining = &body[end..];

            if piece.is_empty() {
                continue;
            }
            if delimiter == '#' {
                shorthand.id = Some(piece.to_string());
            } else if !shorthand.classes.iter().any(|c| c == piece) {
                shorthand.classes.push(piece.to_string());
            }
        }

        shorthand
    }
}

/// Remove every non-empty `[...]` block, returning the remaining text and
/// the blocks split at their first `=`
fn extract_brackets(input: &str) -> (String, Vec<(String, String)>) {
    let mut rest = String::with_capacity(input.len());
    let mut attributes = Vec::new();
    let mut cursor = 0;

    while let Some(open) = input[cursor..].find('[').map(|i| cursor + i) {
        let Some(close) = input[open + 1..].find(']').map(|i| open + 1 + i) else {
            break;
        };
        if close == open + 1 {
            // `[]` is not a block; keep it as text
            rest.push_str(&input[cursor..=open]);
            cursor = open + 1;
            continue;
        }

        rest.push_str(&input[cursor..open]);
        let block = &input[open + 1..close];
        let (key, value) = block.split_once('=').unwrap_or((block, ""));
        if !key.is_empty() {
            attributes.push((key.to_string(), value.to_string()));
        }
        cursor = close + 1;
    }
    rest.push_str(&input[cursor..]);

    (rest, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_tag() {
        let parsed = Shorthand::parse("section");
        assert_eq!(parsed.tag, "section");
        assert!(parsed.id.is_none());
        assert!(parsed.classes.is_empty());
    }

    #[test]
    fn test_id_and_classes_in_any_order() {
        let parsed = Shorthand::parse("p.that#this.thing1.thing2");
        assert_eq!(parsed.tag, "p");
        assert_eq!(parsed.id.as_deref(), Some("this"));
        assert_eq!(parsed.classes, vec!["that", "thing1", "thing2"]);
    }

    #[test]
    fn test_last_id_wins_and_classes_are_unique() {
        let parsed = Shorthand::parse("div#a.x#b.x..y");
        assert_eq!(parsed.id.as_deref(), Some("b"));
        assert_eq!(parsed.classes, vec!["x", "y"]);
    }

    #[test]
    fn test_bracket_attributes() {
        let parsed = Shorthand::parse("p[itemscope=][itemtype=http://schema.org/Person].card");
        assert_eq!(parsed.tag, "p");
        assert_eq!(parsed.classes, vec!["card"]);
        assert_eq!(
            parsed.attributes,
            vec![
                ("itemscope".to_string(), String::new()),
                ("itemtype".to_string(), "http://schema.org/Person".to_string()),
            ]
        );
    }

    #[test]
    fn test_bracket_value_keeps_later_equals_signs() {
        let parsed = Shorthand::parse("a[href=/search?q=1][hidden]");
        assert_eq!(
            parsed.attributes,
            vec![
                ("href".to_string(), "/search?q=1".to_string()),
                ("hidden".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_malformed_brackets_degrade_to_literal_tag() {
        assert_eq!(Shorthand::parse("div[open").tag, "div[open");
        assert_eq!(Shorthand::parse("div[]").tag, "div[]");
    }
}
