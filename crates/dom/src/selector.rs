//! Structural selector engine
//!
//! Parses the common subset of the CSS selector grammar and matches it
//! against an arena. Matching runs right-to-left: the rightmost compound
//! is tested against the candidate, then combinators walk parents or
//! previous siblings, backtracking on descendant/sibling combinators.
//!
//! Supported: selector lists, the four combinators, type/universal,
//! `#id`, `.class`, `[attr op value i]`, and the pseudo-classes
//! `:scope :root :first-child :last-child :only-child :empty
//! :nth-child() :nth-last-child() :not()`.

use std::fmt;
use std::str::FromStr;

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId, NodeType};

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthExpression {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl NthExpression {
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse from string like "2n+1", "odd", "even", "3", "-n+3"
    pub fn parse(s: &str) -> Option<Self> {
        let s: String = s
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        match s.as_str() {
            "odd" => return Some(Self::new(2, 1)),
            "even" => return Some(Self::new(2, 0)),
            "" => return None,
            _ => {}
        }

        if let Ok(n) = s.parse::<i32>() {
            return Some(Self::new(0, n));
        }

        let n_pos = s.find('n')?;
        let a = match &s[..n_pos] {
            "" | "+" => 1,
            "-" => -1,
            a => a.parse().ok()?,
        };
        let rest = &s[n_pos + 1..];
        let b = if rest.is_empty() {
            0
        } else if rest.starts_with('+') || rest.starts_with('-') {
            rest.trim_start_matches('+').parse().ok()?
        } else {
            return None;
        };

        Some(Self::new(a, b))
    }

    /// Check if index n (1-based) matches this expression
    pub fn matches(&self, n: i32) -> bool {
        if self.a == 0 {
            return n == self.b;
        }
        let diff = n - self.b;
        diff % self.a == 0 && diff / self.a >= 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value]
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value]
    Prefix(String),
    /// [attr$=value]
    Suffix(String),
    /// [attr*=value]
    Substring(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

impl AttributeSelector {
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        let Some(matcher) = &self.matcher else {
            return true;
        };

        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_ascii_lowercase()
            } else {
                s.to_string()
            }
        };
        let value = fold(value);

        match matcher {
            AttributeMatcher::Exact(expected) => value == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                !expected.is_empty() && value.split_ascii_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                value == expected || value.starts_with(&format!("{expected}-"))
            }
            AttributeMatcher::Prefix(expected) => {
                !expected.is_empty() && value.starts_with(&fold(expected))
            }
            AttributeMatcher::Suffix(expected) => {
                !expected.is_empty() && value.ends_with(&fold(expected))
            }
            AttributeMatcher::Substring(expected) => {
                !expected.is_empty() && value.contains(&fold(expected))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    Scope,
    Root,
    FirstChild,
    LastChild,
    OnlyChild,
    Empty,
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    Not(SelectorList),
}

/// A simple selector inside a compound
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (lowercase tag name)
    Type(String),
    Id(String),
    Class(String),
    Attribute(AttributeSelector),
    PseudoClass(PseudoClass),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

/// Compounds joined by combinators; `combinators[i]` sits between
/// `compounds[i]` and `compounds[i + 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<Vec<SelectorComponent>>,
    pub combinators: Vec<Combinator>,
}

/// Comma-separated list of complex selectors
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    source: String,
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    pub fn parse(source: &str) -> Result<Self> {
        let mut parser = Parser::new(source);
        let selectors = parser.parse_list(false)?;
        tracing::trace!(selector = source, count = selectors.len(), "parsed selector list");
        Ok(Self {
            source: source.to_string(),
            selectors,
        })
    }

    /// The text this list was parsed from (unchanged by `scoped`)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Rewrite every member as `:scope <member>`, restricting matches to
    /// proper descendants of the scope element
    pub fn scoped(&self) -> Self {
        let selectors = self
            .selectors
            .iter()
            .map(|complex| {
                let mut compounds = vec![vec![SelectorComponent::PseudoClass(PseudoClass::Scope)]];
                compounds.extend(complex.compounds.iter().cloned());
                let mut combinators = vec![Combinator::Descendant];
                combinators.extend(complex.combinators.iter().copied());
                ComplexSelector {
                    compounds,
                    combinators,
                }
            })
            .collect();

        Self {
            source: self.source.clone(),
            selectors,
        }
    }

    /// Whether `node` matches any member of the list
    pub fn matches(&self, arena: &DomArena, node: NodeId, scope: Option<NodeId>) -> bool {
        self.selectors
            .iter()
            .any(|complex| matches_from(arena, complex, complex.compounds.len() - 1, node, scope))
    }
}

impl FromStr for SelectorList {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// --------------------------------------------------------------------
// Matching
// --------------------------------------------------------------------

fn matches_from(
    arena: &DomArena,
    complex: &ComplexSelector,
    index: usize,
    node: NodeId,
    scope: Option<NodeId>,
) -> bool {
    let Ok(dom_node) = arena.get(node) else {
        return false;
    };
    if !matches_compound(arena, &complex.compounds[index], dom_node, scope) {
        return false;
    }
    if index == 0 {
        return true;
    }

    match complex.combinators[index - 1] {
        Combinator::Child => dom_node
            .parent_id
            .is_some_and(|parent| matches_from(arena, complex, index - 1, parent, scope)),
        Combinator::Descendant => {
            let mut current = dom_node.parent_id;
            while let Some(ancestor) = current {
                if matches_from(arena, complex, index - 1, ancestor, scope) {
                    return true;
                }
                current = arena.get(ancestor).ok().and_then(|n| n.parent_id);
            }
            false
        }
        Combinator::NextSibling => previous_element_siblings(arena, node)
            .first()
            .is_some_and(|&sibling| matches_from(arena, complex, index - 1, sibling, scope)),
        Combinator::SubsequentSibling => previous_element_siblings(arena, node)
            .into_iter()
            .any(|sibling| matches_from(arena, complex, index - 1, sibling, scope)),
    }
}

/// Element siblings before `node`, nearest first
fn previous_element_siblings(arena: &DomArena, node: NodeId) -> Vec<NodeId> {
    let Ok(Some(parent)) = arena.parent_id(node) else {
        return Vec::new();
    };
    let Ok(siblings) = arena.element_children(parent) else {
        return Vec::new();
    };
    let pos = siblings.iter().position(|&id| id == node).unwrap_or(0);
    siblings[..pos].iter().rev().copied().collect()
}

/// 1-based position among element siblings, and the element sibling count
fn element_position(arena: &DomArena, node: &DomNode) -> (usize, usize) {
    let Some(parent) = node.parent_id else {
        return (1, 1);
    };
    let Ok(siblings) = arena.element_children(parent) else {
        return (1, 1);
    };
    let pos = siblings
        .iter()
        .position(|&id| id == node.node_id)
        .unwrap_or(0);
    (pos + 1, siblings.len())
}

fn is_root_element(arena: &DomArena, node: &DomNode) -> bool {
    node.parent_id
        .and_then(|parent| arena.get(parent).ok())
        .is_some_and(|parent| parent.node_type == NodeType::Document)
}

fn matches_compound(
    arena: &DomArena,
    compound: &[SelectorComponent],
    node: &DomNode,
    scope: Option<NodeId>,
) -> bool {
    node.is_element()
        && compound
            .iter()
            .all(|component| matches_component(arena, component, node, scope))
}

fn matches_component(
    arena: &DomArena,
    component: &SelectorComponent,
    node: &DomNode,
    scope: Option<NodeId>,
) -> bool {
    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => node.node_name.eq_ignore_ascii_case(tag),
        SelectorComponent::Id(id) => node.attr("id") == Some(id.as_str()),
        SelectorComponent::Class(class) => node.classes().contains(&class.as_str()),
        SelectorComponent::Attribute(attr) => attr.matches(node.attr(&attr.name)),
        SelectorComponent::PseudoClass(pseudo) => match pseudo {
            PseudoClass::Scope => match scope {
                Some(scope) => node.node_id == scope,
                None => is_root_element(arena, node),
            },
            PseudoClass::Root => is_root_element(arena, node),
            PseudoClass::FirstChild => element_position(arena, node).0 == 1,
            PseudoClass::LastChild => {
                let (index, count) = element_position(arena, node);
                index == count
            }
            PseudoClass::OnlyChild => element_position(arena, node).1 == 1,
            PseudoClass::Empty => node.children_ids.iter().all(|&child| {
                arena.get(child).is_ok_and(|c| {
                    matches!(c.node_type, NodeType::Comment | NodeType::ProcessingInstruction)
                })
            }),
            PseudoClass::NthChild(expr) => expr.matches(element_position(arena, node).0 as i32),
            PseudoClass::NthLastChild(expr) => {
                let (index, count) = element_position(arena, node);
                expr.matches((count - index + 1) as i32)
            }
            PseudoClass::Not(list) => !list.matches(arena, node.node_id, scope),
        },
    }
}

impl DomArena {
    /// Element descendants of `root` matching `list`, in tree order
    pub fn select_all(
        &self,
        root: NodeId,
        list: &SelectorList,
        scope: Option<NodeId>,
    ) -> Result<Vec<NodeId>> {
        Ok(self
            .descendants(root)?
            .into_iter()
            .filter(|&id| list.matches(self, id, scope))
            .collect())
    }

    /// First element descendant of `root` matching `list`
    pub fn select_first(
        &self,
        root: NodeId,
        list: &SelectorList,
        scope: Option<NodeId>,
    ) -> Result<Option<NodeId>> {
        Ok(self
            .descendants(root)?
            .into_iter()
            .find(|&id| list.matches(self, id, scope)))
    }

    pub fn matches(&self, node: NodeId, list: &SelectorList) -> Result<bool> {
        self.get(node)?;
        Ok(list.matches(self, node, None))
    }

    /// Nearest inclusive ancestor matching `list`
    pub fn closest(&self, node: NodeId, list: &SelectorList) -> Result<Option<NodeId>> {
        if list.matches(self, node, None) {
            return Ok(Some(node));
        }
        Ok(self
            .ancestors(node)?
            .into_iter()
            .find(|&id| list.matches(self, id, None)))
    }
}

// --------------------------------------------------------------------
// Parsing
// --------------------------------------------------------------------

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> DomError {
        DomError::selector(self.source, reason)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of input"))),
        }
    }

    /// Returns whether any whitespace was skipped
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse_list(&mut self, nested: bool) -> Result<Vec<ComplexSelector>> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                }
                Some(')') if nested => return Ok(selectors),
                None if !nested => return Ok(selectors),
                None => return Err(self.error("unclosed '('")),
                Some(c) => return Err(self.error(format!("unexpected '{c}'"))),
            }
        }
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                None | Some(',') | Some(')') => break,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(c) => return Err(self.error(format!("unexpected '{c}'"))),
            };
            if combinator != Combinator::Descendant {
                self.pos += 1;
                self.skip_whitespace();
            }
            compounds.push(self.parse_compound()?);
            combinators.push(combinator);
        }

        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<Vec<SelectorComponent>> {
        let mut components = Vec::new();

        match self.peek() {
            Some('*') => {
                self.pos += 1;
                components.push(SelectorComponent::Universal);
            }
            Some(c) if is_ident_start(c) => {
                let tag = self.parse_ident()?;
                components.push(SelectorComponent::Type(tag.to_ascii_lowercase()));
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Id(self.parse_ident()?));
                }
                Some('.') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Class(self.parse_ident()?));
                }
                Some('[') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Attribute(self.parse_attribute()?));
                }
                Some(':') => {
                    self.pos += 1;
                    components.push(SelectorComponent::PseudoClass(self.parse_pseudo()?));
                }
                _ => break,
            }
        }

        if components.is_empty() {
            return Err(match self.peek() {
                Some(c) => self.error(format!("unexpected '{c}'")),
                None => self.error("expected selector"),
            });
        }
        Ok(components)
    }

    fn parse_ident(&mut self) -> Result<String> {
        let mut ident = String::new();
        match self.peek() {
            Some(c) if is_ident_start(c) => {}
            Some(c) => return Err(self.error(format!("expected identifier, found '{c}'"))),
            None => return Err(self.error("expected identifier")),
        }
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                match self.bump() {
                    Some(escaped) => ident.push(escaped),
                    None => return Err(self.error("dangling escape")),
                }
            } else if is_ident_char(c) {
                ident.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        if ident == "-" {
            return Err(self.error("expected identifier"));
        }
        Ok(ident)
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector> {
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttributeSelector {
                    name,
                    matcher: None,
                    case_insensitive: false,
                });
            }
            Some('=') => {
                self.pos += 1;
                '='
            }
            Some(op @ ('~' | '|' | '^' | '$' | '*')) => {
                self.pos += 1;
                self.expect('=')?;
                op
            }
            Some(c) => return Err(self.error(format!("unexpected '{c}' in attribute selector"))),
            None => return Err(self.error("unclosed '['")),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                self.parse_string(quote)?
            }
            _ => self.parse_ident()?,
        };
        self.skip_whitespace();

        let case_insensitive = match self.peek() {
            Some('i' | 'I') => {
                self.pos += 1;
                self.skip_whitespace();
                true
            }
            Some('s' | 'S') => {
                self.pos += 1;
                self.skip_whitespace();
                false
            }
            _ => false,
        };
        self.expect(']')?;

        let matcher = match op {
            '=' => AttributeMatcher::Exact(value),
            '~' => AttributeMatcher::Contains(value),
            '|' => AttributeMatcher::DashMatch(value),
            '^' => AttributeMatcher::Prefix(value),
            '$' => AttributeMatcher::Suffix(value),
            _ => AttributeMatcher::Substring(value),
        };

        Ok(AttributeSelector {
            name,
            matcher: Some(matcher),
            case_insensitive,
        })
    }

    fn parse_string(&mut self, quote: char) -> Result<String> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => value.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn parse_pseudo(&mut self) -> Result<PseudoClass> {
        if self.peek() == Some(':') {
            return Err(self.error("pseudo-elements are not supported"));
        }
        let name = self.parse_ident()?.to_ascii_lowercase();

        let pseudo = match name.as_str() {
            "scope" => PseudoClass::Scope,
            "root" => PseudoClass::Root,
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "empty" => PseudoClass::Empty,
            "nth-child" | "nth-last-child" => {
                self.expect('(')?;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != ')') {
                    self.pos += 1;
                }
                let argument: String = self.chars[start..self.pos].iter().collect();
                self.expect(')')?;
                let expr = NthExpression::parse(&argument)
                    .ok_or_else(|| self.error(format!("invalid :{name}() argument '{argument}'")))?;
                if name == "nth-child" {
                    PseudoClass::NthChild(expr)
                } else {
                    PseudoClass::NthLastChild(expr)
                }
            }
            "not" => {
                self.expect('(')?;
                let start = self.pos;
                let selectors = self.parse_list(true)?;
                let inner: String = self.chars[start..self.pos].iter().collect();
                self.expect(')')?;
                PseudoClass::Not(SelectorList {
                    source: inner.trim().to_string(),
                    selectors,
                })
            }
            other => return Err(self.error(format!("unsupported pseudo-class ':{other}'"))),
        };

        Ok(pseudo)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || c == '\\' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// div#root > [p.a, p.b#second (> span), p.c[data-x="Y z"]]
    fn fixture() -> (DomArena, NodeId, Vec<NodeId>) {
        let mut arena = DomArena::new();
        let doc = arena.create_document();
        let root = arena.create_element("div");
        arena.set_attribute(root, "id", "root").unwrap();
        arena.append_child(doc, root).unwrap();

        let mut ids = Vec::new();
        for (class, id) in [("a", None), ("b", Some("second")), ("c", None)] {
            let p = arena.create_element("p");
            arena.set_attribute(p, "class", class).unwrap();
            if let Some(id) = id {
                arena.set_attribute(p, "id", id).unwrap();
            }
            arena.append_child(root, p).unwrap();
            ids.push(p);
        }
        let span = arena.create_element("span");
        arena.append_child(ids[1], span).unwrap();
        ids.push(span);
        arena.set_attribute(ids[2], "data-x", "Y z").unwrap();

        (arena, root, ids)
    }

    fn select(arena: &DomArena, selector: &str) -> Vec<NodeId> {
        let list = SelectorList::parse(selector).unwrap();
        arena.select_all(0, &list, None).unwrap()
    }

    #[test]
    fn test_nth_expression() {
        let odd = NthExpression::parse("odd").unwrap();
        assert!(odd.matches(1) && !odd.matches(2) && odd.matches(3));

        let first_three = NthExpression::parse("-n+3").unwrap();
        assert!(first_three.matches(3) && !first_three.matches(4));

        assert_eq!(NthExpression::parse("2n + 1"), Some(NthExpression::new(2, 1)));
        assert_eq!(NthExpression::parse("4"), Some(NthExpression::new(0, 4)));
        assert!(NthExpression::parse("n3").is_none());
    }

    #[test]
    fn test_simple_selectors() {
        let (arena, root, ids) = fixture();
        assert_eq!(select(&arena, "p"), vec![ids[0], ids[1], ids[2]]);
        assert_eq!(select(&arena, "#second"), vec![ids[1]]);
        assert_eq!(select(&arena, ".c"), vec![ids[2]]);
        assert_eq!(select(&arena, "DIV"), vec![root]);
        assert_eq!(select(&arena, "*").len(), 5);
    }

    #[test]
    fn test_combinators() {
        let (arena, _, ids) = fixture();
        assert_eq!(select(&arena, "div span"), vec![ids[3]]);
        assert_eq!(select(&arena, "div > span"), Vec::<NodeId>::new());
        assert_eq!(select(&arena, "#root>p"), vec![ids[0], ids[1], ids[2]]);
        assert_eq!(select(&arena, ".a + p"), vec![ids[1]]);
        assert_eq!(select(&arena, ".a ~ p"), vec![ids[1], ids[2]]);
        assert_eq!(select(&arena, "span, .a"), vec![ids[0], ids[3]]);
    }

    #[test]
    fn test_attribute_selectors() {
        let (arena, _, ids) = fixture();
        assert_eq!(select(&arena, "[data-x]"), vec![ids[2]]);
        assert_eq!(select(&arena, "[data-x='Y z']"), vec![ids[2]]);
        assert_eq!(select(&arena, "[data-x=\"y z\" i]"), vec![ids[2]]);
        assert_eq!(select(&arena, "[data-x~=z]"), vec![ids[2]]);
        assert_eq!(select(&arena, "[id^=sec]"), vec![ids[1]]);
        assert_eq!(select(&arena, "[id$=ond]"), vec![ids[1]]);
        assert_eq!(select(&arena, "[id*=coo]"), Vec::<NodeId>::new());
    }

    #[test]
    fn test_structural_pseudo_classes() {
        let (arena, root, ids) = fixture();
        assert_eq!(select(&arena, "p:first-child"), vec![ids[0]]);
        assert_eq!(select(&arena, "p:last-child"), vec![ids[2]]);
        assert_eq!(select(&arena, "span:only-child"), vec![ids[3]]);
        assert_eq!(select(&arena, "p:nth-child(2)"), vec![ids[1]]);
        assert_eq!(select(&arena, "p:nth-last-child(1)"), vec![ids[2]]);
        assert_eq!(select(&arena, ":root"), vec![root]);
        assert_eq!(select(&arena, "p:empty"), vec![ids[0], ids[2]]);
        assert_eq!(select(&arena, "p:not(.a, .c)"), vec![ids[1]]);
    }

    #[test]
    fn test_scoped_rewrite() {
        let (arena, root, ids) = fixture();
        let list = SelectorList::parse("p, span").unwrap().scoped();
        assert_eq!(list.source(), "p, span");

        let in_second = arena.select_all(ids[1], &list, Some(ids[1])).unwrap();
        assert_eq!(in_second, vec![ids[3]]);

        // The div is an ancestor of the scope, not inside it
        let nested = SelectorList::parse("div span").unwrap().scoped();
        assert!(arena.select_all(ids[1], &nested, Some(ids[1])).unwrap().is_empty());
        assert_eq!(arena.select_all(root, &nested, Some(root)).unwrap(), Vec::<NodeId>::new());
    }

    #[test]
    fn test_closest() {
        let (arena, root, ids) = fixture();
        let list = SelectorList::parse("div").unwrap();
        assert_eq!(arena.closest(ids[3], &list).unwrap(), Some(root));
        let list = SelectorList::parse("span").unwrap();
        assert_eq!(arena.closest(ids[3], &list).unwrap(), Some(ids[3]));
        assert!(arena.matches(ids[3], &list).unwrap());
    }

    #[test]
    fn test_invalid_selectors() {
        for bad in ["", "p >", "..a", "[a", "a:hover", "p::before", "[a=]", ":not(p", "#", "a,"] {
            assert!(
                matches!(SelectorList::parse(bad), Err(DomError::InvalidSelector { .. })),
                "{bad:?} should be rejected"
            );
        }
    }
}
