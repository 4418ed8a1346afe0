// src/syntax/mod.rs
//! Lossless, persistent syntax trees.
//!
//! A [`SyntaxNode`] is a kind tag plus an ordered list of children. Every byte
//! of the original source lives in some [`Token`] (including whitespace and
//! comments between children), so unparsing is plain concatenation and
//! untouched regions keep their exact formatting.
//!
//! Nodes are never mutated in place. Rewrites build new nodes and share the
//! unchanged subtrees through `Arc`.

pub mod ruby;

use crate::hotspot::HotspotId;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Token kind used for source text that sits between two children.
pub const TRIVIA: &str = "trivia";

/// A leaf: identifier, operator, literal, keyword or trivia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: &'static str,
    pub text: String,
}

impl Token {
    #[must_use]
    pub fn new(kind: &'static str, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Node(Arc<SyntaxNode>),
    Token(Token),
    /// Marker left by the hotspot detector in place of a captured subtree.
    Hole(HotspotId),
}

/// A child slot, optionally labelled with the grammar field it fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    pub field: Option<&'static str>,
    pub element: Element,
}

impl Child {
    #[must_use]
    pub fn node(field: Option<&'static str>, node: SyntaxNode) -> Self {
        Self {
            field,
            element: Element::Node(Arc::new(node)),
        }
    }

    #[must_use]
    pub fn token(field: Option<&'static str>, kind: &'static str, text: impl Into<String>) -> Self {
        Self {
            field,
            element: Element::Token(Token::new(kind, text)),
        }
    }

    #[must_use]
    pub fn trivia(text: impl Into<String>) -> Self {
        Self::token(None, TRIVIA, text)
    }

    #[must_use]
    pub fn hole(field: Option<&'static str>, id: HotspotId) -> Self {
        Self {
            field,
            element: Element::Hole(id),
        }
    }

    #[must_use]
    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match &self.element {
            Element::Node(node) => Some(node),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_token(&self) -> Option<&Token> {
        match &self.element {
            Element::Token(token) => Some(token),
            _ => None,
        }
    }
}

/// An immutable node of the program tree.
///
/// Equality is structural and ignores the source span.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    kind: &'static str,
    span: Option<Range<usize>>,
    children: Vec<Child>,
}

impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.children == other.children
    }
}

impl Eq for SyntaxNode {}

impl SyntaxNode {
    #[must_use]
    pub fn new(kind: &'static str, children: Vec<Child>) -> Self {
        Self {
            kind,
            span: None,
            children,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Option<Range<usize>>) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Byte range in the source this node was parsed from, if any.
    #[must_use]
    pub fn span(&self) -> Option<Range<usize>> {
        self.span.clone()
    }

    #[must_use]
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Same kind and span, new children.
    #[must_use]
    pub fn updated(&self, children: Vec<Child>) -> Self {
        Self {
            kind: self.kind,
            span: self.span.clone(),
            children,
        }
    }

    /// First child filling `field`.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&Child> {
        self.children.iter().find(|c| c.field == Some(field))
    }

    #[must_use]
    pub fn field_node(&self, field: &str) -> Option<&SyntaxNode> {
        self.field(field).and_then(Child::as_node)
    }

    #[must_use]
    pub fn field_text(&self, field: &str) -> Option<&str> {
        self.field(field)
            .and_then(Child::as_token)
            .map(|t| t.text.as_str())
    }

    /// Rebuilds this node with the token in `field` replaced.
    ///
    /// Returns `None` when the field is absent or does not hold a token.
    #[must_use]
    pub fn replace_field_token(&self, field: &str, token: Token) -> Option<Self> {
        let idx = self
            .children
            .iter()
            .position(|c| c.field == Some(field) && c.as_token().is_some())?;
        let mut children = self.children.clone();
        if let Some(slot) = children.get_mut(idx) {
            slot.element = Element::Token(token);
        }
        Some(self.updated(children))
    }

    /// True when a detector hole remains anywhere below this node.
    #[must_use]
    pub fn has_holes(&self) -> bool {
        self.children.iter().any(|c| match &c.element {
            Element::Hole(_) => true,
            Element::Node(node) => node.has_holes(),
            Element::Token(_) => false,
        })
    }

    /// Pre-order walk over this node and every nested node.
    pub fn walk(&self, visit: &mut impl FnMut(&SyntaxNode)) {
        visit(self);
        for child in &self.children {
            if let Element::Node(node) = &child.element {
                node.walk(visit);
            }
        }
    }

    /// Renders the tree back to source text.
    #[must_use]
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        self.write_source(&mut out);
        out
    }

    fn write_source(&self, out: &mut String) {
        for child in &self.children {
            match &child.element {
                Element::Token(token) => out.push_str(&token.text),
                Element::Node(node) => node.write_source(out),
                Element::Hole(id) => {
                    out.push_str("⟨#");
                    out.push_str(&id.index().to_string());
                    out.push('⟩');
                }
            }
        }
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source())
    }
}
