// src/hotspot/catalog.rs
//! The fixed kind → matcher → alternatives table.
//!
//! Matchers are tested in table order and the first match wins. Block calls
//! come first so that `xs.any? { ... }` is a quantifier rather than a predicate.
//! Alternatives are plain `fn` pointers; operator and method-name families
//! rewrite only the selector token and leave receiver, arguments and block
//! exactly as they were passed in.

use super::HotspotKind;
use crate::syntax::{Child, SyntaxNode, Token};

pub const COMPARISON_OPERATORS: [&str; 4] = [">", ">=", "<", "<="];
pub const EQUALITY_OPERATORS: [&str; 2] = ["==", "!="];
pub const FILTER_METHODS: [&str; 2] = ["select", "reject"];
pub const QUANTIFIER_METHODS: [&str; 4] = ["all?", "none?", "any?", "one?"];

const CALL_KINDS: [&str; 1] = ["call"];
const BLOCK_KINDS: [&str; 2] = ["block", "do_block"];

/// A single rewrite rule.
#[derive(Clone, Copy)]
pub struct Alternative {
    pub label: &'static str,
    pub rewrite: fn(&SyntaxNode) -> SyntaxNode,
}

impl Alternative {
    #[must_use]
    pub fn apply(&self, node: &SyntaxNode) -> SyntaxNode {
        (self.rewrite)(node)
    }
}

impl std::fmt::Debug for Alternative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Alternative").field(&self.label).finish()
    }
}

pub struct KindEntry {
    pub kind: HotspotKind,
    pub matches: fn(&SyntaxNode) -> bool,
    pub alternatives: &'static [Alternative],
}

macro_rules! selector_rewrite {
    ($name:ident, $apply:ident, $text:literal) => {
        fn $name(node: &SyntaxNode) -> SyntaxNode {
            $apply(node, $text)
        }
    };
}

selector_rewrite!(to_gt, with_operator, ">");
selector_rewrite!(to_ge, with_operator, ">=");
selector_rewrite!(to_lt, with_operator, "<");
selector_rewrite!(to_le, with_operator, "<=");
selector_rewrite!(to_eq, with_operator, "==");
selector_rewrite!(to_ne, with_operator, "!=");
selector_rewrite!(to_select, with_method, "select");
selector_rewrite!(to_reject, with_method, "reject");
selector_rewrite!(to_all, with_method, "all?");
selector_rewrite!(to_none, with_method, "none?");
selector_rewrite!(to_any, with_method, "any?");
selector_rewrite!(to_one, with_method, "one?");

const COMPARISON: [Alternative; 4] = [
    Alternative { label: ">", rewrite: to_gt },
    Alternative { label: ">=", rewrite: to_ge },
    Alternative { label: "<", rewrite: to_lt },
    Alternative { label: "<=", rewrite: to_le },
];

const EQUALITY: [Alternative; 2] = [
    Alternative { label: "==", rewrite: to_eq },
    Alternative { label: "!=", rewrite: to_ne },
];

const PREDICATE: [Alternative; 2] = [
    Alternative { label: "identity", rewrite: identity },
    Alternative { label: "negate", rewrite: negate },
];

const FILTER: [Alternative; 2] = [
    Alternative { label: "select", rewrite: to_select },
    Alternative { label: "reject", rewrite: to_reject },
];

const QUANTIFIER: [Alternative; 4] = [
    Alternative { label: "all?", rewrite: to_all },
    Alternative { label: "none?", rewrite: to_none },
    Alternative { label: "any?", rewrite: to_any },
    Alternative { label: "one?", rewrite: to_one },
];

/// Registration table, in match-priority order.
pub static CATALOG: [KindEntry; 5] = [
    KindEntry {
        kind: HotspotKind::Filter,
        matches: is_filter_block,
        alternatives: &FILTER,
    },
    KindEntry {
        kind: HotspotKind::Quantifier,
        matches: is_quantifier_block,
        alternatives: &QUANTIFIER,
    },
    KindEntry {
        kind: HotspotKind::Comparison,
        matches: is_comparison,
        alternatives: &COMPARISON,
    },
    KindEntry {
        kind: HotspotKind::Equality,
        matches: is_equality,
        alternatives: &EQUALITY,
    },
    KindEntry {
        kind: HotspotKind::Predicate,
        matches: is_predicate_call,
        alternatives: &PREDICATE,
    },
];

/// Returns the first kind whose matcher accepts `node`.
#[must_use]
pub fn match_kind(node: &SyntaxNode) -> Option<HotspotKind> {
    CATALOG
        .iter()
        .find(|entry| (entry.matches)(node))
        .map(|entry| entry.kind)
}

#[must_use]
pub fn alternatives(kind: HotspotKind) -> &'static [Alternative] {
    CATALOG
        .iter()
        .find(|entry| entry.kind == kind)
        .map_or(&[], |entry| entry.alternatives)
}

/// Index of the alternative that leaves `node` unchanged, if the kind has one
/// for this particular node.
#[must_use]
pub fn identity_index(kind: HotspotKind, node: &SyntaxNode) -> Option<usize> {
    let current = match kind {
        HotspotKind::Predicate => return Some(0),
        HotspotKind::Comparison | HotspotKind::Equality => operator(node)?,
        HotspotKind::Filter | HotspotKind::Quantifier => method_name(node)?,
    };
    alternatives(kind).iter().position(|alt| alt.label == current)
}

// --- Matchers ---

fn operator(node: &SyntaxNode) -> Option<&str> {
    if node.kind() != "binary" {
        return None;
    }
    node.field_text("operator")
}

fn method_name(node: &SyntaxNode) -> Option<&str> {
    if !CALL_KINDS.contains(&node.kind()) {
        return None;
    }
    node.field_text("method")
}

fn has_block(node: &SyntaxNode) -> bool {
    node.field_node("block")
        .is_some_and(|block| BLOCK_KINDS.contains(&block.kind()))
}

fn is_comparison(node: &SyntaxNode) -> bool {
    operator(node).is_some_and(|op| COMPARISON_OPERATORS.contains(&op))
}

fn is_equality(node: &SyntaxNode) -> bool {
    operator(node).is_some_and(|op| EQUALITY_OPERATORS.contains(&op))
}

fn is_predicate_call(node: &SyntaxNode) -> bool {
    method_name(node).is_some_and(|name| name.ends_with('?'))
}

fn is_filter_block(node: &SyntaxNode) -> bool {
    has_block(node) && method_name(node).is_some_and(|name| FILTER_METHODS.contains(&name))
}

fn is_quantifier_block(node: &SyntaxNode) -> bool {
    has_block(node) && method_name(node).is_some_and(|name| QUANTIFIER_METHODS.contains(&name))
}

// --- Rewrites ---

fn with_operator(node: &SyntaxNode, op: &'static str) -> SyntaxNode {
    node.replace_field_token("operator", Token::new(op, op))
        .unwrap_or_else(|| node.clone())
}

fn with_method(node: &SyntaxNode, name: &'static str) -> SyntaxNode {
    node.replace_field_token("method", Token::new("identifier", name))
        .unwrap_or_else(|| node.clone())
}

fn identity(node: &SyntaxNode) -> SyntaxNode {
    node.clone()
}

/// Wraps the call in a parenthesized `!` unary node.
///
/// The parentheses keep the printed text equal to the tree when the
/// predicate is itself a receiver: `(!x.a?).b?`, not `!x.a?.b?`.
fn negate(node: &SyntaxNode) -> SyntaxNode {
    let unary = SyntaxNode::new(
        "unary",
        vec![
            Child::token(Some("operator"), "!", "!"),
            Child::node(Some("operand"), node.clone()),
        ],
    );
    SyntaxNode::new(
        "parenthesized_statements",
        vec![
            Child::token(None, "(", "("),
            Child::node(None, unary),
            Child::token(None, ")", ")"),
        ],
    )
    .with_span(node.span())
}
