// src/syntax/ruby.rs
//! Ruby front end: lowers a tree-sitter-ruby parse into a [`SyntaxNode`] tree.
//!
//! Leaf nodes become tokens. Text between siblings becomes trivia tokens, so
//! `parse(src)?.to_source() == src` for every well-formed input.

use super::{Child, Element, SyntaxNode, Token};
use crate::error::{RepairError, Result};
use std::sync::Arc;
use tree_sitter::{Node, Parser};

/// Parses Ruby source into a lossless syntax tree.
///
/// # Errors
/// Returns `RepairError::Parse` if the grammar cannot be loaded or the source
/// contains syntax errors.
pub fn parse(source: &str) -> Result<SyntaxNode> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_ruby::LANGUAGE.into())
        .map_err(|e| RepairError::Parse {
            line: 0,
            column: 0,
            message: format!("Failed to set parser language: {e}"),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| RepairError::Parse {
            line: 0,
            column: 0,
            message: "Parser produced no tree".to_string(),
        })?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(describe_error(root));
    }

    let lowered = lower(root, source);
    Ok(cover_whole_source(lowered, root, source))
}

/// Locates the first ERROR or MISSING node for the error message.
fn describe_error(root: Node) -> RepairError {
    let culprit = first_error(root).unwrap_or(root);
    let pos = culprit.start_position();
    let message = if culprit.is_missing() {
        format!("missing '{}'", culprit.kind())
    } else {
        "unexpected syntax".to_string()
    };
    RepairError::Parse {
        line: pos.row + 1,
        column: pos.column + 1,
        message,
    }
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(Node::has_error)
        .find_map(first_error)
}

fn lower(node: Node, source: &str) -> SyntaxNode {
    let mut children = Vec::new();
    let mut offset = node.start_byte();

    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            push_trivia(&mut children, source, offset, child.start_byte());
            children.push(Child {
                field: cursor.field_name(),
                element: lower_element(child, source),
            });
            offset = offset.max(child.end_byte());
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
    push_trivia(&mut children, source, offset, node.end_byte());

    SyntaxNode::new(node.kind(), children).with_span(Some(node.byte_range()))
}

fn lower_element(node: Node, source: &str) -> Element {
    if node.child_count() == 0 {
        let text = source.get(node.byte_range()).unwrap_or_default();
        Element::Token(Token::new(node.kind(), text))
    } else {
        Element::Node(Arc::new(lower(node, source)))
    }
}

fn push_trivia(children: &mut Vec<Child>, source: &str, from: usize, to: usize) {
    if from >= to {
        return;
    }
    if let Some(text) = source.get(from..to) {
        children.push(Child::trivia(text));
    }
}

/// The root node may not span leading or trailing whitespace; fold it in.
fn cover_whole_source(lowered: SyntaxNode, root: Node, source: &str) -> SyntaxNode {
    let (start, end) = (root.start_byte(), root.end_byte());
    if start == 0 && end >= source.len() {
        return lowered;
    }

    let mut children = Vec::with_capacity(lowered.children().len() + 2);
    push_trivia(&mut children, source, 0, start);
    children.extend(lowered.children().iter().cloned());
    push_trivia(&mut children, source, end, source.len());

    SyntaxNode::new(lowered.kind(), children).with_span(Some(0..source.len()))
}
