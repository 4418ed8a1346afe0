// src/hotspot/detector.rs
//! Finds hotspots and replaces each captured subtree with a hole.
//!
//! Recursion into a matched node happens before the node itself is wrapped,
//! so every hotspot found below it becomes one of its children. The running
//! `found` list doubles as the "hotspots at this level" stack: a matched node
//! splits off everything pushed since it started, and whatever remains at the
//! end is the top-level forest.

use super::catalog;
use super::{Hotspot, HotspotArena, HotspotId, Template};
use crate::syntax::{Child, Element, SyntaxNode};
use std::sync::Arc;

/// Detects all hotspots in `tree`.
///
/// The root node itself is never captured; only its descendants are.
#[must_use]
pub fn detect(tree: &SyntaxNode) -> Template {
    let mut detector = Detector::default();
    let root = detector.rewrite_children(tree);
    log::debug!(
        "Detected {} hotspots ({} top-level)",
        detector.arena.len(),
        detector.found.len()
    );
    Template::new(root, detector.arena, detector.found)
}

#[derive(Default)]
struct Detector {
    arena: HotspotArena,
    found: Vec<HotspotId>,
}

impl Detector {
    fn rewrite_children(&mut self, node: &SyntaxNode) -> SyntaxNode {
        let children = node
            .children()
            .iter()
            .map(|child| self.rewrite_child(child))
            .collect();
        node.updated(children)
    }

    fn rewrite_child(&mut self, child: &Child) -> Child {
        match &child.element {
            Element::Node(node) => Child {
                field: child.field,
                element: self.rewrite_node(node),
            },
            Element::Token(_) | Element::Hole(_) => child.clone(),
        }
    }

    fn rewrite_node(&mut self, node: &Arc<SyntaxNode>) -> Element {
        let mark = self.found.len();
        let allocated = self.arena.len();

        let Some(kind) = catalog::match_kind(node) else {
            let rewritten = self.rewrite_children(node);
            // Untouched subtrees keep sharing the original allocation.
            if self.arena.len() == allocated {
                return Element::Node(Arc::clone(node));
            }
            return Element::Node(Arc::new(rewritten));
        };

        let captured = self.rewrite_children(node);
        let children = self.found.split_off(mark);
        let id = self.arena.alloc(Hotspot::new(kind, captured, children));
        self.found.push(id);
        Element::Hole(id)
    }
}
