// src/search/builder.rs
//! Materializes a concrete variant tree from a template and an assignment.
//!
//! At each hole the captured node is resolved first (its nested hotspots are
//! built with the same assignment), and only then is the hotspot's own
//! alternative applied. An alternative never sees an unresolved hole.

use super::enumerate::Assignment;
use crate::error::{RepairError, Result};
use crate::hotspot::{HotspotId, Template};
use crate::syntax::{Child, Element, SyntaxNode};
use std::sync::Arc;

/// Builds the variant selected by `assignment`.
///
/// # Errors
/// Returns `IncompleteAssignment` if a reachable hotspot has no choice, or
/// `InvalidChoice` if a choice is out of range for its kind.
pub fn build(template: &Template, assignment: &Assignment) -> Result<SyntaxNode> {
    resolve_node(template, template.root(), assignment)
}

/// Builds one hotspot, including everything nested inside it.
///
/// # Errors
/// Same as [`build`].
pub fn resolve_hotspot(
    template: &Template,
    id: HotspotId,
    assignment: &Assignment,
) -> Result<SyntaxNode> {
    let hotspot = template
        .hotspot(id)
        .ok_or(RepairError::IncompleteAssignment {
            hotspot: id.index(),
        })?;
    let resolved = resolve_node(template, hotspot.node(), assignment)?;

    let choice = assignment
        .choice(id)
        .ok_or(RepairError::IncompleteAssignment {
            hotspot: id.index(),
        })?;
    let alternatives = hotspot.kind().alternatives();
    let alternative = alternatives.get(choice).ok_or(RepairError::InvalidChoice {
        hotspot: id.index(),
        choice,
        available: alternatives.len(),
    })?;

    Ok(alternative.apply(&resolved))
}

fn resolve_node(
    template: &Template,
    node: &SyntaxNode,
    assignment: &Assignment,
) -> Result<SyntaxNode> {
    let children = node
        .children()
        .iter()
        .map(|child| resolve_child(template, child, assignment))
        .collect::<Result<Vec<_>>>()?;
    Ok(node.updated(children))
}

fn resolve_child(template: &Template, child: &Child, assignment: &Assignment) -> Result<Child> {
    let element = match &child.element {
        Element::Token(_) => return Ok(child.clone()),
        Element::Node(node) if !node.has_holes() => return Ok(child.clone()),
        Element::Node(node) => Element::Node(Arc::new(resolve_node(template, node, assignment)?)),
        Element::Hole(id) => Element::Node(Arc::new(resolve_hotspot(template, *id, assignment)?)),
    };
    Ok(Child {
        field: child.field,
        element,
    })
}
