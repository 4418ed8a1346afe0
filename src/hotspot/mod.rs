// src/hotspot/mod.rs
//! Mutation hotspots: detection, the alternative catalog and the template.
//!
//! # Architecture
//!
//! - `catalog`: Static kind table (matcher + ordered alternatives per kind)
//! - `detector`: Bottom-up tree walk that swaps matched subtrees for holes
//!
//! Hotspots live in an arena and are addressed by [`HotspotId`]. Two
//! syntactically identical hotspots at different positions get distinct ids.

pub mod catalog;
pub mod detector;

use crate::syntax::SyntaxNode;
use catalog::Alternative;
use serde::Serialize;
use std::fmt;

pub use detector::detect;

/// Stable index of a hotspot inside its [`HotspotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct HotspotId(usize);

impl HotspotId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for HotspotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of mutation families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HotspotKind {
    Comparison,
    Equality,
    Predicate,
    Filter,
    Quantifier,
}

impl HotspotKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Comparison => "comparison",
            Self::Equality => "equality",
            Self::Predicate => "predicate",
            Self::Filter => "filter",
            Self::Quantifier => "quantifier",
        }
    }

    /// Ordered rewrites for this kind, straight from the catalog.
    #[must_use]
    pub fn alternatives(self) -> &'static [Alternative] {
        catalog::alternatives(self)
    }

    #[must_use]
    pub fn alternative_count(self) -> usize {
        self.alternatives().len()
    }
}

/// A detected mutation point.
#[derive(Debug, Clone)]
pub struct Hotspot {
    kind: HotspotKind,
    node: SyntaxNode,
    children: Vec<HotspotId>,
}

impl Hotspot {
    /// `node` is the captured subtree with nested hotspots already replaced
    /// by holes; `children` lists those nested hotspots in source order.
    #[must_use]
    pub fn new(kind: HotspotKind, node: SyntaxNode, children: Vec<HotspotId>) -> Self {
        Self {
            kind,
            node,
            children,
        }
    }

    #[must_use]
    pub fn kind(&self) -> HotspotKind {
        self.kind
    }

    #[must_use]
    pub fn node(&self) -> &SyntaxNode {
        &self.node
    }

    #[must_use]
    pub fn children(&self) -> &[HotspotId] {
        &self.children
    }
}

#[derive(Debug, Clone, Default)]
pub struct HotspotArena {
    hotspots: Vec<Hotspot>,
}

impl HotspotArena {
    pub fn alloc(&mut self, hotspot: Hotspot) -> HotspotId {
        let id = HotspotId(self.hotspots.len());
        self.hotspots.push(hotspot);
        id
    }

    #[must_use]
    pub fn get(&self, id: HotspotId) -> Option<&Hotspot> {
        self.hotspots.get(id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hotspots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hotspots.is_empty()
    }
}

/// Detector output: the rewritten tree plus its conflict forest.
#[derive(Debug, Clone)]
pub struct Template {
    root: SyntaxNode,
    arena: HotspotArena,
    roots: Vec<HotspotId>,
}

impl Template {
    #[must_use]
    pub fn new(root: SyntaxNode, arena: HotspotArena, roots: Vec<HotspotId>) -> Self {
        Self { root, arena, roots }
    }

    /// The program tree with every top-level hotspot replaced by a hole.
    #[must_use]
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    #[must_use]
    pub fn arena(&self) -> &HotspotArena {
        &self.arena
    }

    /// Top-level hotspots in source order.
    #[must_use]
    pub fn roots(&self) -> &[HotspotId] {
        &self.roots
    }

    #[must_use]
    pub fn hotspot(&self, id: HotspotId) -> Option<&Hotspot> {
        self.arena.get(id)
    }

    /// Every hotspot, outermost first, in source order.
    #[must_use]
    pub fn preorder(&self) -> Vec<HotspotId> {
        self.preorder_with_depth().into_iter().map(|(id, _)| id).collect()
    }

    /// Pre-order listing paired with nesting depth (0 for top level).
    #[must_use]
    pub fn preorder_with_depth(&self) -> Vec<(HotspotId, usize)> {
        let mut out = Vec::with_capacity(self.arena.len());
        let mut stack: Vec<(HotspotId, usize)> =
            self.roots.iter().rev().map(|&id| (id, 0)).collect();

        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            if let Some(hotspot) = self.arena.get(id) {
                stack.extend(hotspot.children.iter().rev().map(|&c| (c, depth + 1)));
            }
        }
        out
    }

    /// Number of variants the enumerator will produce, saturating at `u128::MAX`.
    #[must_use]
    pub fn space_size(&self) -> u128 {
        self.preorder()
            .iter()
            .filter_map(|&id| self.arena.get(id))
            .fold(1u128, |acc, h| {
                acc.saturating_mul(h.kind.alternative_count() as u128)
            })
    }
}
