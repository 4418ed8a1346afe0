// src/search/enumerate.rs
//! Lazy enumeration of joint alternative choices.
//!
//! The sequence is the lexicographic product over the pre-order hotspot list:
//! outermost hotspots vary slowest, the last hotspot in source order varies
//! fastest, and each position counts through its catalog order. That is the
//! same as "each alternative of a hotspot × every joint assignment of its
//! children", with top-level trees combined as a Cartesian product.

use crate::hotspot::{HotspotId, Template};
use serde::Serialize;

/// One alternative index per hotspot, stored densely by [`HotspotId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Assignment {
    choices: Vec<Option<usize>>,
}

impl Assignment {
    /// An empty assignment with room for `slots` hotspots.
    #[must_use]
    pub fn new(slots: usize) -> Self {
        Self {
            choices: vec![None; slots],
        }
    }

    #[must_use]
    pub fn choice(&self, id: HotspotId) -> Option<usize> {
        self.choices.get(id.index()).copied().flatten()
    }

    pub fn set(&mut self, id: HotspotId, alternative: usize) {
        let idx = id.index();
        if idx >= self.choices.len() {
            self.choices.resize(idx + 1, None);
        }
        if let Some(slot) = self.choices.get_mut(idx) {
            *slot = Some(alternative);
        }
    }

    /// True when every hotspot of the template has a choice.
    #[must_use]
    pub fn is_total(&self, template: &Template) -> bool {
        template.preorder().iter().all(|&id| self.choice(id).is_some())
    }

    /// Assigned `(hotspot, alternative)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (HotspotId, usize)> + '_ {
        self.choices
            .iter()
            .enumerate()
            .filter_map(|(idx, choice)| choice.map(|c| (HotspotId::new(idx), c)))
    }
}

/// Odometer over the pre-order hotspot list.
#[derive(Debug, Clone)]
pub struct Alternatives {
    order: Vec<HotspotId>,
    radices: Vec<usize>,
    digits: Option<Vec<usize>>,
    slots: usize,
}

/// Starts a fresh enumeration over every hotspot of `template`.
///
/// A template without hotspots yields exactly one empty assignment.
#[must_use]
pub fn enumerate(template: &Template) -> Alternatives {
    let order = template.preorder();
    let radices: Vec<usize> = order
        .iter()
        .map(|&id| {
            template
                .hotspot(id)
                .map_or(0, |h| h.kind().alternative_count())
        })
        .collect();

    let digits = if radices.contains(&0) {
        None
    } else {
        Some(vec![0; order.len()])
    };

    Alternatives {
        order,
        radices,
        digits,
        slots: template.arena().len(),
    }
}

impl Alternatives {
    fn current(&self, digits: &[usize]) -> Assignment {
        let mut assignment = Assignment::new(self.slots);
        for (&id, &digit) in self.order.iter().zip(digits) {
            assignment.set(id, digit);
        }
        assignment
    }

    /// Advances the odometer; returns false once it wraps around.
    fn advance(digits: &mut [usize], radices: &[usize]) -> bool {
        for (digit, &radix) in digits.iter_mut().zip(radices).rev() {
            *digit += 1;
            if *digit < radix {
                return true;
            }
            *digit = 0;
        }
        false
    }
}

impl Iterator for Alternatives {
    type Item = Assignment;

    fn next(&mut self) -> Option<Assignment> {
        let digits = self.digits.take()?;
        let assignment = self.current(&digits);

        let mut next = digits;
        if Self::advance(&mut next, &self.radices) {
            self.digits = Some(next);
        }
        Some(assignment)
    }
}

impl std::iter::FusedIterator for Alternatives {}
