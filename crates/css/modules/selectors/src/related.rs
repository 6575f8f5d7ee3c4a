//! Relational dependencies of a selector: which other elements' interaction
//! state can flip whether a selector matches a given subject.

use std::collections::HashMap;

use crate::matcher::{Candidates, matches_compound};
use crate::{ComplexSelector, ElementAdapter};

/// Collect every element other than `element` whose interaction state can
/// change whether `sel` matches `element`.
///
/// Walks the selector right-to-left ignoring interaction pseudo-classes and
/// records each element bound to a non-subject compound that carries one.
/// When `include_self` is set, the subject itself is reported as well if its
/// own compound carries an interaction pseudo-class. The result is empty for
/// selectors that only inspect the subject's own state.
pub fn related_elements<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    sel: &ComplexSelector,
    include_self: bool,
) -> Vec<A::Handle> {
    let mut out: Vec<A::Handle> = Vec::new();
    if sel.is_empty() {
        return out;
    }
    let mut visited = HashMap::new();
    let matched = collect_from(
        adapter,
        sel,
        sel.subject_index(),
        element,
        &mut visited,
        &mut out,
    );
    if !matched {
        out.clear();
        return out;
    }
    if include_self && sel.subject().has_interaction_pseudo_classes() {
        out.insert(0, element);
    }
    let mut deduped: Vec<A::Handle> = Vec::with_capacity(out.len());
    for handle in out {
        if !deduped.contains(&handle) {
            deduped.push(handle);
        }
    }
    deduped
}

/// Structural match of compound `index` and everything to its left, pushing
/// state-dependent bindings into `out`. Explores every candidate path.
///
/// `visited` caches the outcome per `(compound, element)`; a binding that
/// succeeded once has already pushed everything to its left.
fn collect_from<A: ElementAdapter>(
    adapter: &A,
    sel: &ComplexSelector,
    index: usize,
    element: A::Handle,
    visited: &mut HashMap<(usize, A::Handle), bool>,
    out: &mut Vec<A::Handle>,
) -> bool {
    if let Some(&matched) = visited.get(&(index, element)) {
        return matched;
    }
    let matched = collect_uncached(adapter, sel, index, element, visited, out);
    visited.insert((index, element), matched);
    matched
}

fn collect_uncached<A: ElementAdapter>(
    adapter: &A,
    sel: &ComplexSelector,
    index: usize,
    element: A::Handle,
    visited: &mut HashMap<(usize, A::Handle), bool>,
    out: &mut Vec<A::Handle>,
) -> bool {
    let Some(compound) = sel.compound(index) else {
        return false;
    };
    if !matches_compound(adapter, element, compound, false) {
        return false;
    }
    let Some(left_index) = index.checked_sub(1) else {
        return true;
    };
    let Some(&(combinator, _)) = sel.rest.get(left_index) else {
        return false;
    };
    let tracks_state = sel
        .compound(left_index)
        .is_some_and(|left| left.has_interaction_pseudo_classes());
    let mut any = false;
    for candidate in Candidates::new(adapter, combinator, element) {
        let mark = out.len();
        if collect_from(adapter, sel, left_index, candidate, visited, out) {
            any = true;
            if tracks_state {
                out.insert(mark, candidate);
            }
        }
    }
    any
}
