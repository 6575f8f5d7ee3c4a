//! CSS selector matching engine.
//! Spec: <https://www.w3.org/TR/selectors-3/>

use crate::{
    Combinator, ComplexSelector, CompoundSelector, ElementAdapter, PseudoClass, SimpleSelector,
};

/// Match a complex selector against an element.
///
/// When `apply_pseudo` is false, interaction pseudo-classes are treated as
/// satisfied, answering "could this selector ever match this element".
/// Spec: Section 3, 11 - Right-to-left matching strategy
pub fn matches_complex<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    sel: &ComplexSelector,
    apply_pseudo: bool,
) -> bool {
    if sel.is_empty() {
        return false;
    }
    match_from(adapter, sel, sel.subject_index(), element, apply_pseudo)
}

/// Match compound `index` against `element`, then relate the compounds to its left.
/// Backtracks over every candidate a descendant/general-sibling combinator offers.
fn match_from<A: ElementAdapter>(
    adapter: &A,
    sel: &ComplexSelector,
    index: usize,
    element: A::Handle,
    apply_pseudo: bool,
) -> bool {
    let Some(compound) = sel.compound(index) else {
        return false;
    };
    if !matches_compound(adapter, element, compound, apply_pseudo) {
        return false;
    }
    let Some(left_index) = index.checked_sub(1) else {
        return true;
    };
    let Some(&(combinator, _)) = sel.rest.get(left_index) else {
        return false;
    };
    Candidates::new(adapter, combinator, element)
        .any(|candidate| match_from(adapter, sel, left_index, candidate, apply_pseudo))
}

/// Match a compound selector against a single element.
/// Spec: Section 5–8
pub fn matches_compound<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    compound: &CompoundSelector,
    apply_pseudo: bool,
) -> bool {
    compound
        .simples
        .iter()
        .all(|simple| matches_simple(adapter, element, simple, apply_pseudo))
}

/// Match one simple selector against a single element.
fn matches_simple<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    simple: &SimpleSelector,
    apply_pseudo: bool,
) -> bool {
    match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(type_name) => {
            type_name.is_empty() || adapter.tag_name(element).eq_ignore_ascii_case(type_name)
        }
        SimpleSelector::Class(class_name) => adapter.has_class(element, class_name),
        SimpleSelector::IdSelector(id_value) => adapter
            .element_id(element)
            .is_some_and(|value| value == id_value.as_str()),
        SimpleSelector::AttrEquals { name, value } => adapter
            .attr(element, name)
            .is_some_and(|attr_value| attr_value == value.as_str()),
        SimpleSelector::AttrExists(name) => adapter.attr(element, name).is_some(),
        SimpleSelector::PseudoClass(pseudo) => {
            matches_pseudo_class(adapter, element, pseudo, apply_pseudo)
        }
    }
}

/// Structural pseudo-classes are always evaluated; interaction ones only when
/// `apply_pseudo` is set.
fn matches_pseudo_class<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    pseudo: &PseudoClass,
    apply_pseudo: bool,
) -> bool {
    match pseudo {
        PseudoClass::FirstChild => adapter.previous_sibling_element(element).is_none(),
        PseudoClass::LastChild => adapter.next_sibling_element(element).is_none(),
        PseudoClass::OnlyChild => {
            adapter.previous_sibling_element(element).is_none()
                && adapter.next_sibling_element(element).is_none()
        }
        _ => !apply_pseudo || adapter.matches_pseudo_class(element, pseudo),
    }
}

/// Elements a combinator relates to `element`, nearest first.
/// Spec: Section 11 - Combinators
pub(crate) struct Candidates<'adapter, A: ElementAdapter> {
    /// Tree access.
    adapter: &'adapter A,
    /// The combinator being walked.
    combinator: Combinator,
    /// Next element to yield.
    next: Option<A::Handle>,
}

impl<'adapter, A: ElementAdapter> Candidates<'adapter, A> {
    /// Start walking from `element` (which itself is never yielded).
    pub(crate) fn new(adapter: &'adapter A, combinator: Combinator, element: A::Handle) -> Self {
        let next = match combinator {
            Combinator::Descendant | Combinator::Child => adapter.parent(element),
            Combinator::AdjacentSibling | Combinator::GeneralSibling => {
                adapter.previous_sibling_element(element)
            }
        };
        Self {
            adapter,
            combinator,
            next,
        }
    }
}

impl<A: ElementAdapter> Iterator for Candidates<'_, A> {
    type Item = A::Handle;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = match self.combinator {
            Combinator::Descendant => self.adapter.parent(current),
            Combinator::GeneralSibling => self.adapter.previous_sibling_element(current),
            Combinator::Child | Combinator::AdjacentSibling => None,
        };
        Some(current)
    }
}
