//! Selectors - element matching, specificity and relational dependencies.
//! Spec: <https://www.w3.org/TR/selectors-3/>
//!
//! This module implements the subset a widget style cascade needs:
//! - Type, universal, class, id and attribute (`[a]`, `[a=b]`) selectors
//! - Interaction pseudo-classes (`:hover`, `:focus`, `:checked`, ...) and
//!   structural ones (`:first-child`, `:last-child`, `:only-child`)
//! - Combinators: descendant, child, adjacent sibling, general sibling
//! - Specificity calculation
//! - Discovery of the *other* elements whose state can flip a match

mod matcher;
mod parser;
mod related;
mod selector;
mod specificity;

use core::fmt::Debug;
use core::hash::Hash;

// Re-export public API
pub use matcher::{matches_complex, matches_compound};
pub use parser::{parse_complex_selector, parse_selector_list};
pub use related::related_elements;
pub use selector::Selector;
pub use specificity::{Specificity, specificity_of_complex, specificity_of_compound};

/// An adapter that abstracts tree access for selector matching.
/// Implement this for your widget/DOM layer.
///
/// Spec references:
/// - Section 3: Selectors overview and element matching
pub trait ElementAdapter {
    /// Stable handle identifying one element of the tree.
    type Handle: Copy + Eq + Hash + Debug;

    /// Parent element if any.
    /// Spec: Section 11 - Combinators (for tree relationships)
    fn parent(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Previous sibling element (skip non-elements if your tree has mixed nodes).
    /// Spec: Section 11 - Sibling combinators
    fn previous_sibling_element(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Next sibling element, used by `:last-child` / `:only-child`.
    fn next_sibling_element(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Tag name in ASCII lowercase.
    /// Spec: Section 5 - Type selectors
    fn tag_name(&self, element: Self::Handle) -> &str;

    /// Returns Some(id) if the element has an id, else None.
    /// Spec: Section 7 - ID selectors
    fn element_id(&self, element: Self::Handle) -> Option<&str>;

    /// True if the element has the given class token.
    /// Spec: Section 6 - Class selectors
    fn has_class(&self, element: Self::Handle, class: &str) -> bool;

    /// Returns the attribute value if present.
    /// Spec: Section 8 - Attribute selectors
    fn attr(&self, element: Self::Handle, name: &str) -> Option<&str>;

    /// True if the interaction pseudo-class currently applies to the element.
    /// Only asked for pseudo-classes where [`PseudoClass::is_structural`] is false.
    fn matches_pseudo_class(&self, element: Self::Handle, pseudo: &PseudoClass) -> bool;
}

/// Pseudo-classes understood by the matcher.
/// Spec: Section 6.6 - Pseudo-classes
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PseudoClass {
    /// `:hover`
    Hover,
    /// `:focus`
    Focus,
    /// `:active` (also accepted as `:pressed`)
    Active,
    /// `:checked` (also accepted as `:selected`)
    Checked,
    /// `:disabled`
    Disabled,
    /// `:enabled`
    Enabled,
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:only-child`
    OnlyChild,
    /// Any other pseudo-class; answered by the adapter.
    Custom(String),
}

impl PseudoClass {
    /// Map a lowercased pseudo-class name to its variant.
    pub fn from_name(name: &str) -> Self {
        match name {
            "hover" => Self::Hover,
            "focus" => Self::Focus,
            "active" | "pressed" => Self::Active,
            "checked" | "selected" => Self::Checked,
            "disabled" => Self::Disabled,
            "enabled" => Self::Enabled,
            "first-child" => Self::FirstChild,
            "last-child" => Self::LastChild,
            "only-child" => Self::OnlyChild,
            other => Self::Custom(other.to_owned()),
        }
    }

    /// Canonical name, without the leading colon.
    pub fn name(&self) -> &str {
        match self {
            Self::Hover => "hover",
            Self::Focus => "focus",
            Self::Active => "active",
            Self::Checked => "checked",
            Self::Disabled => "disabled",
            Self::Enabled => "enabled",
            Self::FirstChild => "first-child",
            Self::LastChild => "last-child",
            Self::OnlyChild => "only-child",
            Self::Custom(name) => name.as_str(),
        }
    }

    /// Structural pseudo-classes depend on tree position only, never on
    /// transient interaction state.
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::FirstChild | Self::LastChild | Self::OnlyChild)
    }
}

/// Simple selectors (subset).
/// Spec: Section 5, 6, 7, 8
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimpleSelector {
    /// Spec: Section 5 - Type selectors
    Type(String),
    /// Spec: Section 6 - Class selectors
    Class(String),
    /// Spec: Section 7 - ID selectors
    IdSelector(String),
    /// Spec: Section 8 - Attribute selectors [attr=value]
    AttrEquals { name: String, value: String },
    /// Spec: Section 8 - Attribute presence [attr]
    AttrExists(String),
    /// Spec: Section 6.6 - Pseudo-classes
    PseudoClass(PseudoClass),
    /// Universal selector '*'. Matches every element.
    /// Spec: Section 5 - Universal selector
    Universal,
}

/// A compound selector is a sequence of simple selectors (no combinators).
/// Spec: Section 5 - Simple selector sequences
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

impl CompoundSelector {
    /// True if any interaction (non-structural) pseudo-class is part of this compound.
    pub fn has_interaction_pseudo_classes(&self) -> bool {
        self.simples.iter().any(|simple| {
            matches!(simple, SimpleSelector::PseudoClass(pseudo) if !pseudo.is_structural())
        })
    }
}

/// Combinators between compounds.
/// Spec: Section 11 - Combinators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

/// A complex selector is one or more compounds separated by combinators.
/// `first` is the left-most compound; the last entry of `rest` is the subject.
/// Spec: Section 3, 11
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ComplexSelector {
    pub first: CompoundSelector,
    pub rest: Vec<(Combinator, CompoundSelector)>,
}

impl ComplexSelector {
    /// Compound at `index`, counting `first` as 0.
    pub fn compound(&self, index: usize) -> Option<&CompoundSelector> {
        match index.checked_sub(1) {
            None => Some(&self.first),
            Some(rest_index) => self.rest.get(rest_index).map(|pair| &pair.1),
        }
    }

    /// Index of the subject (right-most) compound.
    pub fn subject_index(&self) -> usize {
        self.rest.len()
    }

    /// The subject (right-most) compound.
    pub fn subject(&self) -> &CompoundSelector {
        self.rest.last().map_or(&self.first, |pair| &pair.1)
    }

    /// True when no simple selector was parsed at all.
    pub fn is_empty(&self) -> bool {
        self.first.simples.is_empty() && self.rest.is_empty()
    }
}

/// A selector list separated by commas.
/// Spec: Section 4 - Groups of selectors
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}
