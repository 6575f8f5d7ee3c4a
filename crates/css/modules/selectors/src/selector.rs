//! A parsed complex selector bundled with the data a cascade needs about it.

use core::fmt;

use crate::{
    Combinator, ComplexSelector, CompoundSelector, ElementAdapter, SimpleSelector, Specificity,
    matches_complex, parse_complex_selector, related_elements, specificity_of_complex,
};

/// One complex selector with its memoized specificity and cacheability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    /// The selector structure.
    complex: ComplexSelector,
    /// Specificity, computed once on construction.
    specificity: Specificity,
    /// True iff no compound other than the subject depends on interaction state.
    cacheable: bool,
}

impl Selector {
    /// Wrap a parsed complex selector.
    pub fn new(complex: ComplexSelector) -> Self {
        let specificity = specificity_of_complex(&complex);
        let cacheable = (0..complex.subject_index()).all(|index| {
            complex
                .compound(index)
                .is_none_or(|compound| !compound.has_interaction_pseudo_classes())
        });
        Self {
            complex,
            specificity,
            cacheable,
        }
    }

    /// Parse a single complex selector; `None` if the text is not a valid selector.
    pub fn parse(text: &str) -> Option<Self> {
        let complex = parse_complex_selector(text);
        if complex.is_empty() {
            return None;
        }
        Some(Self::new(complex))
    }

    /// The selector `*`, matching every element. Used for element-level style.
    pub fn universal() -> Self {
        Self::new(ComplexSelector {
            first: CompoundSelector {
                simples: vec![SimpleSelector::Universal],
            },
            rest: Vec::new(),
        })
    }

    /// The underlying selector structure.
    #[inline]
    pub const fn complex(&self) -> &ComplexSelector {
        &self.complex
    }

    /// Specificity triple of this selector.
    #[inline]
    pub const fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// True if matching never depends on another element's interaction state.
    #[inline]
    pub const fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    /// True if the subject compound carries an interaction pseudo-class.
    #[inline]
    pub fn has_pseudo_classes(&self) -> bool {
        self.complex.subject().has_interaction_pseudo_classes()
    }

    /// Whether the selector matches `element`.
    #[inline]
    pub fn matches<A: ElementAdapter>(
        &self,
        adapter: &A,
        element: A::Handle,
        apply_pseudo: bool,
    ) -> bool {
        matches_complex(adapter, element, &self.complex, apply_pseudo)
    }

    /// Other elements whose state can flip this selector for `element`.
    #[inline]
    pub fn related_elements<A: ElementAdapter>(
        &self,
        adapter: &A,
        element: A::Handle,
        include_self: bool,
    ) -> Vec<A::Handle> {
        related_elements(adapter, element, &self.complex, include_self)
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => formatter.write_str(name),
            Self::Class(name) => write!(formatter, ".{name}"),
            Self::IdSelector(name) => write!(formatter, "#{name}"),
            Self::AttrEquals { name, value } => write!(formatter, "[{name}=\"{value}\"]"),
            Self::AttrExists(name) => write!(formatter, "[{name}]"),
            Self::PseudoClass(pseudo) => write!(formatter, ":{}", pseudo.name()),
            Self::Universal => formatter.write_str("*"),
        }
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for simple in &self.simples {
            write!(formatter, "{simple}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.first)?;
        for (combinator, compound) in &self.rest {
            let glue = match combinator {
                Combinator::Descendant => " ",
                Combinator::Child => " > ",
                Combinator::AdjacentSibling => " + ",
                Combinator::GeneralSibling => " ~ ",
            };
            write!(formatter, "{glue}{compound}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.complex)
    }
}
