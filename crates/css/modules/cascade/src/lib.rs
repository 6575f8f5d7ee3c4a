//! CSS Cascading and Inheritance Level 4 - declarations and their precedence.
//! Spec: <https://www.w3.org/TR/css-cascade-4/>
//!
//! A [`StyleSheetProperty`] is one declaration carrying the specificity of the
//! rule that produced it. [`StyleSheetProperties`] is the ordered set a rule
//! owns. [`cascade_put`] merges declarations into a resolved map using the
//! override flag first and specificity second, with ties going to the later
//! declaration.

#![forbid(unsafe_code)]

mod shorthand;

use core::slice;
use std::collections::BTreeMap;

pub use css_selectors::Specificity;
pub use shorthand::{Edge, expand_shorthand, is_edge_shorthand, longhand_edge, split_values};

/// One declaration: a property name, its authored value and cascade metadata.
/// Spec: Section 6 - Declarations and cascading
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct StyleSheetProperty {
    /// Property name in ASCII lowercase.
    name: String,
    /// Authored value with `!important` already stripped.
    value: String,
    /// Specificity of the selector that produced this declaration.
    specificity: Specificity,
    /// Spec: Section 6.4 - Importance
    important: bool,
    /// Excluded from caching across resolutions.
    volatile: bool,
}

/// Sentinel returned by lookups that found nothing.
pub static EMPTY_PROPERTY: StyleSheetProperty = StyleSheetProperty::empty();

impl StyleSheetProperty {
    /// Build a declaration. The name is normalised to lowercase.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        specificity: Specificity,
        important: bool,
    ) -> Self {
        let mut name = name.into();
        name.make_ascii_lowercase();
        Self {
            name,
            value: value.into(),
            specificity,
            important,
            volatile: false,
        }
    }

    /// The empty sentinel.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            name: String::new(),
            value: String::new(),
            specificity: Specificity(0, 0, 0),
            important: false,
            volatile: false,
        }
    }

    /// Mark this declaration volatile.
    #[inline]
    #[must_use]
    pub const fn with_volatile(mut self, volatile: bool) -> Self {
        self.volatile = volatile;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    pub const fn specificity(&self) -> Specificity {
        self.specificity
    }

    #[inline]
    pub const fn is_important(&self) -> bool {
        self.important
    }

    #[inline]
    pub const fn is_volatile(&self) -> bool {
        self.volatile
    }

    /// True for the not-found sentinel (no name).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// Replace the specificity, e.g. when a rule stamps its selector's weight.
    #[inline]
    pub const fn set_specificity(&mut self, specificity: Specificity) {
        self.specificity = specificity;
    }

    /// Replace the value, keeping the cascade metadata.
    #[inline]
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Return true if `self` may overwrite `incumbent` in a resolved map.
    ///
    /// Importance decides first; at equal importance the candidate wins when
    /// its specificity is greater than or equal to the incumbent's, so ties go
    /// to whichever declaration is merged later.
    /// Spec: Section 6 - Cascade sorting order
    pub fn wins_over(&self, incumbent: &Self) -> bool {
        if self.important != incumbent.important {
            return self.important;
        }
        self.specificity >= incumbent.specificity
    }
}

/// Insert `candidate` into `props` if the slot is free or the candidate wins.
/// Returns whether the map changed.
pub fn cascade_put(
    props: &mut BTreeMap<String, StyleSheetProperty>,
    candidate: StyleSheetProperty,
) -> bool {
    let should_insert = props
        .get(candidate.name())
        .is_none_or(|incumbent| candidate.wins_over(incumbent));
    if should_insert {
        props.insert(candidate.name.clone(), candidate);
    }
    should_insert
}

/// Merge `candidate` into `props` after expanding `padding`/`margin`
/// shorthands into their four longhands.
pub fn cascade_put_expanded(
    props: &mut BTreeMap<String, StyleSheetProperty>,
    candidate: &StyleSheetProperty,
) {
    for longhand in expand_shorthand(candidate) {
        cascade_put(props, longhand);
    }
}

/// Declarations of one rule, unique by name, in declaration order.
///
/// Re-declaring a name moves it to the end, so iteration order always
/// matches the order in which the surviving values were written.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct StyleSheetProperties {
    entries: Vec<StyleSheetProperty>,
}

impl StyleSheetProperties {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add or replace a declaration (last write wins).
    pub fn set(&mut self, property: StyleSheetProperty) {
        self.remove(property.name());
        self.entries.push(property);
    }

    /// Remove a declaration by name, returning it.
    pub fn remove(&mut self, name: &str) -> Option<StyleSheetProperty> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.name().eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(position))
    }

    /// Look a declaration up by (case-insensitive) name.
    pub fn get(&self, name: &str) -> Option<&StyleSheetProperty> {
        self.entries
            .iter()
            .find(|entry| entry.name().eq_ignore_ascii_case(name))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, StyleSheetProperty> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stamp every declaration with `specificity`.
    pub fn set_specificity(&mut self, specificity: Specificity) {
        for entry in &mut self.entries {
            entry.set_specificity(specificity);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'props> IntoIterator for &'props StyleSheetProperties {
    type Item = &'props StyleSheetProperty;
    type IntoIter = slice::Iter<'props, StyleSheetProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<StyleSheetProperty> for StyleSheetProperties {
    fn from_iter<I: IntoIterator<Item = StyleSheetProperty>>(iter: I) -> Self {
        let mut props = Self::new();
        for property in iter {
            props.set(property);
        }
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(
        name: &str,
        value: &str,
        specificity: Specificity,
        important: bool,
    ) -> StyleSheetProperty {
        StyleSheetProperty::new(name, value, specificity, important)
    }

    #[test]
    fn higher_specificity_wins_regardless_of_order() {
        let mut map = BTreeMap::new();
        cascade_put(&mut map, prop("color", "blue", Specificity(1, 1, 0), false));
        cascade_put(&mut map, prop("color", "red", Specificity(0, 1, 0), false));
        assert_eq!(map.get("color").map(StyleSheetProperty::value), Some("blue"));
    }

    #[test]
    fn equal_specificity_later_wins() {
        let mut map = BTreeMap::new();
        cascade_put(&mut map, prop("color", "red", Specificity(0, 1, 0), false));
        cascade_put(&mut map, prop("color", "green", Specificity(0, 1, 0), false));
        assert_eq!(map.get("color").map(StyleSheetProperty::value), Some("green"));
    }

    #[test]
    fn important_beats_specificity() {
        let mut map = BTreeMap::new();
        cascade_put(&mut map, prop("color", "red", Specificity(0, 0, 1), true));
        let replaced = cascade_put(&mut map, prop("color", "blue", Specificity(1, 0, 0), false));
        assert!(!replaced);
        assert_eq!(map.get("color").map(StyleSheetProperty::value), Some("red"));
        cascade_put(&mut map, prop("color", "teal", Specificity(0, 0, 0), true));
        assert_eq!(map.get("color").map(StyleSheetProperty::value), Some("teal"));
    }

    #[test]
    fn properties_are_unique_and_last_write_moves_to_end() {
        let mut props = StyleSheetProperties::new();
        props.set(prop("padding", "1px", Specificity::default(), false));
        props.set(prop("Padding-Top", "2px", Specificity::default(), false));
        props.set(prop("padding", "3px", Specificity::default(), false));
        let names: Vec<&str> = props.iter().map(StyleSheetProperty::name).collect();
        assert_eq!(names, vec!["padding-top", "padding"]);
        assert_eq!(props.get("PADDING").map(StyleSheetProperty::value), Some("3px"));
    }

    #[test]
    fn empty_sentinel() {
        assert!(EMPTY_PROPERTY.is_empty());
        assert!(!prop("color", "red", Specificity::default(), false).is_empty());
    }
}
