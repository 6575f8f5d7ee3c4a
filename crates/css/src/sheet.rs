//! The ordered rule container a scene hands to its widgets.

use core::fmt;
use std::rc::Rc;

use css_animations::{EMPTY_KEYFRAMES, KeyframesDefinition, KeyframesDefinitionMap};
use css_media_queries::{MediaFeatures, MediaQueryList};
use css_selectors::ElementAdapter;
use log::{debug, warn};

use crate::style::{AtRuleType, StyleSheetStyle};

/// Keyframes name that never gets registered.
const RESERVED_KEYFRAMES_NAME: &str = "none";

/// Rules in source order, the media query lists they reference and the
/// keyframes they declare.
#[derive(Clone, Debug, Default)]
pub struct StyleSheet {
    /// Rules in insertion order; this order breaks specificity ties.
    styles: Vec<Rc<StyleSheetStyle>>,
    /// Distinct media lists, deduplicated by identity.
    media_query_lists: Vec<Rc<MediaQueryList>>,
    keyframes: KeyframesDefinitionMap,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule and register its media list.
    pub fn add_style(&mut self, style: impl Into<Rc<StyleSheetStyle>>) {
        let style = style.into();
        if let Some(list) = style.media_query_list() {
            self.add_media_query_list(list);
        }
        self.styles.push(style);
    }

    fn add_media_query_list(&mut self, list: &Rc<MediaQueryList>) {
        if !self
            .media_query_lists
            .iter()
            .any(|known| Rc::ptr_eq(known, list))
        {
            self.media_query_lists.push(Rc::clone(list));
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    #[inline]
    pub fn styles(&self) -> &[Rc<StyleSheetStyle>] {
        &self.styles
    }

    /// Append every rule of `other` (keeping its order) and merge its keyframes.
    pub fn combine_style_sheet(&mut self, other: &Self) {
        for style in &other.styles {
            self.add_style(Rc::clone(style));
        }
        self.add_keyframes_map(&other.keyframes);
    }

    /// Rules that match `element`, in source order.
    ///
    /// With `apply_pseudo` false, interaction pseudo-classes count as
    /// satisfied, giving every rule that could apply in some state.
    pub fn get_element_styles<A: ElementAdapter>(
        &self,
        adapter: &A,
        element: A::Handle,
        apply_pseudo: bool,
    ) -> Vec<Rc<StyleSheetStyle>> {
        self.styles
            .iter()
            .filter(|style| style.at_rule_type() != AtRuleType::Keyframes)
            .filter(|style| style.matches(adapter, element, apply_pseudo))
            .map(Rc::clone)
            .collect()
    }

    /// Re-evaluate every media list; true if any of them flipped.
    pub fn update_media_lists(&self, features: &MediaFeatures) -> bool {
        let mut changed = false;
        for list in &self.media_query_lists {
            changed |= list.apply_media_features(features);
        }
        if changed {
            debug!(target: "css", "media lists changed for {features:?}");
        }
        changed
    }

    #[inline]
    pub fn is_media_query_list_empty(&self) -> bool {
        self.media_query_lists.is_empty()
    }

    #[inline]
    pub fn media_query_lists(&self) -> &[Rc<MediaQueryList>] {
        &self.media_query_lists
    }

    /// Rules declared in one kind of block.
    pub fn styles_by_at_rule(&self, at_rule_type: AtRuleType) -> Vec<Rc<StyleSheetStyle>> {
        self.styles
            .iter()
            .filter(|style| style.at_rule_type() == at_rule_type)
            .map(Rc::clone)
            .collect()
    }

    pub fn is_keyframes_defined(&self, name: &str) -> bool {
        self.keyframes.contains_key(name)
    }

    /// The named keyframes, or an empty definition when unknown.
    pub fn keyframes_definition(&self, name: &str) -> &KeyframesDefinition {
        self.keyframes.get(name).unwrap_or(&EMPTY_KEYFRAMES)
    }

    /// Register a keyframes definition; one named `none` is dropped.
    pub fn add_keyframes(&mut self, definition: KeyframesDefinition) {
        if definition.name.eq_ignore_ascii_case(RESERVED_KEYFRAMES_NAME) {
            warn!(target: "css", "ignoring @keyframes named `{}`", definition.name);
            return;
        }
        self.keyframes.insert(definition.name.clone(), definition);
    }

    pub fn add_keyframes_map(&mut self, keyframes: &KeyframesDefinitionMap) {
        for definition in keyframes.values() {
            self.add_keyframes(definition.clone());
        }
    }

    #[inline]
    pub const fn keyframes(&self) -> &KeyframesDefinitionMap {
        &self.keyframes
    }
}

impl fmt::Display for StyleSheet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for style in &self.styles {
            match style.media_query_list() {
                Some(list) => write!(formatter, "@media {list} {{\n{style}}}\n")?,
                None => write!(formatter, "{style}")?,
            }
        }
        Ok(())
    }
}
