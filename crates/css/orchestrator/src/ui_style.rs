//! Per-widget cascade state: matched rules, resolved properties, transitions
//! and the interaction state they were resolved for.

use core::iter;
use std::collections::BTreeMap;
use std::rc::Rc;

use css::StyleSheetStyle;
use css_animations::{
    TRANSITION_PREFIX, TransitionDefinition, TransitionsMap, parse_transition_properties,
};
use css_cascade::{
    EMPTY_PROPERTY, Specificity, StyleSheetProperties, StyleSheetProperty, cascade_put_expanded,
    expand_shorthand,
};
use css_selectors::ElementAdapter;
use log::debug;

use crate::state::{StateFlag, StateFlags};
use crate::widget::{NodeAttribute, WidgetKey};

/// Transition entry used for properties without one of their own.
const ALL_PROPERTIES: &str = "all";

/// Cascade state of one widget.
///
/// Rules are split once per load: cacheable rules only depend on the widget
/// itself, non-cacheable ones also read the state of related widgets.
#[derive(Debug)]
pub struct UiStyle {
    widget: WidgetKey,
    /// Inline declarations set on the widget itself.
    element_style: StyleSheetStyle,
    cacheable_styles: Vec<Rc<StyleSheetStyle>>,
    non_cacheable_styles: Vec<Rc<StyleSheetStyle>>,
    /// Resolved winners keyed by lowercased property name.
    properties: BTreeMap<String, StyleSheetProperty>,
    transitions: TransitionsMap,
    state: StateFlags,
    current_state: StateFlag,
    previous_state: StateFlag,
    /// Set while a cascade pass for this widget is running.
    changing_state: bool,
}

impl UiStyle {
    pub fn new(widget: WidgetKey) -> Self {
        Self {
            widget,
            element_style: StyleSheetStyle::element(),
            cacheable_styles: Vec::new(),
            non_cacheable_styles: Vec::new(),
            properties: BTreeMap::new(),
            transitions: TransitionsMap::new(),
            state: StateFlags::NONE,
            current_state: StateFlag::Normal,
            previous_state: StateFlag::Normal,
            changing_state: false,
        }
    }

    #[inline]
    pub const fn widget(&self) -> WidgetKey {
        self.widget
    }

    #[inline]
    pub const fn element_style(&self) -> &StyleSheetStyle {
        &self.element_style
    }

    #[inline]
    pub fn cacheable_styles(&self) -> &[Rc<StyleSheetStyle>] {
        &self.cacheable_styles
    }

    #[inline]
    pub fn non_cacheable_styles(&self) -> &[Rc<StyleSheetStyle>] {
        &self.non_cacheable_styles
    }

    /// Resolved properties of the last cascade pass.
    #[inline]
    pub const fn properties(&self) -> &BTreeMap<String, StyleSheetProperty> {
        &self.properties
    }

    #[inline]
    pub const fn transitions(&self) -> &TransitionsMap {
        &self.transitions
    }

    #[inline]
    pub const fn state(&self) -> StateFlags {
        self.state
    }

    #[inline]
    pub const fn current_state(&self) -> StateFlag {
        self.current_state
    }

    #[inline]
    pub const fn previous_state(&self) -> StateFlag {
        self.previous_state
    }

    #[inline]
    pub const fn is_changing_state(&self) -> bool {
        self.changing_state
    }

    /// Add an inline declaration. `padding`/`margin` are stored as their four
    /// longhands, each keeping the declaration's specificity and importance.
    pub fn set_style_sheet_property(&mut self, property: &StyleSheetProperty) {
        for longhand in expand_shorthand(property) {
            self.element_style.set_property(longhand);
        }
    }

    pub fn set_style_sheet_properties(&mut self, properties: &StyleSheetProperties) {
        for property in properties {
            self.set_style_sheet_property(property);
        }
    }

    /// Add an inline declaration at inline specificity.
    pub fn set_inline_property(&mut self, name: &str, value: &str) {
        self.set_style_sheet_property(&StyleSheetProperty::new(
            name,
            value,
            Specificity::INLINE,
            false,
        ));
    }

    /// Resolved property, or the empty sentinel.
    pub fn style_sheet_property(&self, name: &str) -> &StyleSheetProperty {
        self.properties
            .get(&name.to_ascii_lowercase())
            .unwrap_or(&EMPTY_PROPERTY)
    }

    /// The value `name` has regardless of interaction state.
    ///
    /// Only the inline style and cacheable rules whose subject carries no
    /// interaction pseudo-class are searched, in that order. The first
    /// declaration found is returned as is.
    pub fn stateless_style_sheet_property(&self, name: &str) -> StyleSheetProperty {
        iter::once(&self.element_style)
            .chain(
                self.cacheable_styles
                    .iter()
                    .map(|style| &**style)
                    .filter(|style| {
                        style.is_media_valid() && !style.selector().has_pseudo_classes()
                    }),
            )
            .map(|style| style.get_property_by_name(name))
            .find(|property| !property.is_empty())
            .unwrap_or_else(|| EMPTY_PROPERTY.clone())
    }

    /// Resolved property as a widget attribute; empty when unresolved.
    pub fn node_attribute(&self, name: &str) -> NodeAttribute {
        let property = self.style_sheet_property(name);
        if property.is_empty() {
            return NodeAttribute::default();
        }
        to_attribute(property)
    }

    pub fn has_transition(&self, name: &str) -> bool {
        self.transitions.contains_key(name) || self.transitions.contains_key(ALL_PROPERTIES)
    }

    /// Transition for `name`, falling back to the `all` entry, then to an
    /// empty definition.
    pub fn transition(&self, name: &str) -> TransitionDefinition {
        self.transitions
            .get(name)
            .or_else(|| self.transitions.get(ALL_PROPERTIES))
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the matched rule lists and forget the resolved properties.
    pub(crate) fn set_rules(
        &mut self,
        cacheable: Vec<Rc<StyleSheetStyle>>,
        non_cacheable: Vec<Rc<StyleSheetStyle>>,
    ) {
        self.cacheable_styles = cacheable;
        self.non_cacheable_styles = non_cacheable;
        self.properties.clear();
        self.transitions.clear();
    }

    pub(crate) const fn set_changing_state(&mut self, changing: bool) {
        self.changing_state = changing;
    }

    /// Record the widget's bitmask and pick the current state from it.
    /// Returns whether a cascade pass is needed.
    pub(crate) fn update_state(
        &mut self,
        flags: StateFlags,
        exists: impl FnMut(StateFlag) -> bool,
    ) -> bool {
        let bits_changed = flags != self.state;
        self.state = flags;
        let next = flags.dominant(exists);
        if next == self.current_state {
            return bits_changed;
        }
        debug!(
            target: "css_orchestrator",
            "{:?}: {} -> {}",
            self.widget,
            self.current_state.name(),
            next.name()
        );
        self.previous_state = self.current_state;
        self.current_state = next;
        true
    }

    /// Cascade the inline style, then cacheable rules, then non-cacheable
    /// rules that currently match, and derive transitions from the result.
    pub(crate) fn resolve<A: ElementAdapter<Handle = WidgetKey>>(&mut self, adapter: &A) {
        self.properties.clear();
        for property in self.element_style.properties() {
            cascade_put_expanded(&mut self.properties, property);
        }
        for style in self.cacheable_styles.iter().chain(&self.non_cacheable_styles) {
            if !style.matches(adapter, self.widget, true) {
                continue;
            }
            for property in style.properties() {
                cascade_put_expanded(&mut self.properties, property);
            }
        }
        self.transitions = parse_transition_properties(
            self.properties
                .values()
                .filter(|property| property.name().starts_with(TRANSITION_PREFIX)),
        );
    }

    /// Resolved properties to push to the widget; transition settings stay here.
    pub(crate) fn attributes(&self) -> impl Iterator<Item = NodeAttribute> + '_ {
        self.properties
            .values()
            .filter(|property| !property.name().starts_with(TRANSITION_PREFIX))
            .map(to_attribute)
    }
}

fn to_attribute(property: &StyleSheetProperty) -> NodeAttribute {
    NodeAttribute {
        name: property.name().to_owned(),
        value: property.value().to_owned(),
        volatile: property.is_volatile(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;

    fn style_with(declarations: &[(&str, &str, Specificity, bool)]) -> UiStyle {
        let mut style = UiStyle::new(WidgetKey(7));
        for (name, value, specificity, important) in declarations {
            style.set_style_sheet_property(&StyleSheetProperty::new(
                *name,
                *value,
                *specificity,
                *important,
            ));
        }
        style
    }

    #[test]
    fn inline_shorthand_is_stored_as_longhands() {
        let style = style_with(&[("margin", "1dp 2dp", Specificity::INLINE, false)]);
        let names: Vec<&str> = style
            .element_style()
            .properties()
            .iter()
            .map(StyleSheetProperty::name)
            .collect();
        assert_eq!(names, vec!["margin-top", "margin-right", "margin-bottom", "margin-left"]);
    }

    #[test]
    fn state_changes_remember_the_previous_state() {
        let mut style = UiStyle::new(WidgetKey(1));
        let hovered = StateFlags::NONE.with(StateFlag::Normal).with(StateFlag::Hover);
        assert!(style.update_state(hovered, |_| true));
        assert_eq!(style.current_state(), StateFlag::Hover);
        assert_eq!(style.previous_state(), StateFlag::Normal);
        assert!(!style.update_state(hovered, |_| true));
        assert!(style.update_state(hovered.with(StateFlag::Focus), |_| true));
        assert_eq!(style.current_state(), StateFlag::Hover);
    }

    #[test]
    fn missing_states_are_skipped() {
        let mut style = UiStyle::new(WidgetKey(1));
        let pressed = StateFlags::NONE.with(StateFlag::Focus).with(StateFlag::Pressed);
        style.update_state(pressed, |flag| flag != StateFlag::Pressed);
        assert_eq!(style.current_state(), StateFlag::Focus);
    }

    #[test]
    fn transition_falls_back_to_all() {
        let mut style = UiStyle::new(WidgetKey(1));
        style.transitions = parse_transition_properties(&[StyleSheetProperty::new(
            "transition",
            "all 200ms linear, color 1s",
            Specificity::default(),
            false,
        )]);
        assert!(style.has_transition("opacity"));
        assert_eq!(
            style.transition("opacity").duration,
            Duration::from_millis(200)
        );
        assert_eq!(style.transition("color").duration, Duration::from_secs(1));
        assert_eq!(
            UiStyle::new(WidgetKey(2)).transition("color"),
            TransitionDefinition::default()
        );
    }
}
