//! One style rule: a selector, its declarations and the at-rule it came from.

use core::fmt;
use std::rc::Rc;

use css_cascade::{
    EMPTY_PROPERTY, StyleSheetProperties, StyleSheetProperty, expand_shorthand, longhand_edge,
};
use css_media_queries::MediaQueryList;
use css_selectors::{ElementAdapter, Selector};

/// Which kind of block a rule was declared in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AtRuleType {
    /// A plain top-level style rule.
    #[default]
    Style,
    /// A rule inside `@media`.
    Media,
    /// A keyframe block inside `@keyframes`.
    Keyframes,
}

/// A selector with its declarations.
///
/// Property names are unique within a rule; the at-rule type and media list
/// are fixed at construction.
#[derive(Clone, Debug)]
pub struct StyleSheetStyle {
    selector: Selector,
    properties: StyleSheetProperties,
    at_rule_type: AtRuleType,
    media_query_list: Option<Rc<MediaQueryList>>,
}

impl StyleSheetStyle {
    /// Build a rule. Every declaration is stamped with the selector's specificity.
    pub fn new(
        selector: Selector,
        mut properties: StyleSheetProperties,
        at_rule_type: AtRuleType,
        media_query_list: Option<Rc<MediaQueryList>>,
    ) -> Self {
        properties.set_specificity(selector.specificity());
        Self {
            selector,
            properties,
            at_rule_type,
            media_query_list,
        }
    }

    /// An element-level style: universal selector, no declarations yet.
    /// Declarations added later keep their own specificity.
    pub fn element() -> Self {
        Self {
            selector: Selector::universal(),
            properties: StyleSheetProperties::new(),
            at_rule_type: AtRuleType::Style,
            media_query_list: None,
        }
    }

    #[inline]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    #[inline]
    pub const fn properties(&self) -> &StyleSheetProperties {
        &self.properties
    }

    #[inline]
    pub const fn at_rule_type(&self) -> AtRuleType {
        self.at_rule_type
    }

    #[inline]
    pub const fn media_query_list(&self) -> Option<&Rc<MediaQueryList>> {
        self.media_query_list.as_ref()
    }

    /// True when the rule has no media restriction or its list currently applies.
    pub fn is_media_valid(&self) -> bool {
        self.media_query_list
            .as_ref()
            .is_none_or(|list| list.is_applied())
    }

    /// Whether this rule applies to `element` right now.
    pub fn matches<A: ElementAdapter>(
        &self,
        adapter: &A,
        element: A::Handle,
        apply_pseudo: bool,
    ) -> bool {
        self.is_media_valid() && self.selector.matches(adapter, element, apply_pseudo)
    }

    /// Add or replace a declaration, keeping its own specificity.
    pub fn set_property(&mut self, property: StyleSheetProperty) {
        self.properties.set(property);
    }

    pub fn clear_properties(&mut self) {
        self.properties.clear();
    }

    /// Look a declaration up by name, or return the empty sentinel.
    ///
    /// A `padding-*`/`margin-*` longhand not declared directly is taken from
    /// the rule's shorthand when there is one.
    pub fn get_property_by_name(&self, name: &str) -> StyleSheetProperty {
        if let Some(property) = self.properties.get(name) {
            return property.clone();
        }
        longhand_edge(name)
            .and_then(|(shorthand, _)| self.properties.get(shorthand))
            .and_then(|shorthand| {
                expand_shorthand(shorthand)
                    .into_iter()
                    .find(|longhand| longhand.name().eq_ignore_ascii_case(name))
            })
            .unwrap_or_else(|| EMPTY_PROPERTY.clone())
    }
}

impl fmt::Display for StyleSheetStyle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "{} {{", self.selector)?;
        for property in &self.properties {
            let important = if property.is_important() { " !important" } else { "" };
            writeln!(formatter, "\t{}: {}{important};", property.name(), property.value())?;
        }
        writeln!(formatter, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_selectors::Specificity;

    fn rule(selector: &str, declarations: &[(&str, &str)]) -> StyleSheetStyle {
        let properties = declarations
            .iter()
            .map(|(name, value)| {
                StyleSheetProperty::new(*name, *value, Specificity::default(), false)
            })
            .collect();
        StyleSheetStyle::new(
            Selector::parse(selector).unwrap_or_else(Selector::universal),
            properties,
            AtRuleType::Style,
            None,
        )
    }

    #[test]
    fn properties_carry_selector_specificity() {
        let style = rule("#x.a", &[("color", "blue")]);
        assert_eq!(style.get_property_by_name("color").specificity(), Specificity(1, 1, 0));
    }

    #[test]
    fn longhand_lookup_falls_back_to_shorthand() {
        let style = rule(".a", &[("padding", "1dp 2dp 3dp 4dp"), ("padding-top", "9dp")]);
        assert_eq!(style.get_property_by_name("padding-top").value(), "9dp");
        assert_eq!(style.get_property_by_name("padding-left").value(), "4dp");
        assert!(style.get_property_by_name("margin-left").is_empty());
    }

    #[test]
    fn media_validity_follows_the_list() -> anyhow::Result<()> {
        let list = Rc::new(MediaQueryList::parse("(min-width: 100px)")?);
        let style = StyleSheetStyle::new(
            Selector::universal(),
            StyleSheetProperties::new(),
            AtRuleType::Media,
            Some(Rc::clone(&list)),
        );
        assert!(!style.is_media_valid());
        list.apply_media_features(&css_media_queries::MediaFeatures {
            width: 200.0,
            ..Default::default()
        });
        assert!(style.is_media_valid());
        Ok(())
    }

    #[test]
    fn display_renders_css() {
        let style = rule("div > .a", &[("color", "red")]);
        assert_eq!(style.to_string(), "div > .a {\n\tcolor: red;\n}\n");
    }
}
