//! Lower `css_syntax` output into a typed [`StyleSheet`].

use std::rc::Rc;

use css_animations::{KeyframeBlock, KeyframesDefinition, parse_keyframe_selector};
use css_cascade::{Specificity, StyleSheetProperties, StyleSheetProperty};
use css_media_queries::MediaQueryList;
use css_selectors::{Selector, parse_selector_list};
use css_syntax::{Declaration, KeyframesRule, StyleRule, TopLevelRule};
use log::{debug, warn};

use crate::sheet::StyleSheet;
use crate::style::{AtRuleType, StyleSheetStyle};

/// Parse stylesheet text. Invalid rules, selectors and media preludes are
/// skipped with a warning; everything else is kept in source order.
pub fn parse_style_sheet(text: &str) -> StyleSheet {
    let mut sheet = StyleSheet::new();
    for rule in css_syntax::parse_stylesheet(text).rules {
        match rule {
            TopLevelRule::Style(style) => {
                push_style_rule(&mut sheet, &style, AtRuleType::Style, None);
            }
            TopLevelRule::Media(media) => match MediaQueryList::parse(&media.query) {
                Ok(list) => {
                    let list = Rc::new(list);
                    for style in &media.rules {
                        push_style_rule(&mut sheet, style, AtRuleType::Media, Some(&list));
                    }
                }
                Err(err) => warn!(target: "css", "skipping @media block: {err:#}"),
            },
            TopLevelRule::Keyframes(keyframes) => sheet.add_keyframes(lower_keyframes(&keyframes)),
        }
    }
    debug!(
        target: "css",
        "parsed {} rules, {} keyframes",
        sheet.styles().len(),
        sheet.keyframes().len()
    );
    sheet
}

/// Parse the declarations of an inline `style` attribute, all carrying `specificity`.
pub fn parse_declarations(text: &str, specificity: Specificity) -> StyleSheetProperties {
    properties_from(&css_syntax::parse_declarations(text), specificity)
}

fn properties_from(declarations: &[Declaration], specificity: Specificity) -> StyleSheetProperties {
    declarations
        .iter()
        .map(|decl| StyleSheetProperty::new(&decl.name, &decl.value, specificity, decl.important))
        .collect()
}

/// One rule per selector of the prelude's selector list.
fn push_style_rule(
    sheet: &mut StyleSheet,
    rule: &StyleRule,
    at_rule_type: AtRuleType,
    media: Option<&Rc<MediaQueryList>>,
) {
    let selectors = parse_selector_list(&rule.prelude).selectors;
    if selectors.is_empty() {
        warn!(target: "css", "skipping rule with invalid selector `{}`", rule.prelude);
        return;
    }
    let properties = properties_from(&rule.declarations, Specificity::default());
    for complex in selectors {
        sheet.add_style(StyleSheetStyle::new(
            Selector::new(complex),
            properties.clone(),
            at_rule_type,
            media.map(Rc::clone),
        ));
    }
}

fn lower_keyframes(rule: &KeyframesRule) -> KeyframesDefinition {
    let mut blocks = Vec::new();
    for block in &rule.blocks {
        let properties = properties_from(&block.declarations, Specificity::default());
        for selector in block.prelude.split(',') {
            match parse_keyframe_selector(selector) {
                Some(offset) => blocks.push(KeyframeBlock {
                    offset,
                    properties: properties.clone(),
                }),
                None => warn!(
                    target: "css",
                    "skipping keyframe selector `{}` in @keyframes {}",
                    selector.trim(),
                    rule.name
                ),
            }
        }
    }
    KeyframesDefinition::new(rule.name.clone(), blocks)
}
