#![cfg(test)]

mod common;

use std::rc::Rc;

use common::{TestTree, init_logging};
use css::parse_style_sheet;
use css_media_queries::{MediaFeatures, MediaType};
use css_orchestrator::{StateFlag, StyleEngine, UiStyle, WidgetKey};

fn viewport(width: f32) -> MediaFeatures {
    MediaFeatures {
        width,
        height: 480.0,
        ..MediaFeatures::default()
    }
}

fn card_tree() -> (TestTree, WidgetKey, WidgetKey) {
    let mut tree = TestTree::new();
    let root = tree.add(None, "div#root");
    let toggle = tree.add(Some(root), "button.toggle");
    let card = tree.add(Some(root), "div.card");
    (tree, toggle, card)
}

#[test]
fn media_feature_changes_reload_every_widget() {
    init_logging();
    let sheet = parse_style_sheet(
        ".card { color: red } @media (min-width: 600px) { .card { color: blue; margin: 2dp } }",
    );
    let (mut tree, toggle, card) = card_tree();
    let mut engine = StyleEngine::new(Rc::new(sheet), viewport(400.0));
    engine.refresh(&mut tree, toggle);
    engine.refresh(&mut tree, card);
    assert_eq!(tree.attribute(card, "color"), Some("red"));

    assert!(engine.update_media_features(&mut tree, viewport(800.0)));
    assert_eq!(tree.attribute(card, "color"), Some("blue"));
    assert_eq!(tree.attribute(card, "margin-left"), Some("2dp"));

    let passes = tree.transactions(card);
    assert!(!engine.update_media_features(&mut tree, viewport(900.0)));
    assert_eq!(tree.transactions(card), passes);

    assert!(engine.update_media_features(&mut tree, viewport(320.0)));
    assert_eq!(tree.attribute(card, "color"), Some("red"));
    assert_eq!(tree.attribute(card, "margin-left"), None);
}

#[test]
fn replacing_the_sheet_rebuilds_rules_and_subscriptions() {
    init_logging();
    let (mut tree, toggle, card) = card_tree();
    let mut engine = StyleEngine::new(
        Rc::new(parse_style_sheet(".card { color: red }")),
        viewport(400.0),
    );
    engine.refresh(&mut tree, toggle);
    engine.refresh(&mut tree, card);
    assert!(engine.subscriptions().is_empty());

    tree.set_flags(toggle, &[StateFlag::Normal, StateFlag::Pressed]);
    engine.replace_style_sheet(
        &mut tree,
        Rc::new(parse_style_sheet(
            ".card { color: green } .toggle:active + .card { color: purple }",
        )),
    );
    assert_eq!(tree.attribute(card, "color"), Some("purple"));
    assert_eq!(engine.subscriptions().subscribed_to(card), vec![toggle]);
    assert_eq!(engine.style(toggle).map(UiStyle::current_state), Some(StateFlag::Pressed));

    tree.set_flags(toggle, &[StateFlag::Normal]);
    assert!(engine.update_state(&mut tree, toggle));
    assert_eq!(tree.attribute(card, "color"), Some("green"));
}

#[test]
fn sheets_evaluate_media_on_construction() {
    init_logging();
    let sheet = Rc::new(parse_style_sheet("@media print { .card { color: black } }"));
    let engine = StyleEngine::new(Rc::clone(&sheet), viewport(400.0));
    assert!(engine.style_sheet().media_query_lists().iter().all(|list| !list.is_applied()));
    let printing = MediaFeatures {
        media_type: MediaType::Print,
        ..viewport(400.0)
    };
    let print_engine = StyleEngine::new(sheet, printing);
    assert!(print_engine.style_sheet().media_query_lists().iter().all(|list| list.is_applied()));
}
