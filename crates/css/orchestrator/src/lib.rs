//! Runtime style cascade for a retained widget tree.
//!
//! A [`StyleEngine`] keeps one [`UiStyle`] per widget. Loading a widget
//! matches it against the scene's [`css::StyleSheet`] and splits the matches
//! into cacheable rules, which only look at the widget itself, and
//! non-cacheable rules, which also read the interaction state of related
//! widgets. Each cascade pass merges inline style, cacheable rules and
//! non-cacheable rules by importance and specificity, pushes the winners to
//! the widget in one attribute transaction and re-resolves every widget
//! subscribed to this one.

#![forbid(unsafe_code)]

mod engine;
mod state;
mod subscriptions;
mod ui_style;
mod widget;

pub use engine::StyleEngine;
pub use state::{StateFlag, StateFlags};
pub use subscriptions::Subscriptions;
pub use ui_style::UiStyle;
pub use widget::{AttributeTransaction, NodeAttribute, StyleableWidgets, WidgetKey};
