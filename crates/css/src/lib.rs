//! Style rules and the stylesheet container.
//!
//! [`StyleSheetStyle`] pairs a selector with its declarations, [`StyleSheet`]
//! keeps rules in source order together with the media lists and keyframes
//! they declare, and [`parse_style_sheet`] builds one from CSS text.

#![forbid(unsafe_code)]

mod loader;
mod sheet;
mod style;

pub use loader::{parse_declarations, parse_style_sheet};
pub use sheet::StyleSheet;
pub use style::{AtRuleType, StyleSheetStyle};
