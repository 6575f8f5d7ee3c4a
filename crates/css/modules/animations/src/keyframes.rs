//! `@keyframes` storage.
//! Spec: <https://www.w3.org/TR/css-animations-1/#keyframes>

use std::collections::BTreeMap;

use css_cascade::StyleSheetProperties;

/// One keyframe selector block.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct KeyframeBlock {
    /// Progress offset in `0.0..=1.0`.
    pub offset: f32,
    pub properties: StyleSheetProperties,
}

/// A named `@keyframes` definition, blocks sorted by offset.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct KeyframesDefinition {
    pub name: String,
    pub blocks: Vec<KeyframeBlock>,
}

/// Returned by lookups for undefined names.
pub static EMPTY_KEYFRAMES: KeyframesDefinition = KeyframesDefinition::empty();

/// Keyframes by name.
pub type KeyframesDefinitionMap = BTreeMap<String, KeyframesDefinition>;

impl KeyframesDefinition {
    /// The empty sentinel.
    pub const fn empty() -> Self {
        Self {
            name: String::new(),
            blocks: Vec::new(),
        }
    }

    /// Build a definition, ordering blocks by offset (stable for equal offsets).
    pub fn new(name: impl Into<String>, mut blocks: Vec<KeyframeBlock>) -> Self {
        blocks.sort_by(|left, right| left.offset.total_cmp(&right.offset));
        Self {
            name: name.into(),
            blocks,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.blocks.is_empty()
    }
}

/// Parse one keyframe selector: `from`, `to` or a percentage.
pub fn parse_keyframe_selector(text: &str) -> Option<f32> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("from") {
        return Some(0.0);
    }
    if trimmed.eq_ignore_ascii_case("to") {
        return Some(1.0);
    }
    let percent: f32 = trimmed.strip_suffix('%')?.trim().parse().ok()?;
    (0.0..=100.0).contains(&percent).then_some(percent / 100.0)
}
