//! `padding` / `margin` shorthand expansion into per-edge longhands.
//! Spec: <https://www.w3.org/TR/css-box-4/#margin-physical>

use crate::StyleSheetProperty;

/// Shorthands expanded into four edge longhands.
const EDGE_SHORTHANDS: [&str; 2] = ["padding", "margin"];

/// A box edge, in shorthand order (top, right, bottom, left).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    /// All edges in shorthand order.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Longhand suffix, e.g. `top` in `padding-top`.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }

    /// Pick this edge out of a 1–4 value list.
    fn pick<'value>(self, values: &[&'value str]) -> Option<&'value str> {
        let index = match (values.len(), self) {
            (1, _) | (_, Self::Top) | (2, Self::Bottom) => 0,
            (_, Self::Right) | (2 | 3, Self::Left) => 1,
            (_, Self::Bottom) => 2,
            (_, Self::Left) => 3,
        };
        values.get(index).copied()
    }
}

/// True for `padding` and `margin`.
pub fn is_edge_shorthand(name: &str) -> bool {
    EDGE_SHORTHANDS
        .iter()
        .any(|shorthand| shorthand.eq_ignore_ascii_case(name))
}

/// Split a longhand name such as `margin-left` into its shorthand and edge.
pub fn longhand_edge(name: &str) -> Option<(&'static str, Edge)> {
    let lower = name.to_ascii_lowercase();
    EDGE_SHORTHANDS.iter().find_map(|shorthand| {
        let suffix = lower.strip_prefix(shorthand)?.strip_prefix('-')?;
        Edge::ALL
            .into_iter()
            .find(|edge| edge.suffix() == suffix)
            .map(|edge| (*shorthand, edge))
    })
}

/// Split a component value list on whitespace that is not inside parentheses,
/// so `calc(1px + 2px) 4px` yields two values.
pub fn split_values(value: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;
    for (index, character) in value.char_indices() {
        match character {
            '(' => {
                depth += 1;
                start.get_or_insert(index);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                start.get_or_insert(index);
            }
            _ if character.is_whitespace() && depth == 0 => {
                if let Some(begin) = start.take() {
                    out.push(&value[begin..index]);
                }
            }
            _ => {
                start.get_or_insert(index);
            }
        }
    }
    if let Some(begin) = start {
        out.push(&value[begin..]);
    }
    out
}

/// Expand `padding`/`margin` into `-top/-right/-bottom/-left` longhands, each
/// carrying the shorthand's specificity, importance and volatility. Any other
/// declaration, or a shorthand without 1–4 values, is returned unchanged.
pub fn expand_shorthand(property: &StyleSheetProperty) -> Vec<StyleSheetProperty> {
    if !is_edge_shorthand(property.name()) {
        return vec![property.clone()];
    }
    let values = split_values(property.value());
    if values.is_empty() || values.len() > 4 {
        return vec![property.clone()];
    }
    Edge::ALL
        .into_iter()
        .filter_map(|edge| {
            let value = edge.pick(&values)?;
            Some(
                StyleSheetProperty::new(
                    format!("{}-{}", property.name(), edge.suffix()),
                    value,
                    property.specificity(),
                    property.is_important(),
                )
                .with_volatile(property.is_volatile()),
            )
        })
        .collect()
}
