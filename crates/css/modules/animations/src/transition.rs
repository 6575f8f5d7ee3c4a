//! Transition definitions derived from resolved `transition*` declarations.
//! Spec: <https://www.w3.org/TR/css-transitions-1/#transition-shorthand-property>

use core::time::Duration;
use std::collections::BTreeMap;

use css_cascade::{StyleSheetProperty, split_values};
use log::warn;

use crate::timing::{TimingFunction, parse_duration};

/// Every declaration whose name starts with this configures transitions.
pub const TRANSITION_PREFIX: &str = "transition";

/// How one property animates between two resolved values.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TransitionDefinition {
    /// Animated property, or `all`.
    pub property: String,
    pub duration: Duration,
    pub delay: Duration,
    pub timing: TimingFunction,
}

/// Property name (or `all`) to its transition.
pub type TransitionsMap = BTreeMap<String, TransitionDefinition>;

/// Per-field comma lists gathered from the shorthand and longhands.
#[derive(Default)]
struct TransitionLists {
    properties: Vec<String>,
    durations: Vec<Duration>,
    timings: Vec<TimingFunction>,
    delays: Vec<Duration>,
}

/// Build the transition map from `transition`, `transition-property`,
/// `transition-duration`, `transition-timing-function` and `transition-delay`.
///
/// The shorthand fills every list first; a longhand that is present replaces
/// its whole list. Shorter lists repeat cyclically against the property list,
/// and properties named `none` are skipped.
pub fn parse_transition_properties<'props, I>(properties: I) -> TransitionsMap
where
    I: IntoIterator<Item = &'props StyleSheetProperty>,
{
    let mut lists = TransitionLists::default();
    let mut longhands: Vec<&StyleSheetProperty> = Vec::new();
    for property in properties {
        if property.name() == TRANSITION_PREFIX {
            parse_shorthand(property.value(), &mut lists);
        } else {
            longhands.push(property);
        }
    }
    for property in longhands {
        let items = comma_items(property.value());
        match property.name() {
            "transition-property" => {
                lists.properties = items.iter().map(|item| item.to_ascii_lowercase()).collect();
            }
            "transition-duration" => {
                lists.durations = items.iter().map(|item| duration_or_zero(item)).collect();
            }
            "transition-delay" => {
                lists.delays = items.iter().map(|item| duration_or_zero(item)).collect();
            }
            "transition-timing-function" => {
                lists.timings = items.iter().map(|item| timing_or_ease(item)).collect();
            }
            other => {
                warn!(target: "css_animations", "ignoring unknown transition property `{other}`");
            }
        }
    }
    build_map(&lists)
}

/// `<property> || <duration> || <timing> || <delay>` per comma item.
fn parse_shorthand(value: &str, lists: &mut TransitionLists) {
    lists.properties.clear();
    lists.durations.clear();
    lists.timings.clear();
    lists.delays.clear();
    for item in comma_items(value) {
        let mut property = String::from("all");
        let mut duration: Option<Duration> = None;
        let mut delay = Duration::ZERO;
        let mut timing = TimingFunction::default();
        for token in split_values(item) {
            if let Ok(time) = parse_duration(token) {
                if duration.is_none() {
                    duration = Some(time);
                } else {
                    delay = time;
                }
            } else if let Ok(parsed) = TimingFunction::parse(token) {
                timing = parsed;
            } else {
                property = token.to_ascii_lowercase();
            }
        }
        lists.properties.push(property);
        lists.durations.push(duration.unwrap_or_default());
        lists.timings.push(timing);
        lists.delays.push(delay);
    }
}

/// Zip the lists into definitions keyed by property name.
fn build_map(lists: &TransitionLists) -> TransitionsMap {
    let mut out = TransitionsMap::new();
    for (index, property) in lists.properties.iter().enumerate() {
        if property == "none" {
            continue;
        }
        out.insert(
            property.clone(),
            TransitionDefinition {
                property: property.clone(),
                duration: cyclic(&lists.durations, index),
                delay: cyclic(&lists.delays, index),
                timing: cyclic(&lists.timings, index),
            },
        );
    }
    out
}

/// Element `index` of a list repeated to any length, or the default if empty.
fn cyclic<T: Copy + Default>(list: &[T], index: usize) -> T {
    if list.is_empty() {
        return T::default();
    }
    list.get(index % list.len()).copied().unwrap_or_default()
}

/// Split on top-level commas, dropping empty items.
fn comma_items(value: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (index, character) in value.char_indices() {
        match character {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(value[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    out.push(value[start..].trim());
    out.retain(|item| !item.is_empty());
    out
}

fn duration_or_zero(text: &str) -> Duration {
    parse_duration(text).unwrap_or_else(|err| {
        warn!(target: "css_animations", "{err:#}");
        Duration::ZERO
    })
}

fn timing_or_ease(text: &str) -> TimingFunction {
    TimingFunction::parse(text).unwrap_or_else(|err| {
        warn!(target: "css_animations", "{err:#}");
        TimingFunction::Ease
    })
}
