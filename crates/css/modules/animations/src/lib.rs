//! CSS Transitions and Animations - definitions read by the animation system.
//! Spec: <https://www.w3.org/TR/css-transitions-1/>
//! Spec: <https://www.w3.org/TR/css-animations-1/>
//!
//! The cascade only derives these definitions from resolved declarations;
//! driving timelines is left to whoever consumes them.

#![forbid(unsafe_code)]

mod keyframes;
mod timing;
mod transition;

pub use keyframes::{
    EMPTY_KEYFRAMES, KeyframeBlock, KeyframesDefinition, KeyframesDefinitionMap,
    parse_keyframe_selector,
};
pub use timing::{TimingFunction, parse_duration};
pub use transition::{
    TRANSITION_PREFIX, TransitionDefinition, TransitionsMap, parse_transition_properties,
};
