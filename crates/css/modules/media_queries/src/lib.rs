//! Media Queries Level 4 - the subset a widget scene evaluates.
//! Spec: <https://www.w3.org/TR/mediaqueries-4/>
//!
//! A [`MediaQueryList`] is parsed once from an `@media` prelude, shared by
//! every rule inside that block, and remembers whether it applied the last
//! time the scene's [`MediaFeatures`] were pushed into it.

#![forbid(unsafe_code)]

mod parser;

use core::cell::Cell;
use core::fmt;

use log::debug;

/// Media types.
/// Spec: Section 2.3 - Media types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MediaType {
    #[default]
    All,
    Screen,
    Print,
}

impl MediaType {
    /// Map a lowercased type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "all" => Some(Self::All),
            "screen" => Some(Self::Screen),
            "print" => Some(Self::Print),
            _ => None,
        }
    }
}

/// Viewport orientation.
/// Spec: Section 4.5 - orientation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Environment the scene evaluates media queries against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MediaFeatures {
    /// Output medium.
    pub media_type: MediaType,
    /// Viewport width in density-independent pixels.
    pub width: f32,
    /// Viewport height in density-independent pixels.
    pub height: f32,
    /// Device pixels per CSS pixel (dppx).
    pub pixel_density: f32,
}

impl Default for MediaFeatures {
    fn default() -> Self {
        Self {
            media_type: MediaType::Screen,
            width: 0.0,
            height: 0.0,
            pixel_density: 1.0,
        }
    }
}

impl MediaFeatures {
    /// Portrait when height is at least width.
    /// Spec: Section 4.5 - orientation
    pub fn orientation(&self) -> Orientation {
        if self.height >= self.width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

/// Comparison attached to a range feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Range {
    Min,
    Max,
    Exact,
}

impl Range {
    fn holds(self, actual: f32, wanted: f32) -> bool {
        match self {
            Self::Min => actual >= wanted,
            Self::Max => actual <= wanted,
            Self::Exact => (actual - wanted).abs() < f32::EPSILON,
        }
    }
}

/// A single parenthesised media feature test.
/// Spec: Section 3 - Media features
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MediaExpression {
    Width(Range, f32),
    Height(Range, f32),
    /// Resolution in dppx.
    Resolution(Range, f32),
    Orientation(Orientation),
}

impl MediaExpression {
    /// Evaluate against the environment.
    pub fn matches(&self, features: &MediaFeatures) -> bool {
        match *self {
            Self::Width(range, wanted) => range.holds(features.width, wanted),
            Self::Height(range, wanted) => range.holds(features.height, wanted),
            Self::Resolution(range, wanted) => range.holds(features.pixel_density, wanted),
            Self::Orientation(orientation) => features.orientation() == orientation,
        }
    }
}

/// `only` / `not` prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Qualifier {
    Only,
    Not,
}

/// One comma-separated member of a media query list.
/// Spec: Section 2 - Media queries
#[derive(Clone, Debug, PartialEq, Default)]
pub struct MediaQuery {
    pub qualifier: Option<Qualifier>,
    pub media_type: MediaType,
    pub expressions: Vec<MediaExpression>,
}

impl MediaQuery {
    /// Evaluate the query; `not` negates the whole query.
    pub fn matches(&self, features: &MediaFeatures) -> bool {
        let type_matches =
            self.media_type == MediaType::All || self.media_type == features.media_type;
        let result = type_matches
            && self
                .expressions
                .iter()
                .all(|expression| expression.matches(features));
        if self.qualifier == Some(Qualifier::Not) {
            !result
        } else {
            result
        }
    }
}

/// A parsed media query list with its last evaluation result.
#[derive(Debug)]
pub struct MediaQueryList {
    /// Source text, trimmed.
    text: String,
    /// Members joined by OR.
    queries: Vec<MediaQuery>,
    /// Result of the last `apply_media_features`.
    applied: Cell<bool>,
}

impl MediaQueryList {
    /// Parse an `@media` prelude such as `screen and (min-width: 400px), print`.
    ///
    /// # Errors
    /// Returns an error if the text is not a media query list this crate understands.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let queries = parser::parse_media_query_list(text)?;
        Ok(Self {
            text: text.trim().to_owned(),
            queries,
            applied: Cell::new(false),
        })
    }

    /// Source text of the list.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn queries(&self) -> &[MediaQuery] {
        &self.queries
    }

    /// True if any member query matches. An empty list matches everything.
    pub fn evaluate(&self, features: &MediaFeatures) -> bool {
        self.queries.is_empty() || self.queries.iter().any(|query| query.matches(features))
    }

    /// Whether the list applied at the last evaluation.
    #[inline]
    pub fn is_applied(&self) -> bool {
        self.applied.get()
    }

    /// Re-evaluate against `features`, remember the result and report whether it flipped.
    pub fn apply_media_features(&self, features: &MediaFeatures) -> bool {
        let applied = self.evaluate(features);
        let changed = applied != self.applied.replace(applied);
        if changed {
            debug!(
                target: "css_media_queries",
                "@media {} applies: {applied}",
                self.text
            );
        }
        changed
    }
}

impl fmt::Display for MediaQueryList {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(width: f32, height: f32) -> MediaFeatures {
        MediaFeatures {
            width,
            height,
            ..MediaFeatures::default()
        }
    }

    #[test]
    fn lists_start_unapplied_and_report_flips() -> anyhow::Result<()> {
        let list = MediaQueryList::parse("screen and (min-width: 400px)")?;
        assert!(!list.is_applied());
        assert!(list.apply_media_features(&features(800.0, 600.0)));
        assert!(list.is_applied());
        assert!(!list.apply_media_features(&features(900.0, 600.0)));
        assert!(list.apply_media_features(&features(300.0, 600.0)));
        assert!(!list.is_applied());
        Ok(())
    }

    #[test]
    fn comma_members_are_or_ed() -> anyhow::Result<()> {
        let list = MediaQueryList::parse("print, (max-width: 320px)")?;
        assert!(list.evaluate(&features(300.0, 500.0)));
        assert!(!list.evaluate(&features(1024.0, 768.0)));
        let print = MediaFeatures {
            media_type: MediaType::Print,
            ..features(1024.0, 768.0)
        };
        assert!(list.evaluate(&print));
        Ok(())
    }

    #[test]
    fn not_negates_the_whole_query() -> anyhow::Result<()> {
        let list = MediaQueryList::parse("not screen and (orientation: portrait)")?;
        assert!(list.evaluate(&features(800.0, 600.0)));
        assert!(!list.evaluate(&features(600.0, 800.0)));
        Ok(())
    }

    #[test]
    fn resolution_units() -> anyhow::Result<()> {
        let hidpi = MediaFeatures {
            pixel_density: 2.0,
            ..MediaFeatures::default()
        };
        assert!(MediaQueryList::parse("(min-resolution: 2dppx)")?.evaluate(&hidpi));
        assert!(MediaQueryList::parse("(min-resolution: 192dpi)")?.evaluate(&hidpi));
        assert!(!MediaQueryList::parse("(min-resolution: 3x)")?.evaluate(&hidpi));
        Ok(())
    }

    #[test]
    fn invalid_lists_are_errors() {
        assert!(MediaQueryList::parse("tv").ok().is_none());
        assert!(MediaQueryList::parse("(min-width 400px)").ok().is_none());
        assert!(MediaQueryList::parse("screen (min-width: 1px)").ok().is_none());
        assert!(MediaQueryList::parse("(colour: red)").ok().is_none());
    }
}
