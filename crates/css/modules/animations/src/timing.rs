//! Easing function definitions and `<time>` values.
//! Spec: <https://www.w3.org/TR/css-easing-1/>

use core::time::Duration;

use anyhow::{Context as _, anyhow, bail};

/// CSS easing function.
/// Spec: Section 2 - Easing functions
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum TimingFunction {
    Linear,
    #[default]
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    StepStart,
    StepEnd,
    CubicBezier(f32, f32, f32, f32),
}

impl TimingFunction {
    /// Parse a keyword or `cubic-bezier(x1, y1, x2, y2)`.
    ///
    /// # Errors
    /// Returns an error for unknown names or malformed `cubic-bezier` arguments.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let lower = text.trim().to_ascii_lowercase();
        let timing = match lower.as_str() {
            "linear" => Self::Linear,
            "ease" => Self::Ease,
            "ease-in" => Self::EaseIn,
            "ease-out" => Self::EaseOut,
            "ease-in-out" => Self::EaseInOut,
            "step-start" => Self::StepStart,
            "step-end" => Self::StepEnd,
            other => {
                let args = other
                    .strip_prefix("cubic-bezier(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .ok_or_else(|| anyhow!("unknown timing function `{other}`"))?;
                let points = args
                    .split(',')
                    .map(|arg| arg.trim().parse::<f32>())
                    .collect::<Result<Vec<f32>, _>>()
                    .with_context(|| format!("bad cubic-bezier arguments `{args}`"))?;
                let [x1, y1, x2, y2] = points.as_slice() else {
                    bail!("cubic-bezier takes four arguments, got {}", points.len());
                };
                Self::CubicBezier(*x1, *y1, *x2, *y2)
            }
        };
        Ok(timing)
    }
}

/// Parse a `<time>`: `1.5s`, `200ms`, or a bare `0`.
/// Spec: <https://www.w3.org/TR/css-values-4/#time>
///
/// # Errors
/// Returns an error for other units, non-numbers and negative times.
pub fn parse_duration(text: &str) -> anyhow::Result<Duration> {
    let lower = text.trim().to_ascii_lowercase();
    let (number, per_second) = if let Some(millis) = lower.strip_suffix("ms") {
        (millis, 1_000.0)
    } else if let Some(seconds) = lower.strip_suffix('s') {
        (seconds, 1.0)
    } else if lower == "0" {
        (lower.as_str(), 1.0)
    } else {
        bail!("`{text}` is not a time");
    };
    let value: f64 = number
        .parse()
        .with_context(|| format!("`{text}` is not a time"))?;
    Duration::try_from_secs_f64(value / per_second)
        .with_context(|| format!("`{text}` is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_and_cubic_bezier() -> anyhow::Result<()> {
        assert_eq!(TimingFunction::parse("Ease-In-Out")?, TimingFunction::EaseInOut);
        assert_eq!(
            TimingFunction::parse("cubic-bezier(0.1, 0.7, 1.0, 0.1)")?,
            TimingFunction::CubicBezier(0.1, 0.7, 1.0, 0.1)
        );
        assert!(TimingFunction::parse("bouncy").ok().is_none());
        assert!(TimingFunction::parse("cubic-bezier(1, 2)").ok().is_none());
        Ok(())
    }

    #[test]
    fn durations() -> anyhow::Result<()> {
        assert_eq!(parse_duration("250ms")?, Duration::from_millis(250));
        assert_eq!(parse_duration("1.5s")?, Duration::from_millis(1_500));
        assert_eq!(parse_duration("0")?, Duration::ZERO);
        assert!(parse_duration("10px").ok().is_none());
        assert!(parse_duration("-1s").ok().is_none());
        Ok(())
    }
}
