use serde::{Deserialize, Serialize};

use crate::{LimitExceeded, Measure, OptionsError};

/// Default ceiling on the raw size of each document.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 8 * 1024 * 1024;
/// Default ceiling on the canonical line count of each document.
pub const DEFAULT_MAX_LINES: usize = 20_000;
/// Default ceiling on the nesting depth of each document.
pub const DEFAULT_MAX_DEPTH: usize = 256;
/// Largest nesting ceiling that may be configured.
///
/// Both parsers recurse once per nesting level.
pub const MAX_SUPPORTED_DEPTH: usize = 512;

/// Resource limits applied by [`compare_with_options`](crate::compare_with_options).
///
/// The line matcher is quadratic in the worst case, so the byte and line
/// ceilings are on by default; `None` disables them. The nesting ceiling
/// always applies and may be raised up to [`MAX_SUPPORTED_DEPTH`].
///
/// Options deserialize from camelCase JSON. Missing fields keep their
/// defaults and `null` disables the ceiling:
///
/// ```
/// # use docdiff_core::CompareOptions;
/// let opts: CompareOptions = serde_json::from_str(r#"{"maxLines":500,"maxInputBytes":null}"#)?;
/// assert_eq!(opts.max_lines(), Some(500));
/// assert_eq!(opts.max_input_bytes(), None);
/// assert_eq!(opts.max_depth(), docdiff_core::DEFAULT_MAX_DEPTH);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawOptions")]
pub struct CompareOptions {
    max_input_bytes: Option<usize>,
    max_lines: Option<usize>,
    max_depth: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: Some(DEFAULT_MAX_INPUT_BYTES),
            max_lines: Some(DEFAULT_MAX_LINES),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CompareOptions {
    /// Options with the byte and line ceilings disabled.
    ///
    /// ```
    /// # use docdiff_core::CompareOptions;
    /// let opts = CompareOptions::unbounded();
    /// assert_eq!(opts.max_lines(), None);
    /// assert_eq!(opts.max_input_bytes(), None);
    /// assert_eq!(opts.max_depth(), docdiff_core::DEFAULT_MAX_DEPTH);
    /// ```
    #[must_use]
    pub fn unbounded() -> Self {
        Self { max_input_bytes: None, max_lines: None, ..Self::default() }
    }

    /// Returns the per-document byte ceiling.
    #[must_use]
    pub fn max_input_bytes(&self) -> Option<usize> {
        self.max_input_bytes
    }

    /// Returns the per-document canonical line ceiling.
    #[must_use]
    pub fn max_lines(&self) -> Option<usize> {
        self.max_lines
    }

    /// Returns the per-document nesting ceiling.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Sets the per-document byte ceiling.
    ///
    /// ```
    /// # use docdiff_core::CompareOptions;
    /// let opts = CompareOptions::default().with_max_input_bytes(Some(1024)).expect("limit");
    /// assert_eq!(opts.max_input_bytes(), Some(1024));
    /// assert!(CompareOptions::default().with_max_input_bytes(Some(0)).is_err());
    /// ```
    pub fn with_max_input_bytes(mut self, limit: Option<usize>) -> Result<Self, OptionsError> {
        self.max_input_bytes = limit;
        self.validate()?;
        Ok(self)
    }

    /// Sets the per-document canonical line ceiling.
    pub fn with_max_lines(mut self, limit: Option<usize>) -> Result<Self, OptionsError> {
        self.max_lines = limit;
        self.validate()?;
        Ok(self)
    }

    /// Sets the per-document nesting ceiling.
    ///
    /// ```
    /// # use docdiff_core::{CompareOptions, MAX_SUPPORTED_DEPTH};
    /// assert!(CompareOptions::default().with_max_depth(64).is_ok());
    /// assert!(CompareOptions::default().with_max_depth(MAX_SUPPORTED_DEPTH + 1).is_err());
    /// ```
    pub fn with_max_depth(mut self, limit: usize) -> Result<Self, OptionsError> {
        self.max_depth = limit;
        self.validate()?;
        Ok(self)
    }

    /// Checks a measured size against the matching ceiling.
    ///
    /// ```
    /// # use docdiff_core::{CompareOptions, Measure};
    /// let opts = CompareOptions::default().with_max_lines(Some(10))?;
    /// assert!(opts.check(Measure::Lines, 10).is_ok());
    /// let err = opts.check(Measure::Lines, 11).unwrap_err();
    /// assert_eq!(err.to_string(), "input has 11 lines, exceeding the limit of 10");
    /// # Ok::<(), docdiff_core::OptionsError>(())
    /// ```
    pub fn check(&self, measure: Measure, actual: usize) -> Result<(), LimitExceeded> {
        let limit = match measure {
            Measure::Bytes => self.max_input_bytes,
            Measure::Lines => self.max_lines,
            Measure::Depth => Some(self.max_depth),
        };
        match limit {
            Some(limit) if actual > limit => Err(LimitExceeded { measure, actual, limit }),
            _ => Ok(()),
        }
    }

    fn validate(&self) -> Result<(), OptionsError> {
        if self.max_input_bytes == Some(0) {
            return Err(OptionsError::ZeroLimit { measure: Measure::Bytes });
        }
        if self.max_lines == Some(0) {
            return Err(OptionsError::ZeroLimit { measure: Measure::Lines });
        }
        if self.max_depth == 0 {
            return Err(OptionsError::ZeroLimit { measure: Measure::Depth });
        }
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(OptionsError::DepthUnsupported {
                requested: self.max_depth,
                supported: MAX_SUPPORTED_DEPTH,
            });
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawOptions {
    #[serde(default = "default_max_input_bytes")]
    max_input_bytes: Option<usize>,
    #[serde(default = "default_max_lines")]
    max_lines: Option<usize>,
    #[serde(default = "default_max_depth")]
    max_depth: usize,
}

fn default_max_input_bytes() -> Option<usize> {
    Some(DEFAULT_MAX_INPUT_BYTES)
}

fn default_max_lines() -> Option<usize> {
    Some(DEFAULT_MAX_LINES)
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl TryFrom<RawOptions> for CompareOptions {
    type Error = OptionsError;

    fn try_from(raw: RawOptions) -> Result<Self, Self::Error> {
        let options = Self {
            max_input_bytes: raw.max_input_bytes,
            max_lines: raw.max_lines,
            max_depth: raw.max_depth,
        };
        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_bounded() {
        let opts = CompareOptions::default();
        assert_eq!(opts.max_input_bytes(), Some(DEFAULT_MAX_INPUT_BYTES));
        assert_eq!(opts.max_lines(), Some(DEFAULT_MAX_LINES));
        assert_eq!(opts.max_depth(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn zero_line_limit_is_rejected() {
        let err = CompareOptions::default().with_max_lines(Some(0)).unwrap_err();
        assert_eq!(err, OptionsError::ZeroLimit { measure: Measure::Lines });
        assert_eq!(err.to_string(), "limit on lines must be greater than zero");
    }

    #[test]
    fn depth_limit_is_capped() {
        let err = CompareOptions::default().with_max_depth(MAX_SUPPORTED_DEPTH + 1).unwrap_err();
        assert_eq!(
            err,
            OptionsError::DepthUnsupported {
                requested: MAX_SUPPORTED_DEPTH + 1,
                supported: MAX_SUPPORTED_DEPTH
            }
        );
        assert!(CompareOptions::default().with_max_depth(0).is_err());
        assert!(CompareOptions::default().with_max_depth(MAX_SUPPORTED_DEPTH).is_ok());
    }

    #[test]
    fn depth_ceiling_survives_unbounded() {
        let opts = CompareOptions::unbounded();
        assert!(opts.check(Measure::Bytes, usize::MAX).is_ok());
        let err = opts.check(Measure::Depth, DEFAULT_MAX_DEPTH + 1).unwrap_err();
        assert_eq!(err.limit, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn deserialize_keeps_defaults_for_missing_fields() {
        let opts: CompareOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, CompareOptions::default());
    }

    #[test]
    fn deserialize_rejects_zero_and_unknown_fields() {
        assert!(serde_json::from_str::<CompareOptions>(r#"{"maxInputBytes":0}"#).is_err());
        assert!(serde_json::from_str::<CompareOptions>(r#"{"maxDepth":100000}"#).is_err());
        assert!(serde_json::from_str::<CompareOptions>(r#"{"timeout":5}"#).is_err());
    }
}
