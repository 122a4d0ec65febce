//! Monitoring-plugin threshold ranges.
//!
//! A range is written `[@]start:end`. `~` as start means negative infinity,
//! an empty end means positive infinity, an omitted start means `0` and a bare
//! number `N` is shorthand for `0:N`. Without `@` a value outside the closed
//! range violates it; with `@` a value inside the range does.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::result::Status;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThresholdError {
    #[error("empty threshold")]
    Empty,

    #[error("'{input}': '{part}' is not a valid number")]
    InvalidNumber { input: String, part: String },

    #[error("'{input}': start {lower} is greater than end {upper}")]
    LowerAboveUpper { input: String, lower: f64, upper: f64 },
}

/// A parsed threshold range.
///
/// An unset threshold is modelled as `Option<Threshold>::None` and never
/// violates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    lower: f64,
    upper: f64,
    inverted: bool,
}

impl Threshold {
    pub fn new(lower: f64, upper: f64, inverted: bool) -> Result<Self, ThresholdError> {
        if let Some(nan) = [lower, upper].into_iter().find(|b| b.is_nan()) {
            return Err(ThresholdError::InvalidNumber {
                input: format!("{}:{}", lower, upper),
                part: nan.to_string(),
            });
        }
        if lower > upper {
            return Err(ThresholdError::LowerAboveUpper {
                input: format!("{}:{}", lower, upper),
                lower,
                upper,
            });
        }
        Ok(Self {
            lower,
            upper,
            inverted,
        })
    }

    /// Shorthand for the `0:upper` range
    pub fn upto(upper: f64) -> Result<Self, ThresholdError> {
        Self::new(0.0, upper, false)
    }

    pub fn parse(input: &str) -> Result<Self, ThresholdError> {
        let trimmed = input.trim();
        let (inverted, body) = match trimmed.strip_prefix('@') {
            Some(rest) => (true, rest.trim()),
            None => (false, trimmed),
        };
        if body.is_empty() {
            return Err(ThresholdError::Empty);
        }

        let (lower, upper) = match body.split_once(':') {
            Some((start, end)) => {
                let start = start.trim();
                let end = end.trim();
                let lower = match start {
                    "" => 0.0,
                    "~" => f64::NEG_INFINITY,
                    n => parse_number(input, n)?,
                };
                let upper = match end {
                    "" | "~" => f64::INFINITY,
                    n => parse_number(input, n)?,
                };
                (lower, upper)
            }
            None => (0.0, parse_number(input, body)?),
        };

        if lower > upper {
            return Err(ThresholdError::LowerAboveUpper {
                input: input.to_string(),
                lower,
                upper,
            });
        }

        Ok(Self {
            lower,
            upper,
            inverted,
        })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// True when `value` should raise an alert for this range
    pub fn violates(&self, value: f64) -> bool {
        let inside = value >= self.lower && value <= self.upper;
        if self.inverted {
            inside
        } else {
            !inside
        }
    }
}

/// Violation test that treats an unset threshold as never violated
pub fn violates(threshold: Option<&Threshold>, value: f64) -> bool {
    threshold.is_some_and(|t| t.violates(value))
}

fn parse_number(input: &str, part: &str) -> Result<f64, ThresholdError> {
    // f64::from_str accepts "inf" and "NaN", which are not valid range bounds
    match part.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(ThresholdError::InvalidNumber {
            input: input.to_string(),
            part: part.to_string(),
        }),
    }
}

impl FromStr for Threshold {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            f.write_str("@")?;
        }
        if self.lower == 0.0 && self.upper.is_finite() {
            return write!(f, "{}", self.upper);
        }
        if self.lower == f64::NEG_INFINITY {
            f.write_str("~:")?;
        } else {
            write!(f, "{}:", self.lower)?;
        }
        if self.upper.is_finite() {
            write!(f, "{}", self.upper)?;
        }
        Ok(())
    }
}

/// Warning and critical range pair for one metric
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Thresholds {
    pub warn: Option<Threshold>,
    pub crit: Option<Threshold>,
}

impl Thresholds {
    pub fn new(warn: Option<Threshold>, crit: Option<Threshold>) -> Self {
        Self { warn, crit }
    }

    pub fn is_set(&self) -> bool {
        self.warn.is_some() || self.crit.is_some()
    }

    pub fn evaluate(&self, value: f64) -> Status {
        if violates(self.crit.as_ref(), value) {
            Status::Critical
        } else if violates(self.warn.as_ref(), value) {
            Status::Warning
        } else {
            Status::Ok
        }
    }
}
