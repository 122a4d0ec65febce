//! Performance data points in the monitoring-plugin text format.
//!
//! A point renders as `label=value[uom];warn;crit;min;max` with trailing
//! empty fields dropped.

use std::fmt;

use super::threshold::Threshold;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerfValue {
    Int(i64),
    Float(f64),
}

impl From<u64> for PerfValue {
    fn from(v: u64) -> Self {
        i64::try_from(v)
            .map(PerfValue::Int)
            .unwrap_or(PerfValue::Float(v as f64))
    }
}

impl From<i64> for PerfValue {
    fn from(v: i64) -> Self {
        PerfValue::Int(v)
    }
}

impl From<f64> for PerfValue {
    fn from(v: f64) -> Self {
        PerfValue::Float(v)
    }
}

impl fmt::Display for PerfValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerfValue::Int(v) => write!(f, "{}", v),
            PerfValue::Float(v) if !v.is_finite() => f.write_str("U"),
            PerfValue::Float(v) => {
                let rounded = format!("{:.3}", v);
                let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
                match trimmed {
                    "-0" | "" => f.write_str("0"),
                    t => f.write_str(t),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Perfdata {
    pub label: String,
    pub value: PerfValue,
    pub uom: String,
    pub warn: Option<Threshold>,
    pub crit: Option<Threshold>,
    pub min: Option<PerfValue>,
    pub max: Option<PerfValue>,
}

impl Perfdata {
    pub fn new(label: impl Into<String>, value: impl Into<PerfValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            uom: String::new(),
            warn: None,
            crit: None,
            min: None,
            max: None,
        }
    }

    pub fn uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = uom.into();
        self
    }

    pub fn warn(mut self, warn: Option<Threshold>) -> Self {
        self.warn = warn;
        self
    }

    pub fn crit(mut self, crit: Option<Threshold>) -> Self {
        self.crit = crit;
        self
    }

    pub fn min(mut self, min: impl Into<PerfValue>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn max(mut self, max: impl Into<PerfValue>) -> Self {
        self.max = Some(max.into());
        self
    }

    fn quoted_label(&self) -> String {
        if self.label.contains([' ', '=', '\'']) {
            format!("'{}'", self.label.replace('\'', "''"))
        } else {
            self.label.clone()
        }
    }
}

impl fmt::Display for Perfdata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let optional = |v: Option<String>| v.unwrap_or_default();
        let mut fields = vec![
            format!("{}={}{}", self.quoted_label(), self.value, self.uom),
            optional(self.warn.map(|t| t.to_string())),
            optional(self.crit.map(|t| t.to_string())),
            optional(self.min.map(|v| v.to_string())),
            optional(self.max.map(|v| v.to_string())),
        ];
        while fields.len() > 1 && fields.last().is_some_and(|s| s.is_empty()) {
            fields.pop();
        }
        f.write_str(&fields.join(";"))
    }
}

/// Render a list of points as the space separated perfdata section
pub fn render_list<'a, I>(points: I) -> String
where
    I: IntoIterator<Item = &'a Perfdata>,
{
    points
        .into_iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
