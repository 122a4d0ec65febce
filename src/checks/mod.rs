//! Metric checks.
//!
//! Each check turns acquired data plus its config into an [`Overall`]. The
//! helpers in this module implement the pattern they all share: compare a
//! value against a warn/crit pair, report the outcome as a child node and
//! attach the perfdata point to whichever node owns it.
//!
//! [`Overall`]: crate::core::Overall

pub mod files;
pub mod filesystem;
pub mod load;
pub mod memory;
pub mod netdev;
pub mod psi;
pub mod sensors;

use crate::core::{Perfdata, ResultNode, Status, Thresholds};

/// Outcome of a [`Measurement`]
#[derive(Debug, Clone)]
pub enum Evaluation {
    /// Thresholds were configured: a child node owning the perfdata point
    Checked(ResultNode),
    /// Nothing to compare against: only the perfdata point
    Unchecked(Perfdata),
}

/// One value to compare against a threshold pair
#[derive(Debug, Clone)]
pub struct Measurement {
    pub title: String,
    pub detail: String,
    pub value: f64,
    pub thresholds: Thresholds,
    pub perfdata: Perfdata,
}

impl Measurement {
    pub fn new(
        title: impl Into<String>,
        detail: impl Into<String>,
        value: f64,
        thresholds: Thresholds,
        perfdata: Perfdata,
    ) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            value,
            thresholds,
            perfdata,
        }
    }

    pub fn evaluate(self) -> Evaluation {
        let perfdata = self
            .perfdata
            .warn(self.thresholds.warn)
            .crit(self.thresholds.crit);
        if !self.thresholds.is_set() {
            return Evaluation::Unchecked(perfdata);
        }

        let status = self.thresholds.evaluate(self.value);
        let message = if status == Status::Ok {
            format!("{}: {}", self.title, self.detail)
        } else {
            format!("{} violates threshold: {}", self.title, self.detail)
        };
        let mut node = ResultNode::with_status(status, message);
        node.add_perfdata(perfdata);
        Evaluation::Checked(node)
    }

    /// Evaluate and attach the outcome to `parent`
    pub fn attach_to(self, parent: &mut ResultNode) {
        match self.evaluate() {
            Evaluation::Checked(child) => parent.add_child(child),
            Evaluation::Unchecked(perfdata) => parent.add_perfdata(perfdata),
        }
    }
}

/// Message for a count of matched units checked against optional thresholds
pub(crate) fn count_message(count: usize, singular: &str, plural: &str, thresholds: &Thresholds) -> String {
    let mut message = if count == 1 {
        format!("Found one matching {}", singular)
    } else {
        format!("Found {} matching {}", count, plural)
    };
    if thresholds.is_set() {
        let value = count as f64;
        if let Some(crit) = thresholds.crit.filter(|t| t.violates(value)) {
            message.push_str(&format!(". This violates the critical threshold of {}", crit));
        } else if let Some(warn) = thresholds.warn.filter(|t| t.violates(value)) {
            message.push_str(&format!(". This violates the warning threshold of {}", warn));
        } else {
            message.push_str(". This number resides within the given thresholds");
        }
    }
    message
}
