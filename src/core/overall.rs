//! The top-level check result.
//!
//! `Overall` collects one subcheck per measured unit and produces the final
//! plugin output:
//!
//! ```text
//! [CRITICAL] - states: critical=1 ok=2
//! \_ [CRITICAL] /var (97.20% used space, 88.10% free inodes)
//!     \_ [CRITICAL] Space usage
//! |/var_space_free=...
//! ```

use std::collections::HashMap;

use super::perfdata::{render_list, Perfdata};
use super::result::{ResultNode, Status};

#[derive(Debug, Clone, Default)]
pub struct Overall {
    subchecks: Vec<ResultNode>,
    counts: HashMap<Status, usize>,
}

impl Overall {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_subcheck(&mut self, node: ResultNode) {
        *self.counts.entry(node.status()).or_insert(0) += 1;
        self.subchecks.push(node);
    }

    /// Add a leaf subcheck with the given status and message
    pub fn add(&mut self, status: Status, message: impl Into<String>) {
        self.add_subcheck(ResultNode::with_status(status, message));
    }

    pub fn subchecks(&self) -> &[ResultNode] {
        &self.subchecks
    }

    pub fn is_empty(&self) -> bool {
        self.subchecks.is_empty()
    }

    pub fn count(&self, status: Status) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    pub fn status(&self) -> Status {
        self.subchecks
            .iter()
            .fold(Status::Ok, |acc, node| acc.worst(node.status()))
    }

    pub fn exit_code(&self) -> i32 {
        self.status().exit_code()
    }

    /// The `states: critical=N ...` part of the header
    pub fn summary(&self) -> String {
        if self.subchecks.is_empty() {
            return "No checks were performed".to_string();
        }
        let parts: Vec<String> = Status::SUMMARY_ORDER
            .iter()
            .filter(|s| self.count(**s) > 0)
            .map(|s| format!("{}={}", s.label(), self.count(*s)))
            .collect();
        format!("states: {}", parts.join(" "))
    }

    pub fn perfdata(&self) -> Vec<&Perfdata> {
        let mut points = Vec::new();
        for node in &self.subchecks {
            node.collect_perfdata(&mut points);
        }
        points
    }

    pub fn output(&self) -> String {
        let mut out = format!("[{}] - {}\n", self.status(), self.summary());
        for node in &self.subchecks {
            node.render_into(&mut out, 0);
        }
        let points = self.perfdata();
        if !points.is_empty() {
            out.push('|');
            out.push_str(&render_list(points));
            out.push('\n');
        }
        out
    }
}
