//! Check states and the result tree.
//!
//! Every check builds a tree of [`ResultNode`]s. Adding a child escalates the
//! parent, so a node's status is always the worst of its own status and the
//! statuses of all its descendants.

use std::fmt;

use super::perfdata::Perfdata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Every state in summary order
    pub const SUMMARY_ORDER: [Status; 4] = [
        Status::Critical,
        Status::Unknown,
        Status::Warning,
        Status::Ok,
    ];

    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    // UNKNOWN only outranks OK
    fn severity(self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Unknown => 1,
            Status::Warning => 2,
            Status::Critical => 3,
        }
    }

    pub fn worst(self, other: Status) -> Status {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }

    /// Lower-case name used in the overall summary line
    pub fn label(self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Warning => "warning",
            Status::Critical => "critical",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const INDENT: &str = "    ";

#[derive(Debug, Clone, Default)]
pub struct ResultNode {
    own: Status,
    escalated: Status,
    message: String,
    perfdata: Vec<Perfdata>,
    children: Vec<ResultNode>,
}

impl ResultNode {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_status(status: Status, message: impl Into<String>) -> Self {
        Self {
            own: status,
            message: message.into(),
            ..Default::default()
        }
    }

    /// Effective status: the worst of the node's own and its children's
    pub fn status(&self) -> Status {
        self.own.worst(self.escalated)
    }

    /// Sets the node's own status; escalation from children still applies
    pub fn set_status(&mut self, status: Status) {
        self.own = status;
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn children(&self) -> &[ResultNode] {
        &self.children
    }

    pub fn perfdata(&self) -> &[Perfdata] {
        &self.perfdata
    }

    pub fn add_perfdata(&mut self, point: Perfdata) {
        self.perfdata.push(point);
    }

    pub fn add_child(&mut self, child: ResultNode) {
        self.escalated = self.escalated.worst(child.status());
        self.children.push(child);
    }

    /// All perfdata of this subtree, depth-first pre-order
    pub fn collect_perfdata<'a>(&'a self, out: &mut Vec<&'a Perfdata>) {
        out.extend(self.perfdata.iter());
        for child in &self.children {
            child.collect_perfdata(out);
        }
    }

    /// Render this node as a top-level line followed by its subtree
    pub fn output(&self) -> String {
        let mut out = format!("[{}] {}\n", self.status(), self.message);
        for child in &self.children {
            child.render_into(&mut out, 0);
        }
        out
    }

    pub(crate) fn render_into(&self, out: &mut String, depth: usize) {
        out.push_str(&INDENT.repeat(depth));
        out.push_str(&format!("\\_ [{}] {}\n", self.status(), self.message));
        for child in &self.children {
            child.render_into(out, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Status::Ok.exit_code(), 0);
        assert_eq!(Status::Warning.exit_code(), 1);
        assert_eq!(Status::Critical.exit_code(), 2);
        assert_eq!(Status::Unknown.exit_code(), 3);
    }

    #[test]
    fn test_worst_order() {
        assert_eq!(Status::Ok.worst(Status::Unknown), Status::Unknown);
        assert_eq!(Status::Unknown.worst(Status::Warning), Status::Warning);
        assert_eq!(Status::Warning.worst(Status::Unknown), Status::Warning);
        assert_eq!(Status::Critical.worst(Status::Unknown), Status::Critical);
        assert_eq!(Status::Warning.worst(Status::Critical), Status::Critical);
    }

    #[test]
    fn test_critical_child_escalates_ok_parent() {
        let mut parent = ResultNode::new("parent");
        parent.add_child(ResultNode::with_status(Status::Critical, "bad"));
        assert_eq!(parent.status(), Status::Critical);
    }

    #[test]
    fn test_unknown_does_not_downgrade_warning() {
        let mut parent = ResultNode::with_status(Status::Warning, "parent");
        parent.add_child(ResultNode::with_status(Status::Unknown, "?"));
        assert_eq!(parent.status(), Status::Warning);

        let mut ok_parent = ResultNode::new("parent");
        ok_parent.add_child(ResultNode::with_status(Status::Unknown, "?"));
        assert_eq!(ok_parent.status(), Status::Unknown);
    }

    #[test]
    fn test_status_is_worst_of_subtree() {
        let mut leaf_parent = ResultNode::new("mid");
        leaf_parent.add_child(ResultNode::with_status(Status::Warning, "leaf"));
        let mut root = ResultNode::new("root");
        root.add_child(ResultNode::new("fine"));
        root.add_child(leaf_parent);
        assert_eq!(root.status(), Status::Warning);

        // setting the own status cannot hide an escalated child
        root.set_status(Status::Ok);
        assert_eq!(root.status(), Status::Warning);
        root.set_status(Status::Critical);
        assert_eq!(root.status(), Status::Critical);
    }

    #[test]
    fn test_output_indentation() {
        let mut inner = ResultNode::new("inner");
        inner.add_child(ResultNode::with_status(Status::Warning, "deep"));
        let mut root = ResultNode::new("root");
        root.add_child(inner);
        assert_eq!(
            root.output(),
            "[WARNING] root\n\\_ [WARNING] inner\n    \\_ [WARNING] deep\n"
        );
    }

    #[test]
    fn test_collect_perfdata_preorder() {
        let mut child = ResultNode::new("child");
        child.add_perfdata(Perfdata::new("b", 2i64));
        let mut root = ResultNode::new("root");
        root.add_perfdata(Perfdata::new("a", 1i64));
        root.add_child(child);

        let mut points = Vec::new();
        root.collect_perfdata(&mut points);
        let labels: Vec<_> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b"]);
    }
}
