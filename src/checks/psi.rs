//! Pressure stall information check.
//!
//! Each resource has a generic warn/crit pair that applies to all six
//! averages (some/full x avg10/avg60/avg300); a threshold given for one
//! specific average replaces the generic one for that average only.

use std::fmt;

use crate::core::{Overall, Perfdata, ResultNode, Status, Threshold, Thresholds};
use crate::platform::pressure::{Pressure, PressureError, PressureLine, PressureReader, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StallKind {
    Some,
    Full,
}

impl StallKind {
    pub const ALL: [StallKind; 2] = [StallKind::Some, StallKind::Full];

    pub fn key(self) -> &'static str {
        match self {
            StallKind::Some => "some",
            StallKind::Full => "full",
        }
    }
}

impl fmt::Display for StallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StallKind::Some => "Some",
            StallKind::Full => "Full",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Avg10,
    Avg60,
    Avg300,
}

impl Window {
    pub const ALL: [Window; 3] = [Window::Avg10, Window::Avg60, Window::Avg300];

    pub fn key(self) -> &'static str {
        match self {
            Window::Avg10 => "avg10",
            Window::Avg60 => "avg60",
            Window::Avg300 => "avg300",
        }
    }

    fn index(self) -> usize {
        match self {
            Window::Avg10 => 0,
            Window::Avg60 => 1,
            Window::Avg300 => 2,
        }
    }

    fn value(self, line: &PressureLine) -> f64 {
        match self {
            Window::Avg10 => line.avg10,
            Window::Avg60 => line.avg60,
            Window::Avg300 => line.avg300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceThresholds {
    pub generic: Thresholds,
    pub some: [Thresholds; 3],
    pub full: [Thresholds; 3],
}

impl Default for ResourceThresholds {
    fn default() -> Self {
        Self {
            generic: Thresholds::new(
                Threshold::parse("@30:100").ok(),
                Threshold::parse("@95:100").ok(),
            ),
            some: [Thresholds::default(); 3],
            full: [Thresholds::default(); 3],
        }
    }
}

impl ResourceThresholds {
    pub fn specific_mut(&mut self, kind: StallKind, window: Window) -> &mut Thresholds {
        match kind {
            StallKind::Some => &mut self.some[window.index()],
            StallKind::Full => &mut self.full[window.index()],
        }
    }

    /// The thresholds in effect for one average
    pub fn effective(&self, kind: StallKind, window: Window) -> Thresholds {
        let specific = match kind {
            StallKind::Some => self.some[window.index()],
            StallKind::Full => self.full[window.index()],
        };
        Thresholds::new(
            specific.warn.or(self.generic.warn),
            specific.crit.or(self.generic.crit),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PsiConfig {
    /// Resources to check; empty means all of them
    pub include: Vec<Resource>,
    pub cpu: ResourceThresholds,
    pub io: ResourceThresholds,
    pub memory: ResourceThresholds,
}

impl PsiConfig {
    pub fn resources(&self) -> Vec<Resource> {
        if self.include.is_empty() {
            return Resource::ALL.to_vec();
        }
        Resource::ALL
            .into_iter()
            .filter(|r| self.include.contains(r))
            .collect()
    }

    pub fn thresholds(&self, resource: Resource) -> &ResourceThresholds {
        match resource {
            Resource::Cpu => &self.cpu,
            Resource::Io => &self.io,
            Resource::Memory => &self.memory,
        }
    }

    pub fn thresholds_mut(&mut self, resource: Resource) -> &mut ResourceThresholds {
        match resource {
            Resource::Cpu => &mut self.cpu,
            Resource::Io => &mut self.io,
            Resource::Memory => &mut self.memory,
        }
    }
}

pub fn run(config: &PsiConfig, reader: &PressureReader) -> Overall {
    let mut overall = Overall::new();
    for resource in config.resources() {
        let node = match reader.read(resource) {
            Ok(pressure) => resource_node(resource, &pressure, config.thresholds(resource)),
            Err(PressureError::NotAvailable(path)) => {
                log::warn!("{} does not exist", path.display());
                ResultNode::with_status(
                    Status::Unknown,
                    format!(
                        "{} pressure file not found. Perhaps the PSI interface is not active on this system? \
                         Adding psi=1 to the kernel cmdline might help",
                        resource
                    ),
                )
            }
            Err(e) => ResultNode::with_status(
                Status::Unknown,
                format!("Could not read {} pressure: {}", resource, e),
            ),
        };
        overall.add_subcheck(node);
    }
    overall
}

pub fn resource_node(resource: Resource, pressure: &Pressure, thresholds: &ResourceThresholds) -> ResultNode {
    let mut node = ResultNode::new(resource.to_string());

    let lines = [(StallKind::Some, Some(pressure.some)), (StallKind::Full, pressure.full)];
    for (kind, line) in lines {
        if let Some(line) = line {
            add_line_perfdata(&mut node, resource, kind, &line, thresholds);
        }
    }

    if let Some(full) = &pressure.full {
        node.add_child(line_node(StallKind::Full, full, thresholds));
    }
    node.add_child(line_node(StallKind::Some, &pressure.some, thresholds));
    node
}

fn add_line_perfdata(
    node: &mut ResultNode,
    resource: Resource,
    kind: StallKind,
    line: &PressureLine,
    thresholds: &ResourceThresholds,
) {
    let prefix = format!("{}-{}", resource.key(), kind.key());
    for window in Window::ALL {
        let effective = thresholds.effective(kind, window);
        node.add_perfdata(
            Perfdata::new(format!("{}-{}", prefix, window.key()), window.value(line))
                .uom("%")
                .warn(effective.warn)
                .crit(effective.crit)
                .min(0u64)
                .max(100u64),
        );
    }
    node.add_perfdata(
        Perfdata::new(format!("{}-total", prefix), line.total)
            .uom("c")
            .min(0u64),
    );
}

fn line_node(kind: StallKind, line: &PressureLine, thresholds: &ResourceThresholds) -> ResultNode {
    let status = Window::ALL
        .iter()
        .map(|w| thresholds.effective(kind, *w).evaluate(w.value(line)))
        .fold(Status::Ok, Status::worst);

    ResultNode::with_status(
        status,
        format!(
            "{} - Avg10: {:.2}, Avg60: {:.2}, Avg300: {:.2}",
            kind, line.avg10, line.avg60, line.avg300
        ),
    )
}
