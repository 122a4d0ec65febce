//! Network interface state check.

use crate::core::{IncludeExclude, Overall, Perfdata, ResultNode, Status, Thresholds};
use crate::error::Result;
use crate::platform::netdev::{Interface, NetReader, OperState};

use super::count_message;

#[derive(Debug, Clone, PartialEq)]
pub struct NetdevConfig {
    pub names: IncludeExclude,
    pub down_is_critical: bool,
    pub unknown_is_ok: bool,
    pub not_up_is_ok: bool,
    /// Thresholds on the number of interfaces left after filtering
    pub count: Thresholds,
}

impl Default for NetdevConfig {
    fn default() -> Self {
        Self {
            names: IncludeExclude::new(Vec::new(), vec!["^lo$".to_string()]),
            down_is_critical: false,
            unknown_is_ok: false,
            not_up_is_ok: false,
            count: Thresholds::default(),
        }
    }
}

impl NetdevConfig {
    pub fn state_status(&self, state: OperState) -> Status {
        if self.not_up_is_ok {
            return Status::Ok;
        }
        match state {
            OperState::Up => Status::Ok,
            OperState::Down if self.down_is_critical => Status::Critical,
            OperState::Unknown if self.unknown_is_ok => Status::Ok,
            _ => Status::Warning,
        }
    }
}

pub fn run(config: &NetdevConfig, reader: &NetReader) -> Result<Overall> {
    let mut overall = Overall::new();

    let names = match reader.list() {
        Ok(names) => names,
        Err(e) => {
            log::warn!("Listing network interfaces failed: {}", e);
            overall.add(Status::Unknown, e.to_string());
            return Ok(overall);
        }
    };
    let names = config.names.apply(&names, |n| n.as_str())?;
    log::debug!("Interfaces after filtering: {:?}", names);

    if config.count.is_set() {
        overall.add(
            config.count.evaluate(names.len() as f64),
            count_message(names.len(), "interface", "interfaces", &config.count),
        );
    }

    for name in &names {
        let node = match reader.read(name) {
            Ok(iface) => interface_node(&iface, config),
            Err(e) => {
                log::warn!("Skipping interface {}: {}", name, e);
                ResultNode::with_status(
                    Status::Unknown,
                    format!("Could not read interface {}: {}", name, e),
                )
            }
        };
        overall.add_subcheck(node);
    }
    Ok(overall)
}

pub fn interface_node(iface: &Interface, config: &NetdevConfig) -> ResultNode {
    let mut node = ResultNode::with_status(
        config.state_status(iface.state),
        format!("{} is {}", iface.name, iface.state),
    );
    for (stat, value) in &iface.statistics {
        node.add_perfdata(Perfdata::new(format!("{}_{}", iface.name, stat), *value).uom("c"));
    }
    node
}
