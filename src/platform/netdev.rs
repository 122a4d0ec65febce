//! Network interfaces from sysfs.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CheckError, Result};

pub const SYSFS_NET: &str = "/sys/class/net";

/// Counters read from `statistics/` in this order
pub const STATISTICS: [&str; 8] = [
    "rx_bytes",
    "rx_errors",
    "rx_dropped",
    "rx_packets",
    "tx_bytes",
    "tx_errors",
    "tx_dropped",
    "tx_packets",
];

/// RFC 2863 operational state as exposed in `operstate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperState {
    Up,
    Dormant,
    Testing,
    LowerLayerDown,
    Down,
    NotPresent,
    Unknown,
}

impl OperState {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "up" => OperState::Up,
            "dormant" => OperState::Dormant,
            "testing" => OperState::Testing,
            "lowerlayerdown" => OperState::LowerLayerDown,
            "down" => OperState::Down,
            "notpresent" => OperState::NotPresent,
            _ => OperState::Unknown,
        }
    }
}

impl fmt::Display for OperState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperState::Up => "Up",
            OperState::Dormant => "Dormant",
            OperState::Testing => "Testing",
            OperState::LowerLayerDown => "LowerLayerDown",
            OperState::Down => "Down",
            OperState::NotPresent => "NotPresent",
            OperState::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub name: String,
    pub state: OperState,
    /// `(counter name, value)` pairs in [`STATISTICS`] order
    pub statistics: Vec<(&'static str, u64)>,
}

/// Reads interfaces below a sysfs `class/net` directory
#[derive(Debug, Clone)]
pub struct NetReader {
    root: PathBuf,
}

impl Default for NetReader {
    fn default() -> Self {
        Self::new(SYSFS_NET)
    }
}

impl NetReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Interface names, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            CheckError::metric_collection(format!(
                "could not list network interfaces in {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        log::debug!("Detected network interfaces: {:?}", names);
        Ok(names)
    }

    pub fn read(&self, name: &str) -> Result<Interface> {
        let dir = self.root.join(name);
        let state = OperState::parse(&read_trimmed(&dir.join("operstate"))?);

        let statistics = STATISTICS
            .iter()
            .map(|stat| {
                let path = dir.join("statistics").join(stat);
                let raw = read_trimmed(&path)?;
                let value = raw.parse::<u64>().map_err(|e| {
                    CheckError::metric_collection(format!(
                        "invalid counter in {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok((*stat, value))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Interface {
            name: name.to_string(),
            state,
            statistics,
        })
    }
}

fn read_trimmed(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| CheckError::metric_collection(format!("could not read {}: {}", path.display(), e)))
}
