//! Pressure stall information from `/proc/pressure`.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::error::{CheckError, Result};

pub const PROC_PRESSURE: &str = "/proc/pressure";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Cpu,
    Io,
    Memory,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Cpu, Resource::Io, Resource::Memory];

    /// File name below `/proc/pressure`, also used as perfdata prefix
    pub fn key(self) -> &'static str {
        match self {
            Resource::Cpu => "cpu",
            Resource::Io => "io",
            Resource::Memory => "memory",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Cpu => "CPU",
            Resource::Io => "IO",
            Resource::Memory => "Memory",
        })
    }
}

/// One `some` or `full` line
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PressureLine {
    pub avg10: f64,
    pub avg60: f64,
    pub avg300: f64,
    /// Total stall time in microseconds
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pressure {
    pub some: PressureLine,
    /// Missing on kernels that do not report full CPU stalls
    pub full: Option<PressureLine>,
}

#[derive(Error, Debug)]
pub enum PressureError {
    /// The pressure file does not exist, PSI is most likely disabled
    #[error("{} not found", .0.display())]
    NotAvailable(PathBuf),

    #[error(transparent)]
    Read(#[from] CheckError),
}

#[derive(Debug, Clone)]
pub struct PressureReader {
    root: PathBuf,
}

impl Default for PressureReader {
    fn default() -> Self {
        Self::new(PROC_PRESSURE)
    }
}

impl PressureReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn read(&self, resource: Resource) -> std::result::Result<Pressure, PressureError> {
        let path = self.root.join(resource.key());
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PressureError::NotAvailable(path));
            }
            Err(e) => return Err(PressureError::Read(CheckError::Io(e))),
        };
        parse_pressure(&content).map_err(PressureError::Read)
    }
}

pub fn parse_pressure(content: &str) -> Result<Pressure> {
    let mut some = None;
    let mut full = None;

    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        let mut tokens = line.split_whitespace();
        let kind = tokens.next().unwrap_or_default();
        let mut parsed = PressureLine::default();
        for token in tokens {
            let (key, value) = token.split_once('=').ok_or_else(|| {
                CheckError::metric_collection(format!("malformed pressure field '{}'", token))
            })?;
            match key {
                "avg10" => parsed.avg10 = field(token, value)?,
                "avg60" => parsed.avg60 = field(token, value)?,
                "avg300" => parsed.avg300 = field(token, value)?,
                "total" => parsed.total = field(token, value)?,
                _ => log::debug!("Ignoring unknown pressure field {}", key),
            }
        }
        match kind {
            "some" => some = Some(parsed),
            "full" => full = Some(parsed),
            other => log::debug!("Ignoring unknown pressure line {}", other),
        }
    }

    let some = some.ok_or_else(|| CheckError::metric_collection("no 'some' line in pressure data"))?;
    Ok(Pressure { some, full })
}

fn field<T: FromStr>(token: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CheckError::metric_collection(format!("malformed pressure value '{}'", token)))
}
