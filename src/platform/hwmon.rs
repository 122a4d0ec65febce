//! Hardware monitoring sensors from `/sys/class/hwmon`.
//!
//! Every `hwmonN` directory is one device. Its sensors are discovered from
//! attribute file names of the form `<kind><index>_<attribute>`, e.g.
//! `temp1_input`, `in0_max` or `fan2_alarm`, and scaled from the kernel's
//! fixed-point units into the usual ones.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::Threshold;
use crate::error::{CheckError, Result};

pub const SYSFS_HWMON: &str = "/sys/class/hwmon";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SensorKind {
    Power,
    Pwm,
    Temperature,
    Fan,
    Voltage,
    Current,
    Energy,
    Humidity,
}

impl SensorKind {
    const ALL: [SensorKind; 8] = [
        SensorKind::Power,
        SensorKind::Pwm,
        SensorKind::Temperature,
        SensorKind::Fan,
        SensorKind::Voltage,
        SensorKind::Current,
        SensorKind::Energy,
        SensorKind::Humidity,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            SensorKind::Power => "power",
            SensorKind::Pwm => "pwm",
            SensorKind::Temperature => "temp",
            SensorKind::Fan => "fan",
            SensorKind::Voltage => "in",
            SensorKind::Current => "curr",
            SensorKind::Energy => "energy",
            SensorKind::Humidity => "humidity",
        }
    }

    pub fn uom(self) -> &'static str {
        match self {
            SensorKind::Power => "W",
            SensorKind::Temperature => "C",
            SensorKind::Voltage => "V",
            SensorKind::Current => "A",
            SensorKind::Energy => "J",
            SensorKind::Humidity => "%",
            SensorKind::Fan | SensorKind::Pwm => "",
        }
    }

    // sysfs values are milli-units, except power and energy (micro), fan
    // speed (RPM) and pwm frequency (Hz)
    fn divisor(self) -> f64 {
        match self {
            SensorKind::Power | SensorKind::Energy => 1_000_000.0,
            SensorKind::Fan | SensorKind::Pwm => 1.0,
            _ => 1000.0,
        }
    }

    fn input_suffix(self) -> &'static str {
        match self {
            SensorKind::Pwm => "_freq",
            _ => "_input",
        }
    }

    /// Split an attribute file name like `temp12_max` into kind and index
    fn parse_attribute(file_name: &str) -> Option<(SensorKind, u32)> {
        Self::ALL.iter().find_map(|kind| {
            let rest = file_name.strip_prefix(kind.prefix())?;
            let (index, _attribute) = rest.split_once('_')?;
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            index.parse().ok().map(|i| (*kind, i))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    pub label: String,
    pub kind: SensorKind,
    pub value: f64,
    pub warn: Option<Threshold>,
    pub crit: Option<Threshold>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub alarm: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub name: String,
    pub sensors: Vec<Sensor>,
}

/// A hwmon directory that is listed but could not be read
#[derive(Error, Debug)]
#[error("Could not read hwmon device {}: {error}", .dir.display())]
pub struct DeviceError {
    pub dir: PathBuf,
    /// Content of the `name` file if readable, otherwise the directory name
    pub name: String,
    #[source]
    pub error: CheckError,
}

pub type DeviceResult = std::result::Result<Device, DeviceError>;

#[derive(Debug, Clone)]
pub struct HwmonReader {
    root: PathBuf,
}

impl Default for HwmonReader {
    fn default() -> Self {
        Self::new(SYSFS_HWMON)
    }
}

impl HwmonReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// One result per hwmon entry, sorted by directory. A missing hwmon
    /// class yields no devices; an unreadable entry only fails itself.
    pub fn devices(&self) -> Result<Vec<DeviceResult>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CheckError::metric_collection(format!(
                    "could not list {}: {}",
                    self.root.display(),
                    e
                )))
            }
        };

        // hwmonN entries are symlinks into /sys/devices, so they are not
        // filtered by file type here
        let mut dirs: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect();
        dirs.sort();

        let devices: Vec<DeviceResult> = dirs
            .into_iter()
            .map(|dir| {
                read_device(&dir).map_err(|error| {
                    log::warn!("Skipping hwmon device {}: {}", dir.display(), error);
                    DeviceError {
                        name: device_name(&dir),
                        dir,
                        error,
                    }
                })
            })
            .collect();
        log::debug!("Detected {} hwmon devices", devices.len());
        Ok(devices)
    }
}

fn device_name(dir: &Path) -> String {
    read_string(&dir.join("name")).unwrap_or_else(|| {
        dir.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    })
}

fn read_device(dir: &Path) -> Result<Device> {
    let name = device_name(dir);

    let files: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();

    let bases: BTreeSet<(SensorKind, u32)> = files
        .iter()
        .filter_map(|f| SensorKind::parse_attribute(f))
        .collect();

    let sensors = bases
        .into_iter()
        .filter_map(|(kind, index)| {
            let base = format!("{}{}", kind.prefix(), index);
            let sensor = read_sensor(dir, &name, &files, kind, &base);
            if sensor.is_none() {
                log::debug!("Skipping {} of {}: no readable value", base, name);
            }
            sensor
        })
        .collect();

    Ok(Device { name, sensors })
}

fn read_sensor(dir: &Path, device: &str, files: &[String], kind: SensorKind, base: &str) -> Option<Sensor> {
    let attr = |suffix: &str| read_int(&dir.join(format!("{}{}", base, suffix)));
    let scaled = |suffix: &str| attr(suffix).map(|v| v as f64 / kind.divisor());

    let value = scaled(kind.input_suffix())?;
    let label = read_string(&dir.join(format!("{}_label", base)))
        .unwrap_or_else(|| format!("{}_{}", device, base));

    let mut sensor = Sensor {
        label,
        kind,
        value,
        warn: None,
        crit: None,
        min: None,
        max: None,
        alarm: false,
    };

    match kind {
        SensorKind::Temperature | SensorKind::Voltage | SensorKind::Current => {
            sensor.warn = scaled("_max").and_then(|max| Threshold::new(f64::NEG_INFINITY, max, false).ok());
            let upper = if kind == SensorKind::Temperature {
                scaled("_emergency").or_else(|| scaled("_crit"))
            } else {
                scaled("_crit")
            };
            let lower = scaled("_lcrit").or_else(|| scaled("_min"));
            if upper.is_some() || lower.is_some() {
                sensor.crit = Threshold::new(
                    lower.unwrap_or(f64::NEG_INFINITY),
                    upper.unwrap_or(f64::INFINITY),
                    false,
                )
                .ok();
            }
            sensor.min = scaled("_lowest");
            sensor.max = scaled("_highest");
        }
        SensorKind::Power => {
            sensor.warn = scaled("_cap").and_then(|cap| Threshold::upto(cap).ok());
            sensor.crit = scaled("_crit").and_then(|crit| Threshold::upto(crit).ok());
            sensor.min = scaled("_input_lowest");
            sensor.max = scaled("_input_highest");
        }
        SensorKind::Fan => {
            sensor.min = Some(0.0);
            sensor.max = scaled("_max");
        }
        SensorKind::Energy | SensorKind::Humidity | SensorKind::Pwm => {}
    }

    let alarm_prefix = format!("{}_", base);
    sensor.alarm = files
        .iter()
        .filter(|f| f.starts_with(&alarm_prefix) && f.ends_with("_alarm"))
        .any(|f| read_int(&dir.join(f)).is_some_and(|v| v != 0));

    Some(sensor)
}

fn read_string(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim_end_matches('\n').to_string())
        .filter(|s| !s.is_empty())
}

fn read_int(path: &Path) -> Option<i64> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}
