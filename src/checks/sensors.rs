//! Hardware sensor check.
//!
//! Sensors carry their own limits from the driver, so there are no
//! threshold flags here, only filters on device names and sensor labels.

use crate::core::{IncludeExclude, Overall, PerfValue, Perfdata, ResultNode, Status};
use crate::error::Result;
use crate::platform::hwmon::{DeviceResult, HwmonReader, Sensor};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorsConfig {
    pub devices: IncludeExclude,
    pub sensors: IncludeExclude,
}

pub fn run(config: &SensorsConfig, reader: &HwmonReader) -> Result<Overall> {
    let devices = match reader.devices() {
        Ok(devices) => devices,
        Err(e) => {
            let mut overall = Overall::new();
            overall.add(Status::Unknown, e.to_string());
            return Ok(overall);
        }
    };
    evaluate(&devices, config)
}

fn device_name(reading: &DeviceResult) -> &str {
    match reading {
        Ok(device) => &device.name,
        Err(e) => &e.name,
    }
}

/// Filter devices by name and build one subcheck per remaining device; an
/// unreadable device becomes its own UNKNOWN subcheck
pub fn evaluate(devices: &[DeviceResult], config: &SensorsConfig) -> Result<Overall> {
    let readings: Vec<&DeviceResult> = devices.iter().collect();
    let readings = config.devices.apply(&readings, |d| device_name(d))?;

    let mut overall = Overall::new();
    if readings.is_empty() {
        overall.add(Status::Unknown, "No devices found");
        return Ok(overall);
    }

    for reading in readings {
        let device = match reading {
            Ok(device) => device,
            Err(e) => {
                overall.add(Status::Unknown, e.to_string());
                continue;
            }
        };
        let sensors = config.sensors.apply(&device.sensors, |s| s.label.as_str())?;
        let mut node = ResultNode::new(device.name.clone());
        for sensor in &sensors {
            node.add_child(sensor_node(sensor));
        }
        overall.add_subcheck(node);
    }
    Ok(overall)
}

pub fn sensor_status(sensor: &Sensor) -> Status {
    if sensor.alarm {
        return Status::Critical;
    }
    if sensor.crit.is_some_and(|t| t.violates(sensor.value)) {
        return Status::Critical;
    }
    if sensor.warn.is_some_and(|t| t.violates(sensor.value)) {
        return Status::Warning;
    }
    Status::Ok
}

fn sensor_node(sensor: &Sensor) -> ResultNode {
    let status = sensor_status(sensor);
    let state = match status {
        Status::Critical if sensor.alarm => "Alarm!",
        Status::Critical => "Critical",
        Status::Warning => "Warning",
        _ => "Ok",
    };
    let uom = sensor.kind.uom();

    let mut node = ResultNode::with_status(
        status,
        format!("{}: {} - {}{}", sensor.label, state, PerfValue::Float(sensor.value), uom),
    );

    let mut point = Perfdata::new(sensor.label.clone(), sensor.value)
        .uom(uom)
        .warn(sensor.warn)
        .crit(sensor.crit);
    if let Some(min) = sensor.min {
        point = point.min(min);
    }
    if let Some(max) = sensor.max {
        point = point.max(max);
    }
    node.add_perfdata(point);
    node
}
