use anyhow::Result;
use clap::{ArgMatches, Command};

use crate::checks::sensors::{self, SensorsConfig};
use crate::core::Overall;
use crate::platform::HwmonReader;

use super::{include_exclude, pattern_arg, run_blocking};

pub fn command() -> Command {
    Command::new("sensors")
        .about("Check the hardware sensors exposed in /sys/class/hwmon")
        .long_about(
            "Check the hardware sensors exposed in /sys/class/hwmon.\n\n\
             The limits come from the sensor drivers: an alarm or a violated \
             critical limit is CRITICAL, a violated maximum is WARNING.",
        )
        .arg(pattern_arg("include-device-name", "Only check devices whose name matches"))
        .arg(pattern_arg("exclude-device-name", "Ignore devices whose name matches"))
        .arg(pattern_arg("include-sensor-label", "Only check sensors whose label matches"))
        .arg(pattern_arg("exclude-sensor-label", "Ignore sensors whose label matches"))
}

pub fn config(matches: &ArgMatches) -> Result<SensorsConfig> {
    Ok(SensorsConfig {
        devices: include_exclude(matches, "include-device-name", "exclude-device-name")?,
        sensors: include_exclude(matches, "include-sensor-label", "exclude-sensor-label")?,
    })
}

pub async fn execute(matches: &ArgMatches) -> Result<Overall> {
    let config = config(matches)?;
    run_blocking(move || sensors::run(&config, &HwmonReader::default())).await
}
