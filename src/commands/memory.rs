use anyhow::Result;
use clap::{ArgMatches, Command};

use crate::checks::memory::{self, AmountThresholds, MemoryConfig};
use crate::core::Overall;

use super::{run_blocking, switch_arg, threshold_arg, thresholds};

// (flag prefix, description, default warn%, default crit%)
const AMOUNTS: [(&str, &str, Option<&str>, Option<&str>); 5] = [
    ("memory-available", "available memory", Some("15:"), Some("5:")),
    ("memory-free", "free memory", None, None),
    ("memory-used", "used memory", None, None),
    ("swap-free", "free swap", None, None),
    ("swap-used", "used swap", Some("20"), Some("85")),
];

pub fn command() -> Command {
    let mut cmd = Command::new("memory").about("Check the current memory and swap usage");

    for (prefix, name, warn_default, crit_default) in AMOUNTS {
        cmd = cmd
            .arg(threshold_arg(format!("{}-warning", prefix), format!("Warning threshold for {} in bytes", name)))
            .arg(threshold_arg(format!("{}-critical", prefix), format!("Critical threshold for {} in bytes", name)));

        let mut warn = threshold_arg(
            format!("{}-warning-percentage", prefix),
            format!("Warning threshold for {} in percent", name),
        );
        if let Some(default) = warn_default {
            warn = warn.default_value(default);
        }
        let mut crit = threshold_arg(
            format!("{}-critical-percentage", prefix),
            format!("Critical threshold for {} in percent", name),
        );
        if let Some(default) = crit_default {
            crit = crit.default_value(default);
        }
        cmd = cmd.arg(warn).arg(crit);
    }

    cmd.arg(switch_arg(
        "percentage-in-perfdata",
        "Add computed percentage values to perfdata, although they are technically redundant",
    ))
}

fn amount(matches: &ArgMatches, prefix: &str) -> AmountThresholds {
    AmountThresholds {
        absolute: thresholds(matches, &format!("{}-warning", prefix), &format!("{}-critical", prefix)),
        percent: thresholds(
            matches,
            &format!("{}-warning-percentage", prefix),
            &format!("{}-critical-percentage", prefix),
        ),
    }
}

pub fn config(matches: &ArgMatches) -> MemoryConfig {
    MemoryConfig {
        available: amount(matches, "memory-available"),
        free: amount(matches, "memory-free"),
        used: amount(matches, "memory-used"),
        swap_free: amount(matches, "swap-free"),
        swap_used: amount(matches, "swap-used"),
        percentage_in_perfdata: matches.get_flag("percentage-in-perfdata"),
    }
}

pub async fn execute(matches: &ArgMatches) -> Result<Overall> {
    let config = config(matches);
    run_blocking(move || memory::run(&config)).await
}
