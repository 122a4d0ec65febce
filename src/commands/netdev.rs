use anyhow::Result;
use clap::{ArgMatches, Command};

use crate::checks::netdev::{self, NetdevConfig};
use crate::core::Overall;
use crate::platform::NetReader;

use super::{include_exclude, pattern_arg, run_blocking, switch_arg, threshold_arg, thresholds};

pub fn command() -> Command {
    Command::new("netdev")
        .about("Detect, display and check the network interfaces of the local machine")
        .arg(pattern_arg(
            "include-interface-name",
            "Only check interfaces whose name matches (may be repeated), e.g. 'eth' or '^et.*'",
        ))
        .arg(
            pattern_arg(
                "exclude-interface-name",
                "Ignore interfaces whose name matches (may be repeated)",
            )
            .default_value("^lo$"),
        )
        .arg(switch_arg("down-is-critical", "Report CRITICAL instead of WARNING for interfaces that are down"))
        .arg(switch_arg("unknown-is-ok", "Report OK for interfaces in state unknown"))
        .arg(switch_arg("not-up-is-ok", "Report OK regardless of the interface state"))
        .arg(threshold_arg("warning-total-count", "Warning threshold for the number of matching interfaces"))
        .arg(threshold_arg("critical-total-count", "Critical threshold for the number of matching interfaces"))
}

pub fn config(matches: &ArgMatches) -> Result<NetdevConfig> {
    Ok(NetdevConfig {
        names: include_exclude(matches, "include-interface-name", "exclude-interface-name")?,
        down_is_critical: matches.get_flag("down-is-critical"),
        unknown_is_ok: matches.get_flag("unknown-is-ok"),
        not_up_is_ok: matches.get_flag("not-up-is-ok"),
        count: thresholds(matches, "warning-total-count", "critical-total-count"),
    })
}

pub async fn execute(matches: &ArgMatches) -> Result<Overall> {
    let config = config(matches)?;
    run_blocking(move || netdev::run(&config, &NetReader::default())).await
}
