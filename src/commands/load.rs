use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::checks::load::{self, LoadConfig};
use crate::core::Overall;

use super::{run_blocking, threshold_arg, thresholds};

pub fn command() -> Command {
    let mut cmd = Command::new("load").about("Check the current system load average");
    for minutes in [1, 5, 15] {
        cmd = cmd
            .arg(threshold_arg(
                format!("load{}-warning", minutes),
                format!("Warning threshold for the load {} minute average", minutes),
            ))
            .arg(threshold_arg(
                format!("load{}-critical", minutes),
                format!("Critical threshold for the load {} minute average", minutes),
            ));
    }
    cmd.arg(
        Arg::new("per-cpu")
            .short('p')
            .long("per-cpu")
            .help("Divide the load averages by the number of CPUs")
            .action(ArgAction::SetTrue),
    )
}

pub fn config(matches: &ArgMatches) -> LoadConfig {
    LoadConfig {
        load1: thresholds(matches, "load1-warning", "load1-critical"),
        load5: thresholds(matches, "load5-warning", "load5-critical"),
        load15: thresholds(matches, "load15-warning", "load15-critical"),
        per_cpu: matches.get_flag("per-cpu"),
    }
}

pub async fn execute(matches: &ArgMatches) -> Result<Overall> {
    let config = config(matches);
    run_blocking(move || load::run(&config)).await
}
