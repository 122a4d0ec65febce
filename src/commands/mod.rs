// Command line surface: one subcommand per check
pub mod files;
pub mod filesystem;
pub mod icinga2;
pub mod load;
pub mod memory;
pub mod netdev;
pub mod psi;
pub mod sensors;

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::core::{IncludeExclude, Overall, Threshold, Thresholds};
use crate::error::CheckError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The full command tree of `check_sysbasics`
pub fn cli() -> Command {
    Command::new("check_sysbasics")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Monitoring plugin checking basic properties of the local system")
        .arg_required_else_help(true)
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Timeout for the check")
                .value_parser(clap::value_parser!(u64))
                .default_value("30")
                .global(true),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("dump-icinga2-config")
                .long("dump-icinga2-config")
                .help("Dump icinga2 config for this plugin")
                .action(ArgAction::SetTrue),
        )
        .subcommand(filesystem::command())
        .subcommand(memory::command())
        .subcommand(load::command())
        .subcommand(netdev::command())
        .subcommand(psi::command())
        .subcommand(sensors::command())
        .subcommand(files::command())
}

/// Run the selected subcommand
pub async fn execute(matches: &ArgMatches, timeout: Duration) -> Result<Overall> {
    match matches.subcommand() {
        Some(("filesystem", sub_matches)) => filesystem::execute(sub_matches, timeout).await,
        Some(("memory", sub_matches)) => memory::execute(sub_matches).await,
        Some(("load", sub_matches)) => load::execute(sub_matches).await,
        Some(("netdev", sub_matches)) => netdev::execute(sub_matches).await,
        Some(("psi", sub_matches)) => psi::execute(sub_matches).await,
        Some(("sensors", sub_matches)) => sensors::execute(sub_matches).await,
        Some(("files", sub_matches)) => files::execute(sub_matches).await,
        Some((other, _)) => Err(anyhow!("Unknown subcommand '{}'", other)),
        None => Err(anyhow!("No subcommand given, see --help")),
    }
}

/// Run a synchronous check on the blocking pool so the global timer can fire
pub(crate) async fn run_blocking<T, F>(check: F) -> Result<T>
where
    F: FnOnce() -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(check)
        .await
        .context("Check worker failed")??;
    Ok(result)
}

pub(crate) fn threshold_arg(id: impl Into<String>, help: impl Into<String>) -> Arg {
    let id = id.into();
    Arg::new(id.clone())
        .long(id)
        .value_name("RANGE")
        .help(help.into())
        .value_parser(clap::value_parser!(Threshold))
}

pub(crate) fn threshold(matches: &ArgMatches, id: &str) -> Option<Threshold> {
    matches.get_one::<Threshold>(id).copied()
}

pub(crate) fn thresholds(matches: &ArgMatches, warn_id: &str, crit_id: &str) -> Thresholds {
    Thresholds::new(threshold(matches, warn_id), threshold(matches, crit_id))
}

/// Repeatable, comma separated list of regular expressions
pub(crate) fn pattern_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .value_name("REGEX")
        .help(help)
        .action(ArgAction::Append)
        .value_delimiter(',')
}

pub(crate) fn switch_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).help(help).action(ArgAction::SetTrue)
}

pub(crate) fn patterns(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Read an include/exclude flag pair and reject invalid expressions early
pub(crate) fn include_exclude(matches: &ArgMatches, include_id: &str, exclude_id: &str) -> Result<IncludeExclude> {
    let filter = IncludeExclude::new(patterns(matches, include_id), patterns(matches, exclude_id));
    filter.validate().map_err(CheckError::from)?;
    Ok(filter)
}
