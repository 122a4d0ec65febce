use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::checks::files::{self, FilesConfig};
use crate::core::Overall;
use crate::platform::FileKind;

use super::{include_exclude, pattern_arg, run_blocking, switch_arg, threshold, threshold_arg, thresholds};

fn type_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .value_name("TYPE")
        .help(help)
        .action(ArgAction::Append)
        .value_delimiter(',')
        .value_parser(clap::value_parser!(FileKind))
}

fn age_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .value_name("DURATION")
        .help(help)
        .value_parser(humantime::parse_duration)
}

pub fn command() -> Command {
    Command::new("files")
        .about("Check the number and size of files below a directory")
        .arg(
            Arg::new("base-path")
                .long("base-path")
                .value_name("DIR")
                .help("The directory which should be examined")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(switch_arg("recursive", "Descend recursively into subdirectories"))
        .arg(pattern_arg("include-file-name", "Only include entries whose name matches"))
        .arg(pattern_arg("exclude-file-name", "Exclude entries whose name matches"))
        .arg(type_arg("include-file-type", "Only include entries of this type or carrying this mode bit (sticky, setuid, setgid); by default all are included"))
        .arg(type_arg("exclude-file-type", "Exclude entries of this type"))
        .arg(threshold_arg(
            "file-size-include-filter",
            "Only include entries whose size in bytes lies within this range",
        ))
        .arg(threshold_arg(
            "file-size-exclude-filter",
            "Exclude entries whose size in bytes lies within this range",
        ))
        .arg(age_arg(
            "modification-time-older-than",
            "Only include entries modified before this long ago, e.g. 1h, 1h 10m, 20s",
        ))
        .arg(age_arg(
            "modification-time-younger-than",
            "Only include entries modified within this long ago, e.g. 1h, 1h 10m, 20s",
        ))
        .arg(threshold_arg("warning-count", "Warning threshold for the number of matching files"))
        .arg(threshold_arg("critical-count", "Critical threshold for the number of matching files"))
        .arg(threshold_arg("warning-total-size", "Warning threshold for the total size of matching files in bytes"))
        .arg(threshold_arg("critical-total-size", "Critical threshold for the total size of matching files in bytes"))
}

fn kinds(matches: &ArgMatches, id: &str) -> Vec<FileKind> {
    matches
        .get_many::<FileKind>(id)
        .map(|values| values.copied().collect())
        .unwrap_or_default()
}

pub fn config(matches: &ArgMatches) -> Result<FilesConfig> {
    Ok(FilesConfig {
        base_path: matches.get_one::<PathBuf>("base-path").cloned().unwrap_or_default(),
        recursive: matches.get_flag("recursive"),
        names: include_exclude(matches, "include-file-name", "exclude-file-name")?,
        include_types: kinds(matches, "include-file-type"),
        exclude_types: kinds(matches, "exclude-file-type"),
        size_include: threshold(matches, "file-size-include-filter"),
        size_exclude: threshold(matches, "file-size-exclude-filter"),
        older_than: matches.get_one::<Duration>("modification-time-older-than").copied(),
        younger_than: matches.get_one::<Duration>("modification-time-younger-than").copied(),
        count: thresholds(matches, "warning-count", "critical-count"),
        total_size: thresholds(matches, "warning-total-size", "critical-total-size"),
    })
}

pub async fn execute(matches: &ArgMatches) -> Result<Overall> {
    let config = config(matches)?;
    log::debug!("Files config: {:?}", config);
    run_blocking(move || files::run(&config)).await
}
