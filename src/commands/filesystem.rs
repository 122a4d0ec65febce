use std::time::Duration;

use anyhow::Result;
use clap::{ArgMatches, Command};

use crate::checks::filesystem::{self, FilesystemConfig, FilesystemFilters, FreeUsed, UsageThresholds};
use crate::core::Overall;

use super::{include_exclude, pattern_arg, switch_arg, threshold_arg, thresholds};

const MEASURES: [(&str, &str); 4] = [
    ("free-space", "free space"),
    ("used-space", "used space"),
    ("free-inodes", "free inodes"),
    ("used-inodes", "used inodes"),
];

pub fn command() -> Command {
    let mut cmd = Command::new("filesystem")
        .visible_alias("fs")
        .about("Check the usage of mounted filesystems")
        .long_about(
            "Check free and used space and inodes of mounted filesystems.\n\n\
             Every filesystem is probed on its own worker with a share of half the \
             global timeout, so a hanging network filesystem only makes its own \
             result UNKNOWN.",
        );

    for (level, level_name) in [("warning", "Warning"), ("critical", "Critical")] {
        for (kind, kind_name) in [("absolute", "absolute"), ("percent", "percentage")] {
            for (measure, measure_name) in MEASURES {
                let id = format!("{}-{}-{}", level, kind, measure);
                let mut arg = threshold_arg(id, format!("{} threshold for the {} of {}", level_name, kind_name, measure_name));
                if let Some(default) = default_threshold(level, kind, measure) {
                    arg = arg.default_value(default);
                }
                cmd = cmd.arg(arg);
            }
        }
    }

    cmd.arg(threshold_arg(
        "warning-total-count-of-matches",
        "Warning threshold for the number of filesystems left after filtering",
    ))
    .arg(threshold_arg(
        "critical-total-count-of-matches",
        "Critical threshold for the number of filesystems left after filtering",
    ))
    .arg(
        pattern_arg("include-fs-type", "Only check filesystems whose type matches (may be repeated)")
            .default_values(filesystem::DEFAULT_INCLUDE_FS_TYPES),
    )
    .arg(pattern_arg("exclude-fs-type", "Ignore filesystems whose type matches (may be repeated)"))
    .arg(pattern_arg("include-device-path", "Only check filesystems whose device path matches"))
    .arg(pattern_arg("exclude-device-path", "Ignore filesystems whose device path matches"))
    .arg(pattern_arg("include-mount-path", "Only check filesystems whose mount point matches"))
    .arg(pattern_arg("exclude-mount-path", "Ignore filesystems whose mount point matches"))
    .arg(pattern_arg("include-mount-options", "Only check filesystems with a mount option matching"))
    .arg(pattern_arg("exclude-mount-options", "Ignore filesystems with a mount option matching"))
    .arg(switch_arg("readonly-filesystems", "Only check filesystems mounted read-only"))
    .arg(switch_arg("readwrite-filesystems", "Only check filesystems mounted read-write"))
}

fn default_threshold(level: &str, kind: &str, measure: &str) -> Option<&'static str> {
    match (level, kind, measure) {
        ("warning", "percent", "free-space") => Some("5:100"),
        ("critical", "percent", "free-space") => Some("2:100"),
        ("warning", "percent", "used-inodes") => Some("98"),
        ("critical", "percent", "used-inodes") => Some("99"),
        _ => None,
    }
}

fn usage_thresholds(matches: &ArgMatches, kind: &str) -> UsageThresholds {
    let pair = |measure: &str| {
        thresholds(
            matches,
            &format!("warning-{}-{}", kind, measure),
            &format!("critical-{}-{}", kind, measure),
        )
    };
    UsageThresholds {
        space: FreeUsed {
            free: pair("free-space"),
            used: pair("used-space"),
        },
        inodes: FreeUsed {
            free: pair("free-inodes"),
            used: pair("used-inodes"),
        },
    }
}

pub fn config(matches: &ArgMatches) -> Result<FilesystemConfig> {
    let mut config = FilesystemConfig {
        absolute: usage_thresholds(matches, "absolute"),
        percent: usage_thresholds(matches, "percent"),
        count: thresholds(matches, "warning-total-count-of-matches", "critical-total-count-of-matches"),
        filters: FilesystemFilters {
            fs_type: include_exclude(matches, "include-fs-type", "exclude-fs-type")?,
            device: include_exclude(matches, "include-device-path", "exclude-device-path")?,
            mount_point: include_exclude(matches, "include-mount-path", "exclude-mount-path")?,
            options: include_exclude(matches, "include-mount-options", "exclude-mount-options")?,
        },
    };
    config.restrict_access_mode(
        matches.get_flag("readonly-filesystems"),
        matches.get_flag("readwrite-filesystems"),
    )?;
    Ok(config)
}

pub async fn execute(matches: &ArgMatches, timeout: Duration) -> Result<Overall> {
    let config = config(matches)?;
    log::debug!("Filesystem config: {:?}", config);
    Ok(filesystem::run(&config, timeout / 2).await?)
}
