//! Filesystem usage check.
//!
//! Mounts are filtered by type, device, mount point and mount options, then
//! each remaining mount is probed with `statvfs` on its own blocking worker
//! with a per-mount time budget, so a hanging network filesystem only turns
//! its own node UNKNOWN.

use std::time::Duration;

use futures_util::future::join_all;

use crate::core::{IncludeExclude, MatchError, Overall, Perfdata, ResultNode, Status, Threshold, Thresholds};
use crate::error::{CheckError, Result};
use crate::platform::mounts::{self, Mount, Usage};
use crate::ui::{format_percent, format_size};

use super::{count_message, Measurement};

pub const DEFAULT_INCLUDE_FS_TYPES: [&str; 9] = [
    "^ext2$",
    "^ext3$",
    "^ext4$",
    "^btrfs$",
    "^nfs$",
    "^ntfs$",
    "^reiserfs$",
    "^xfs$",
    "^zfs$",
];

/// Filesystems that allocate a fixed number of inodes at creation time
pub const FIXED_INODE_FILESYSTEMS: [&str; 4] = ["bfs", "ext2", "ext3", "ext4"];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FreeUsed {
    pub free: Thresholds,
    pub used: Thresholds,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UsageThresholds {
    pub space: FreeUsed,
    pub inodes: FreeUsed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilesystemFilters {
    pub fs_type: IncludeExclude,
    pub device: IncludeExclude,
    pub mount_point: IncludeExclude,
    /// Matches if any single mount option matches
    pub options: IncludeExclude,
}

impl FilesystemFilters {
    pub fn validate(&self) -> std::result::Result<(), MatchError> {
        self.fs_type.validate()?;
        self.device.validate()?;
        self.mount_point.validate()?;
        self.options.validate()
    }

    pub fn apply(&self, mounts: &[Mount]) -> std::result::Result<Vec<Mount>, MatchError> {
        let mounts = self.fs_type.apply(mounts, |m| m.fs_type.as_str())?;
        let mounts = self.device.apply(&mounts, |m| m.device.as_str())?;
        let mounts = self.mount_point.apply(&mounts, |m| m.mount_point.as_str())?;
        self.options
            .apply_any(&mounts, |m| m.options.iter().map(String::as_str).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilesystemConfig {
    pub absolute: UsageThresholds,
    pub percent: UsageThresholds,
    /// Thresholds on the number of mounts left after filtering
    pub count: Thresholds,
    pub filters: FilesystemFilters,
}

impl Default for FilesystemConfig {
    fn default() -> Self {
        let range = |s: &str| Threshold::parse(s).ok();
        let mut percent = UsageThresholds::default();
        percent.space.free = Thresholds::new(range("5:100"), range("2:100"));
        percent.inodes.used = Thresholds::new(range("98"), range("99"));

        Self {
            absolute: UsageThresholds::default(),
            percent,
            count: Thresholds::default(),
            filters: FilesystemFilters {
                fs_type: IncludeExclude::new(
                    DEFAULT_INCLUDE_FS_TYPES.iter().map(|s| s.to_string()).collect(),
                    Vec::new(),
                ),
                ..Default::default()
            },
        }
    }
}

impl FilesystemConfig {
    /// Restrict to read-only or read-write mounts; both at once is a conflict
    pub fn restrict_access_mode(&mut self, readonly: bool, readwrite: bool) -> Result<()> {
        match (readonly, readwrite) {
            (true, true) => Err(CheckError::config(
                "readonly and readwrite options are mutually exclusive. Please remove one of them",
            )),
            (true, false) => {
                self.filters.options.include.push("^ro$".to_string());
                Ok(())
            }
            (false, true) => {
                self.filters.options.include.push("^rw$".to_string());
                Ok(())
            }
            (false, false) => Ok(()),
        }
    }
}

/// A mount together with the outcome of its usage probe
#[derive(Debug, Clone)]
pub struct ProbedMount {
    pub mount: Mount,
    pub usage: std::result::Result<Usage, String>,
}

/// Probe all mounts concurrently; each gets `budget / mounts.len()`
pub async fn probe(mounts: Vec<Mount>, budget: Duration) -> Vec<ProbedMount> {
    let per_mount = budget / u32::try_from(mounts.len().max(1)).unwrap_or(u32::MAX);
    log::debug!("Probing {} filesystems, {:?} each", mounts.len(), per_mount);
    join_all(mounts.into_iter().map(|mount| probe_one(mount, per_mount))).await
}

async fn probe_one(mount: Mount, timeout: Duration) -> ProbedMount {
    let path = mount.mount_point.clone();
    let task = tokio::task::spawn_blocking(move || mounts::usage(&path));

    let usage = match tokio::time::timeout(timeout, task).await {
        Ok(Ok(Ok(usage))) => Ok(usage),
        Ok(Ok(Err(e))) => Err(e.to_string()),
        Ok(Err(e)) => Err(format!("usage probe failed: {}", e)),
        Err(_) => {
            log::warn!("statvfs on {} did not return within {:?}", mount.mount_point, timeout);
            Err(format!(
                "Timeout exceeded for fs {}. Maybe hanging network filesystem?",
                mount.mount_point
            ))
        }
    };
    ProbedMount { mount, usage }
}

/// Read the mount table, filter it and evaluate every remaining filesystem
pub async fn run(config: &FilesystemConfig, budget: Duration) -> Result<Overall> {
    let all = match mounts::read_mounts() {
        Ok(all) => all,
        Err(e) => {
            let mut overall = Overall::new();
            overall.add(Status::Unknown, e.to_string());
            return Ok(overall);
        }
    };

    let filtered = config.filters.apply(&all)?;
    log::debug!(
        "Filesystems after filtering: {:?}",
        filtered.iter().map(|m| m.mount_point.as_str()).collect::<Vec<_>>()
    );

    let probed = probe(filtered, budget).await;
    Ok(evaluate(&probed, config))
}

pub fn evaluate(probed: &[ProbedMount], config: &FilesystemConfig) -> Overall {
    let mut overall = Overall::new();

    if config.count.is_set() {
        let status = config.count.evaluate(probed.len() as f64);
        let message = count_message(probed.len(), "filesystem", "filesystems", &config.count);
        overall.add(status, message);
    } else if probed.is_empty() {
        overall.add(
            Status::Ok,
            "No filesystems remaining after applying filter expressions. Therefore all are OK",
        );
        return overall;
    }

    for p in probed {
        overall.add_subcheck(evaluate_mount(p, config));
    }
    overall
}

pub fn evaluate_mount(probed: &ProbedMount, config: &FilesystemConfig) -> ResultNode {
    let mount = &probed.mount;
    let usage = match &probed.usage {
        Ok(usage) => usage,
        Err(reason) => {
            return ResultNode::with_status(
                Status::Unknown,
                format!(
                    "Could not determine status of the filesystem mounted at {} ({}): {}",
                    mount.mount_point, mount.device, reason
                ),
            );
        }
    };

    let message = if usage.inodes_total > 0 {
        format!(
            "{} ({:.2}% used space, {:.2}% free inodes)",
            mount.mount_point,
            usage.used_percent(),
            usage.inodes_free_percent()
        )
    } else {
        format!("{} ({:.2}% used space)", mount.mount_point, usage.used_percent())
    };

    let mut node = ResultNode::new(message);
    node.add_child(space_node(mount, usage, config));
    if FIXED_INODE_FILESYSTEMS.contains(&mount.fs_type.as_str()) {
        node.add_child(inodes_node(mount, usage, config));
    }
    node
}

fn space_node(mount: &Mount, usage: &Usage, config: &FilesystemConfig) -> ResultNode {
    let label = |suffix: &str| format!("{}_space_{}", mount.mount_point, suffix);
    let total = format_size(usage.total);
    let mut node = ResultNode::new("Space usage");

    Measurement::new(
        "Absolute free space",
        format!("{} / {}", format_size(usage.free), total),
        usage.free as f64,
        config.absolute.space.free,
        Perfdata::new(label("free"), usage.free).uom("B").min(0u64).max(usage.total),
    )
    .attach_to(&mut node);

    Measurement::new(
        "Absolute used space",
        format!("{} / {}", format_size(usage.used), total),
        usage.used as f64,
        config.absolute.space.used,
        Perfdata::new(label("used"), usage.used).uom("B").min(0u64).max(usage.total),
    )
    .attach_to(&mut node);

    Measurement::new(
        "Percentage of free space",
        format_percent(usage.free_percent()),
        usage.free_percent(),
        config.percent.space.free,
        Perfdata::new(label("free_percentage"), usage.free_percent()).uom("%"),
    )
    .attach_to(&mut node);

    Measurement::new(
        "Percentage of used space",
        format_percent(usage.used_percent()),
        usage.used_percent(),
        config.percent.space.used,
        Perfdata::new(label("used_percentage"), usage.used_percent()).uom("%"),
    )
    .attach_to(&mut node);

    node
}

fn inodes_node(mount: &Mount, usage: &Usage, config: &FilesystemConfig) -> ResultNode {
    let label = |suffix: &str| format!("{}_inodes_{}", mount.mount_point, suffix);
    let mut node = ResultNode::new("Inodes");

    Measurement::new(
        "Absolute number of free inodes",
        format!("{} / {}", usage.inodes_free, usage.inodes_total),
        usage.inodes_free as f64,
        config.absolute.inodes.free,
        Perfdata::new(label("free"), usage.inodes_free).min(0u64).max(usage.inodes_total),
    )
    .attach_to(&mut node);

    Measurement::new(
        "Absolute number of used inodes",
        format!("{} / {}", usage.inodes_used, usage.inodes_total),
        usage.inodes_used as f64,
        config.absolute.inodes.used,
        Perfdata::new(label("used"), usage.inodes_used).min(0u64).max(usage.inodes_total),
    )
    .attach_to(&mut node);

    Measurement::new(
        "Percentage of free inodes",
        format_percent(usage.inodes_free_percent()),
        usage.inodes_free_percent(),
        config.percent.inodes.free,
        Perfdata::new(label("free_percentage"), usage.inodes_free_percent()).uom("%"),
    )
    .attach_to(&mut node);

    Measurement::new(
        "Percentage of used inodes",
        format_percent(usage.inodes_used_percent()),
        usage.inodes_used_percent(),
        config.percent.inodes.used,
        Perfdata::new(label("used_percentage"), usage.inodes_used_percent()).uom("%"),
    )
    .attach_to(&mut node);

    node
}
