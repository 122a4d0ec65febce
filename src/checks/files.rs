//! File count and size check below a base directory.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use crate::core::{IncludeExclude, MatchError, Overall, Perfdata, ResultNode, Status, Threshold, Thresholds};
use crate::error::Result;
use crate::platform::file_scanner::{FileKind, FileScanner, ScanEntry, ScanReport};
use crate::ui::{format_duration, format_size, format_time};

use super::Measurement;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilesConfig {
    pub base_path: PathBuf,
    pub recursive: bool,
    /// Regex filters on the file name
    pub names: IncludeExclude,
    /// Empty keeps every type
    pub include_types: Vec<FileKind>,
    pub exclude_types: Vec<FileKind>,
    /// Keep only entries whose size lies within this range
    pub size_include: Option<Threshold>,
    /// Drop entries whose size lies within this range
    pub size_exclude: Option<Threshold>,
    pub older_than: Option<Duration>,
    pub younger_than: Option<Duration>,
    pub count: Thresholds,
    pub total_size: Thresholds,
}

pub fn run(config: &FilesConfig) -> Result<Overall> {
    let scanner = match FileScanner::new(&config.base_path) {
        Ok(scanner) => scanner.recursive(config.recursive),
        Err(e) => {
            let mut overall = Overall::new();
            overall.add(Status::Unknown, e.to_string());
            return Ok(overall);
        }
    };

    let report = scanner.scan();
    let matching = filter_entries(&report.entries, config, SystemTime::now())?;
    let mut overall = Overall::new();
    overall.add_subcheck(evaluate(&report, &matching, config));
    Ok(overall)
}

/// Apply name, type, size and age filters in that order
pub fn filter_entries(
    entries: &[ScanEntry],
    config: &FilesConfig,
    now: SystemTime,
) -> std::result::Result<Vec<ScanEntry>, MatchError> {
    let named = config.names.apply(entries, |e| e.name.as_str())?;

    let older_cutoff = config.older_than.and_then(|d| now.checked_sub(d));
    let younger_cutoff = config.younger_than.and_then(|d| now.checked_sub(d));
    if let (Some(d), Some(cutoff)) = (config.older_than, older_cutoff) {
        log::debug!("Keeping entries older than {} (before {})", format_duration(d), format_time(cutoff));
    }
    if let (Some(d), Some(cutoff)) = (config.younger_than, younger_cutoff) {
        log::debug!("Keeping entries younger than {} (after {})", format_duration(d), format_time(cutoff));
    }

    Ok(named
        .into_iter()
        .filter(|e| config.include_types.is_empty() || config.include_types.iter().any(|k| e.is(*k)))
        .filter(|e| !config.exclude_types.iter().any(|k| e.is(*k)))
        .filter(|e| config.size_include.is_none_or(|t| !t.violates(e.size as f64)))
        .filter(|e| config.size_exclude.is_none_or(|t| t.violates(e.size as f64)))
        .filter(|e| older_cutoff.is_none_or(|cutoff| e.modified <= cutoff))
        .filter(|e| younger_cutoff.is_none_or(|cutoff| e.modified >= cutoff))
        .collect())
}

pub fn evaluate(report: &ScanReport, matching: &[ScanEntry], config: &FilesConfig) -> ResultNode {
    let count = matching.len() as u64;
    let total: u64 = matching.iter().map(|e| e.size).sum();

    let mut node = ResultNode::new(format!(
        "{}: {} matching files, {}",
        config.base_path.display(),
        count,
        format_size(total)
    ));

    Measurement::new(
        "Number of matching files",
        count.to_string(),
        count as f64,
        config.count,
        Perfdata::new("count", count).min(0u64),
    )
    .attach_to(&mut node);

    Measurement::new(
        "Total size of matching files",
        format_size(total),
        total as f64,
        config.total_size,
        Perfdata::new("total_size", total).uom("B").min(0u64),
    )
    .attach_to(&mut node);

    if let Some(first) = report.errors.first() {
        node.add_child(ResultNode::with_status(
            Status::Unknown,
            format!(
                "Could not read {} entries below {}: {}",
                report.errors.len(),
                config.base_path.display(),
                first
            ),
        ));
    }
    node
}
