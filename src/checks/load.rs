//! System load average check.

use crate::core::{Overall, Perfdata, ResultNode, Status, Thresholds};
use crate::error::Result;
use crate::platform::system::{self, LoadStats};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadConfig {
    pub load1: Thresholds,
    pub load5: Thresholds,
    pub load15: Thresholds,
    /// Divide every average by the number of logical CPUs
    pub per_cpu: bool,
}

pub fn run(config: &LoadConfig) -> Result<Overall> {
    Ok(from_reading(system::load(), config))
}

/// Evaluate a load reading; a failed reading becomes one UNKNOWN subcheck
pub fn from_reading(reading: Result<LoadStats>, config: &LoadConfig) -> Overall {
    match reading {
        Ok(stats) => evaluate(&stats, config),
        Err(e) => {
            log::warn!("Could not read load averages: {}", e);
            let mut overall = Overall::new();
            overall.add(Status::Unknown, e.to_string());
            overall
        }
    }
}

pub fn evaluate(stats: &LoadStats, config: &LoadConfig) -> Overall {
    let windows = [
        (1, "load1", stats.one, &config.load1),
        (5, "load5", stats.five, &config.load5),
        (15, "load15", stats.fifteen, &config.load15),
    ];

    let mut overall = Overall::new();
    for (minutes, label, total, thresholds) in windows {
        overall.add_subcheck(window_node(minutes, label, total, thresholds, stats.cpu_count, config.per_cpu));
    }
    overall
}

fn window_node(
    minutes: u32,
    label: &str,
    total: f64,
    thresholds: &Thresholds,
    cpu_count: usize,
    per_cpu: bool,
) -> ResultNode {
    let value = if per_cpu && cpu_count > 0 {
        total / cpu_count as f64
    } else {
        total
    };

    let status = thresholds.evaluate(value);
    let mut message = format!("{} minute average: {:.2}", minutes, value);
    match status {
        Status::Critical => message.push_str(" exceeds critical threshold"),
        Status::Warning => message.push_str(" exceeds warning threshold"),
        _ => {}
    }
    if per_cpu {
        message.push_str(&format!(", system total: {:.2}", total));
    }

    let mut node = ResultNode::with_status(status, message);
    node.add_perfdata(
        Perfdata::new(label, value)
            .warn(thresholds.warn)
            .crit(thresholds.crit)
            .min(0u64),
    );
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Threshold;
    use crate::error::CheckError;

    fn stats() -> LoadStats {
        LoadStats {
            one: 0.1,
            five: 4.0,
            fifteen: 8.0,
            cpu_count: 4,
        }
    }

    fn th(s: &str) -> Option<Threshold> {
        Some(Threshold::parse(s).unwrap())
    }

    #[test]
    fn test_without_thresholds_all_ok() {
        let overall = evaluate(&stats(), &LoadConfig::default());
        assert_eq!(overall.status(), Status::Ok);
        assert_eq!(overall.subchecks().len(), 3);
        assert_eq!(overall.subchecks()[0].message(), "1 minute average: 0.10");
        assert!(overall.output().ends_with("|load1=0.1;;;0 load5=4;;;0 load15=8;;;0\n"));
    }

    #[test]
    fn test_threshold_suffixes() {
        let config = LoadConfig {
            load5: Thresholds::new(th("2"), None),
            load15: Thresholds::new(th("2"), th("6")),
            ..Default::default()
        };
        let overall = evaluate(&stats(), &config);
        assert_eq!(overall.status(), Status::Critical);
        assert_eq!(
            overall.subchecks()[1].message(),
            "5 minute average: 4.00 exceeds warning threshold"
        );
        assert_eq!(
            overall.subchecks()[2].message(),
            "15 minute average: 8.00 exceeds critical threshold"
        );
        assert_eq!(overall.subchecks()[2].perfdata()[0].to_string(), "load15=8;2;6;0");
    }

    #[test]
    fn test_per_cpu() {
        let config = LoadConfig {
            load15: Thresholds::new(th("1"), None),
            per_cpu: true,
            ..Default::default()
        };
        let overall = evaluate(&stats(), &config);
        assert_eq!(
            overall.subchecks()[2].message(),
            "15 minute average: 2.00 exceeds warning threshold, system total: 8.00"
        );
        assert_eq!(overall.subchecks()[1].status(), Status::Ok);
    }

    #[test]
    fn test_failed_reading_is_unknown() {
        let reading = Err(CheckError::metric_collection("load average unavailable"));
        let overall = from_reading(reading, &LoadConfig::default());
        assert_eq!(overall.status(), Status::Unknown);
        assert_eq!(overall.exit_code(), 3);
        assert_eq!(
            overall.subchecks()[0].message(),
            "Metric collection failed: load average unavailable"
        );
    }
}
