//! Memory and swap usage check.

use crate::core::{Overall, Perfdata, ResultNode, Status, Threshold, Thresholds};
use crate::error::Result;
use crate::platform::system::{self, MemoryStats};
use crate::ui::format_size;

/// Thresholds on a byte amount and on its share of the total
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AmountThresholds {
    pub absolute: Thresholds,
    pub percent: Thresholds,
}

impl AmountThresholds {
    fn evaluate(&self, amount: u64, percent: f64) -> Status {
        self.absolute
            .evaluate(amount as f64)
            .worst(self.percent.evaluate(percent))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryConfig {
    pub available: AmountThresholds,
    pub free: AmountThresholds,
    pub used: AmountThresholds,
    pub swap_free: AmountThresholds,
    pub swap_used: AmountThresholds,
    pub percentage_in_perfdata: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        let range = |s: &str| Threshold::parse(s).ok();
        Self {
            available: AmountThresholds {
                absolute: Thresholds::default(),
                percent: Thresholds::new(range("15:"), range("5:")),
            },
            free: AmountThresholds::default(),
            used: AmountThresholds::default(),
            swap_free: AmountThresholds::default(),
            swap_used: AmountThresholds {
                absolute: Thresholds::default(),
                percent: Thresholds::new(range("20"), range("85")),
            },
            percentage_in_perfdata: false,
        }
    }
}

fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

pub fn run(config: &MemoryConfig) -> Result<Overall> {
    match system::memory() {
        Ok(stats) => Ok(evaluate(&stats, config)),
        Err(e) => {
            log::warn!("Could not read memory statistics: {}", e);
            let mut overall = Overall::new();
            overall.add(Status::Unknown, e.to_string());
            Ok(overall)
        }
    }
}

pub fn evaluate(stats: &MemoryStats, config: &MemoryConfig) -> Overall {
    let mut overall = Overall::new();
    overall.add_subcheck(ram_node(stats, config));
    if stats.swap_total > 0 {
        overall.add_subcheck(swap_node(stats, config));
    }
    overall
}

fn ram_node(stats: &MemoryStats, config: &MemoryConfig) -> ResultNode {
    let mut node = ResultNode::new("RAM");
    let parts = [
        ("Available Memory", "available_memory", stats.available, &config.available),
        ("Free Memory", "free_memory", stats.free, &config.free),
        ("Used Memory", "used_memory", stats.used, &config.used),
    ];

    for (title, label, amount, thresholds) in parts {
        let percent = percent_of(amount, stats.total);
        let mut child = ResultNode::with_status(
            thresholds.evaluate(amount, percent),
            format!(
                "{} ({}/{}, {:.2}%)",
                title,
                format_size(amount),
                format_size(stats.total),
                percent
            ),
        );
        child.add_perfdata(
            Perfdata::new(label, amount)
                .uom("B")
                .warn(thresholds.absolute.warn)
                .crit(thresholds.absolute.crit)
                .min(0u64)
                .max(stats.total),
        );
        if config.percentage_in_perfdata {
            child.add_perfdata(
                Perfdata::new(format!("{}_percentage", label), percent)
                    .uom("%")
                    .warn(thresholds.percent.warn)
                    .crit(thresholds.percent.crit),
            );
        }
        node.add_child(child);
    }
    node
}

fn swap_node(stats: &MemoryStats, config: &MemoryConfig) -> ResultNode {
    let used_percent = percent_of(stats.swap_used, stats.swap_total);
    let free_percent = percent_of(stats.swap_free, stats.swap_total);

    let status = config
        .swap_free
        .evaluate(stats.swap_free, free_percent)
        .worst(config.swap_used.evaluate(stats.swap_used, used_percent));

    let mut node = ResultNode::with_status(
        status,
        format!(
            "Swap Usage {:.2}% ({} / {})",
            used_percent,
            format_size(stats.swap_used),
            format_size(stats.swap_total)
        ),
    );
    if config.percentage_in_perfdata {
        node.add_perfdata(
            Perfdata::new("swap_usage_percentage", used_percent)
                .uom("%")
                .warn(config.swap_used.percent.warn)
                .crit(config.swap_used.percent.crit),
        );
    }
    node.add_perfdata(
        Perfdata::new("swap_used", stats.swap_used)
            .uom("B")
            .warn(config.swap_used.absolute.warn)
            .crit(config.swap_used.absolute.crit)
            .min(0u64)
            .max(stats.swap_total),
    );
    node
}
