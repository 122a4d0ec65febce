use chrono::{DateTime, Local};
use humansize::{format_size as humansize_format, BINARY};
use std::time::{Duration, SystemTime};

/// Format a byte count with binary units (B, KiB, MiB, GiB, ...)
pub fn format_size(size: u64) -> String {
    humansize_format(size, BINARY)
}

/// Format a percentage with two decimals
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Format timestamp in human-readable format (YYYY-MM-DD HH:MM)
pub fn format_time(time: SystemTime) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.format("%Y-%m-%d %H:%M").to_string()
}

/// Format a duration the way it is accepted on the command line (e.g. `1h 10m`)
pub fn format_duration(duration: Duration) -> String {
    humantime::format_duration(duration).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_binary_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1 KiB");
        assert_eq!(format_size(31 * 1024 * 1024 * 1024), "31 GiB");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(74.3612), "74.36%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(4200)), "1h 10m");
    }
}
