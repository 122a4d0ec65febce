// Formatting helpers for check messages

pub mod formatters;

// Re-export commonly used items for cleaner imports
pub use formatters::{format_duration, format_percent, format_size, format_time};
