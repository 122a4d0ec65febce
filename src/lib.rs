// sysbasics - basic system checks for monitoring

// Re-export error types
pub mod error;
pub use error::{CheckError, Result};

// Module declarations
pub mod checks;
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::{Overall, Status};

/// Initialize logging on stderr; stdout is reserved for the plugin output
pub fn init_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}
