use std::time::Duration;

use clap::error::ErrorKind;

use sysbasics::commands::{self, icinga2, DEFAULT_TIMEOUT_SECS};
use sysbasics::Status;

#[tokio::main]
async fn main() {
    let matches = match commands::cli().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    let _ = e.print();
                }
                _ => println!("[UNKNOWN] - {}", usage_error(&e)),
            }
            std::process::exit(Status::Unknown.exit_code());
        }
    };

    sysbasics::init_logging(matches.get_flag("debug"));

    if matches.get_flag("dump-icinga2-config") {
        print!("{}", icinga2::render(&commands::cli()));
        std::process::exit(0);
    }

    let seconds = matches
        .get_one::<u64>("timeout")
        .copied()
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let timeout = Duration::from_secs(seconds);

    let code = match tokio::time::timeout(timeout, commands::execute(&matches, timeout)).await {
        Ok(Ok(overall)) => {
            print!("{}", overall.output());
            overall.exit_code()
        }
        Ok(Err(e)) => {
            log::debug!("Check failed: {:?}", e);
            println!("[UNKNOWN] - {:#}", e);
            Status::Unknown.exit_code()
        }
        Err(_) => {
            println!("[UNKNOWN] - Timeout reached ({}s)", seconds);
            Status::Unknown.exit_code()
        }
    };

    // Exit right here: blocked filesystem probes must not keep the runtime alive
    std::process::exit(code);
}

/// First line of a clap error without its `error: ` prefix
fn usage_error(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}
