use std::time::Duration;

use clap::error::ErrorKind;

use sysbasics::commands::{self, icinga2};
use sysbasics::core::Threshold;

#[test]
fn test_command_tree_is_consistent() {
    commands::cli().debug_assert();
}

#[test]
fn test_every_check_is_a_subcommand() {
    let cli = commands::cli();
    let names: Vec<&str> = cli.get_subcommands().map(|s| s.get_name()).collect();
    assert_eq!(
        names,
        vec!["filesystem", "memory", "load", "netdev", "psi", "sensors", "files"]
    );
}

#[test]
fn test_no_arguments_prints_help() {
    let err = commands::cli().try_get_matches_from(["check_sysbasics"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand);
}

#[test]
fn test_invalid_threshold_is_a_usage_error() {
    let err = commands::cli()
        .try_get_matches_from(["check_sysbasics", "load", "--load1-critical", "20:10"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}

#[test]
fn test_timeout_after_subcommand() {
    let matches = commands::cli()
        .try_get_matches_from(["check_sysbasics", "memory", "--timeout", "5"])
        .unwrap();
    assert_eq!(matches.get_one::<u64>("timeout"), Some(&5));
}

#[test]
fn test_load_thresholds_reach_the_check_config() {
    let matches = commands::cli()
        .try_get_matches_from(["check_sysbasics", "load", "--load5-warning", "4", "--per-cpu"])
        .unwrap();
    let (_, sub) = matches.subcommand().unwrap();
    let config = commands::load::config(sub);
    assert!(config.per_cpu);
    assert_eq!(config.load5.warn, Threshold::parse("4").ok());
    assert_eq!(config.load1.warn, None);
}

#[test]
fn test_filesystem_modes_are_exclusive() {
    let matches = commands::cli()
        .try_get_matches_from([
            "check_sysbasics",
            "filesystem",
            "--readonly-filesystems",
            "--readwrite-filesystems",
        ])
        .unwrap();
    let (_, sub) = matches.subcommand().unwrap();
    let err = commands::filesystem::config(sub).unwrap_err();
    assert!(err.to_string().contains("mutually exclusive"));
}

#[tokio::test]
async fn test_invalid_filter_pattern_fails_the_run() {
    let matches = commands::cli()
        .try_get_matches_from(["check_sysbasics", "netdev", "--include-interface-name", "eth("])
        .unwrap();
    assert!(commands::execute(&matches, Duration::from_secs(5)).await.is_err());
}

#[test]
fn test_icinga2_dump() {
    let config = icinga2::render(&commands::cli());
    assert_eq!(config.matches("object CheckCommand").count(), 8);
    assert!(config.contains("command = [ PluginContribDir + \"/check_sysbasics\" ]"));
    assert!(config.contains("\"--base-path\" = {\n\t\t\tvalue = \"$system_basics_files_base_path$\""));
    assert!(config.contains("\"--include-io\" = {\n\t\t\tset_if = \"$system_basics_psi_include_io$\""));
}
