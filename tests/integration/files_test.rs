use std::fs;
use std::time::Duration;

use tempfile::TempDir;

use sysbasics::checks::files::{self, FilesConfig};
use sysbasics::commands;
use sysbasics::core::{IncludeExclude, Status, Threshold, Thresholds};
use sysbasics::platform::FileKind;

fn tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("app.log"), vec![b'x'; 10]).unwrap();
    fs::write(tmp.path().join("app.log.1"), vec![b'x'; 5]).unwrap();
    fs::write(tmp.path().join("notes.txt"), b"hello").unwrap();
    fs::create_dir(tmp.path().join("archive")).unwrap();
    fs::write(tmp.path().join("archive").join("old.log"), vec![b'x'; 100]).unwrap();
    tmp
}

#[test]
fn test_direct_children_only_by_default() {
    let tmp = tree();
    let config = FilesConfig {
        base_path: tmp.path().to_path_buf(),
        include_types: vec![FileKind::File],
        ..Default::default()
    };
    let overall = files::run(&config).unwrap();
    let output = overall.output();
    assert_eq!(overall.status(), Status::Ok);
    assert!(output.contains("3 matching files, 20 B"));
    assert!(output.contains("|count=3;;;0 total_size=20B;;;0\n"));
}

#[test]
fn test_recursive_name_filter_with_thresholds() {
    let tmp = tree();
    let config = FilesConfig {
        base_path: tmp.path().to_path_buf(),
        recursive: true,
        names: IncludeExclude::new(vec!["\\.log$".to_string()], Vec::new()),
        count: Thresholds::new(Threshold::parse("1").ok(), Threshold::parse("5").ok()),
        ..Default::default()
    };
    let overall = files::run(&config).unwrap();
    assert_eq!(overall.status(), Status::Warning);
    assert!(overall
        .output()
        .contains("\\_ [WARNING] Number of matching files violates threshold: 2"));
}

#[test]
fn test_missing_base_path_is_unknown() {
    let tmp = TempDir::new().unwrap();
    let config = FilesConfig {
        base_path: tmp.path().join("nope"),
        ..Default::default()
    };
    let overall = files::run(&config).unwrap();
    assert_eq!(overall.status(), Status::Unknown);
}

#[tokio::test]
async fn test_files_subcommand_end_to_end() {
    let tmp = tree();
    let base = tmp.path().to_string_lossy().into_owned();
    let matches = commands::cli()
        .try_get_matches_from([
            "check_sysbasics",
            "files",
            "--base-path",
            base.as_str(),
            "--exclude-file-type",
            "dir",
            "--critical-total-size",
            "15",
        ])
        .unwrap();

    let overall = commands::execute(&matches, Duration::from_secs(10)).await.unwrap();
    assert_eq!(overall.status(), Status::Critical);
    assert_eq!(overall.exit_code(), 2);
    assert!(overall
        .output()
        .contains("Total size of matching files violates threshold: 20 B"));
}
