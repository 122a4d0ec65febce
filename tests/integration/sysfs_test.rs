use std::fs;
use std::path::Path;

use tempfile::TempDir;

use sysbasics::checks::netdev::{self, NetdevConfig};
use sysbasics::checks::psi::{self, PsiConfig};
use sysbasics::checks::sensors::{self, SensorsConfig};
use sysbasics::core::{IncludeExclude, Status, Threshold};
use sysbasics::platform::mounts::parse_mounts;
use sysbasics::platform::{HwmonReader, NetReader, PressureReader, Resource};

fn fake_interface(root: &Path, name: &str, state: &str, rx_bytes: u64) {
    let stats = root.join(name).join("statistics");
    fs::create_dir_all(&stats).unwrap();
    fs::write(root.join(name).join("operstate"), format!("{}\n", state)).unwrap();
    for stat in sysbasics::platform::netdev::STATISTICS {
        let value = if stat == "rx_bytes" { rx_bytes } else { 0 };
        fs::write(stats.join(stat), format!("{}\n", value)).unwrap();
    }
}

#[test]
fn test_netdev_against_fake_sysfs() {
    let tmp = TempDir::new().unwrap();
    fake_interface(tmp.path(), "lo", "unknown", 1);
    fake_interface(tmp.path(), "eth0", "up", 1234);
    fake_interface(tmp.path(), "eth1", "down", 0);

    let overall = netdev::run(&NetdevConfig::default(), &NetReader::new(tmp.path())).unwrap();
    let messages: Vec<&str> = overall.subchecks().iter().map(|n| n.message()).collect();
    assert_eq!(messages, vec!["eth0 is Up", "eth1 is Down"]);
    assert_eq!(overall.status(), Status::Warning);
    assert!(overall.output().contains("eth0_rx_bytes=1234c"));
}

#[test]
fn test_netdev_down_is_critical_with_count() {
    let tmp = TempDir::new().unwrap();
    fake_interface(tmp.path(), "eth0", "down", 0);

    let config = NetdevConfig {
        down_is_critical: true,
        count: sysbasics::core::Thresholds::new(None, Threshold::parse("2:").ok()),
        ..Default::default()
    };
    let overall = netdev::run(&config, &NetReader::new(tmp.path())).unwrap();
    assert_eq!(overall.status(), Status::Critical);
    assert_eq!(overall.count(Status::Critical), 2);
}

#[test]
fn test_netdev_missing_class_dir_is_unknown() {
    let tmp = TempDir::new().unwrap();
    let reader = NetReader::new(tmp.path().join("missing"));
    let overall = netdev::run(&NetdevConfig::default(), &reader).unwrap();
    assert_eq!(overall.status(), Status::Unknown);
    assert_eq!(overall.exit_code(), 3);
}

#[test]
fn test_psi_against_fake_procfs() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("cpu"),
        "some avg10=1.50 avg60=0.80 avg300=0.20 total=123456\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("memory"),
        "some avg10=40.00 avg60=10.00 avg300=1.00 total=5\n\
         full avg10=0.00 avg60=0.00 avg300=0.00 total=0\n",
    )
    .unwrap();

    let overall = psi::run(&PsiConfig::default(), &PressureReader::new(tmp.path()));
    assert_eq!(overall.subchecks().len(), 3);
    assert_eq!(overall.subchecks()[0].status(), Status::Ok);
    assert_eq!(overall.subchecks()[0].message(), "CPU");
    assert_eq!(overall.subchecks()[1].status(), Status::Unknown);
    assert!(overall.subchecks()[1].message().starts_with("IO pressure file not found"));
    assert_eq!(overall.subchecks()[2].status(), Status::Warning);
    assert_eq!(overall.status(), Status::Warning);

    let output = overall.output();
    assert!(output.contains("\\_ [WARNING] Some - Avg10: 40.00, Avg60: 10.00, Avg300: 1.00"));
    assert!(output.contains("cpu-some-avg10=1.5%;@30:100;@95:100;0;100"));
    assert!(output.contains("cpu-some-total=123456c;;;0"));
}

#[test]
fn test_psi_only_included_resources() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("io"), "some avg10=0.00 avg60=0.00 avg300=0.00 total=0\n").unwrap();

    let config = PsiConfig {
        include: vec![Resource::Io],
        ..Default::default()
    };
    let overall = psi::run(&config, &PressureReader::new(tmp.path()));
    assert_eq!(overall.subchecks().len(), 1);
    assert_eq!(overall.status(), Status::Ok);
}

fn fake_hwmon(root: &Path, dir: &str, name: &str, files: &[(&str, &str)]) {
    let path = root.join(dir);
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join("name"), format!("{}\n", name)).unwrap();
    for (file, content) in files {
        fs::write(path.join(file), format!("{}\n", content)).unwrap();
    }
}

#[test]
fn test_sensors_against_fake_hwmon() {
    let tmp = TempDir::new().unwrap();
    fake_hwmon(
        tmp.path(),
        "hwmon0",
        "coretemp",
        &[
            ("temp1_input", "45000"),
            ("temp1_label", "Package id 0"),
            ("temp1_max", "80000"),
            ("temp1_crit", "100000"),
            ("temp2_input", "85000"),
            ("temp2_label", "Core 0"),
            ("temp2_max", "80000"),
            ("temp2_crit", "100000"),
        ],
    );
    fake_hwmon(tmp.path(), "hwmon1", "nvme", &[("temp1_input", "30000"), ("temp1_alarm", "1")]);

    let reader = HwmonReader::new(tmp.path());
    let overall = sensors::run(&SensorsConfig::default(), &reader).unwrap();
    assert_eq!(overall.subchecks().len(), 2);
    assert_eq!(overall.subchecks()[0].message(), "coretemp");
    assert_eq!(overall.subchecks()[0].status(), Status::Warning);
    assert_eq!(overall.subchecks()[1].status(), Status::Critical);

    let output = overall.output();
    assert!(output.contains("Core 0: Warning - 85C"));
    assert!(output.contains("nvme_temp1: Alarm! - 30C"));
    assert!(output.contains("'Package id 0'=45C;~:80;~:100"));
}

#[test]
fn test_sensors_filters() {
    let tmp = TempDir::new().unwrap();
    fake_hwmon(tmp.path(), "hwmon0", "coretemp", &[("temp1_input", "45000")]);
    fake_hwmon(tmp.path(), "hwmon1", "nvme", &[("temp1_input", "30000"), ("temp1_alarm", "1")]);

    let config = SensorsConfig {
        devices: IncludeExclude::new(Vec::new(), vec!["^nvme$".to_string()]),
        ..Default::default()
    };
    let overall = sensors::run(&config, &HwmonReader::new(tmp.path())).unwrap();
    assert_eq!(overall.subchecks().len(), 1);
    assert_eq!(overall.status(), Status::Ok);
}

#[cfg(unix)]
#[test]
fn test_sensors_keep_readable_devices_next_to_a_broken_one() {
    let tmp = TempDir::new().unwrap();
    fake_hwmon(tmp.path(), "hwmon0", "coretemp", &[("temp1_input", "45000"), ("temp1_label", "Core 0")]);
    std::os::unix::fs::symlink(tmp.path().join("vanished"), tmp.path().join("hwmon1")).unwrap();

    let overall = sensors::run(&SensorsConfig::default(), &HwmonReader::new(tmp.path())).unwrap();
    assert_eq!(overall.subchecks().len(), 2);
    assert_eq!(overall.subchecks()[0].message(), "coretemp");
    assert_eq!(overall.subchecks()[0].status(), Status::Ok);
    assert_eq!(overall.subchecks()[1].status(), Status::Unknown);
    assert!(overall.subchecks()[1]
        .message()
        .starts_with("Could not read hwmon device "));
    assert!(overall.output().contains("'Core 0'=45C"));
}

#[test]
fn test_sensors_without_hwmon_is_unknown() {
    let tmp = TempDir::new().unwrap();
    let reader = HwmonReader::new(tmp.path().join("hwmon"));
    let overall = sensors::run(&SensorsConfig::default(), &reader).unwrap();
    assert_eq!(overall.status(), Status::Unknown);
}

#[test]
fn test_mount_table_parsing() {
    let mounts = parse_mounts(
        "/dev/sda1 / ext4 rw,relatime 0 0\n\
         //nas/share /mnt/my\\040share cifs ro,vers=3.0 0 0\n",
    );
    assert_eq!(mounts.len(), 2);
    assert_eq!(mounts[0].fs_type, "ext4");
    assert_eq!(mounts[1].mount_point, "/mnt/my share");
    assert_eq!(mounts[1].options, vec!["ro".to_string(), "vers=3.0".to_string()]);
}
