use sysbasics::core::{IncludeExclude, Overall, Perfdata, ResultNode, Status, Threshold};

#[test]
fn test_full_plugin_output() {
    let mut disk = ResultNode::new("/ (40.00% used space)");
    let mut space = ResultNode::with_status(Status::Warning, "Free space 60.00%");
    space.add_perfdata(
        Perfdata::new("free_space_percentage_/", 60.0)
            .uom("%")
            .warn(Threshold::parse("70:").ok())
            .min(0u64)
            .max(100u64),
    );
    disk.add_child(space);

    let mut overall = Overall::new();
    overall.add_subcheck(disk);
    overall.add(Status::Ok, "Everything else is fine");

    assert_eq!(overall.status(), Status::Warning);
    assert_eq!(overall.exit_code(), 1);
    assert_eq!(overall.count(Status::Warning), 1);
    assert_eq!(overall.count(Status::Ok), 1);
    assert_eq!(
        overall.output(),
        "[WARNING] - states: warning=1 ok=1\n\
         \\_ [WARNING] / (40.00% used space)\n    \
         \\_ [WARNING] Free space 60.00%\n\
         \\_ [OK] Everything else is fine\n\
         |free_space_percentage_/=60%;70:;;0;100\n"
    );
}

#[test]
fn test_unknown_subcheck_does_not_mask_critical() {
    let mut overall = Overall::new();
    overall.add(Status::Unknown, "could not read something");
    overall.add(Status::Critical, "something is broken");
    assert_eq!(overall.status(), Status::Critical);
    assert_eq!(overall.exit_code(), 2);
}

#[test]
fn test_empty_overall() {
    let overall = Overall::new();
    assert_eq!(overall.output(), "[OK] - No checks were performed\n");
}

#[test]
fn test_include_then_exclude() {
    let filter = IncludeExclude::new(vec!["^eth".to_string()], vec!["1$".to_string()]);
    let names = ["eth0", "eth1", "wlan0", "lo"];
    assert_eq!(filter.apply(&names, |n| *n).unwrap(), vec!["eth0"]);
}

#[test]
fn test_invalid_pattern_is_reported() {
    let filter = IncludeExclude::new(vec!["(".to_string()], Vec::new());
    assert!(filter.validate().is_err());
}
