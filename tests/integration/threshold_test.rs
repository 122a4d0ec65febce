use sysbasics::core::{Status, Threshold, ThresholdError, Thresholds};

fn t(s: &str) -> Threshold {
    Threshold::parse(s).unwrap()
}

#[test]
fn test_plain_upper_bound() {
    let threshold = t("10");
    assert!(!threshold.violates(0.0));
    assert!(!threshold.violates(10.0));
    assert!(threshold.violates(10.5));
    assert!(threshold.violates(-1.0));
}

#[test]
fn test_open_ranges() {
    assert!(t("10:").violates(9.9));
    assert!(!t("10:").violates(1e12));
    assert!(!t("~:10").violates(-1e12));
    assert!(t("~:10").violates(11.0));
}

#[test]
fn test_inverted_range_alerts_inside() {
    let threshold = t("@10:20");
    assert!(threshold.violates(10.0));
    assert!(threshold.violates(15.0));
    assert!(!threshold.violates(9.0));
    assert!(!threshold.violates(21.0));
}

#[test]
fn test_rejects_garbage() {
    assert_eq!(Threshold::parse(""), Err(ThresholdError::Empty));
    assert!(Threshold::parse("abc").is_err());
    assert!(Threshold::parse("20:10").is_err());
    assert!(Threshold::parse("inf").is_err());
    assert!(Threshold::parse("1:NaN").is_err());
}

#[test]
fn test_display_is_canonical() {
    for input in ["100", "~:100", "15:", "@30:100", "@5"] {
        assert_eq!(t(input).to_string(), input);
    }
    assert_eq!(t("0:100").to_string(), "100");
}

#[test]
fn test_critical_wins_over_warning() {
    let thresholds = Thresholds::new(Some(t("80")), Some(t("90")));
    assert_eq!(thresholds.evaluate(50.0), Status::Ok);
    assert_eq!(thresholds.evaluate(85.0), Status::Warning);
    assert_eq!(thresholds.evaluate(95.0), Status::Critical);
}

#[test]
fn test_unset_thresholds_never_alert() {
    let thresholds = Thresholds::default();
    assert!(!thresholds.is_set());
    assert_eq!(thresholds.evaluate(f64::MAX), Status::Ok);
}
