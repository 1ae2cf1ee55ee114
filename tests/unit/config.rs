use super::*;

#[test]
fn defaults_match_documented_constants() {
    let cfg = MotionConfig::default();
    assert_eq!(cfg.ticker.speed_px_per_sec, 100.0);
    assert_eq!(cfg.ticker.resize_debounce_ms, 200.0);
    assert_eq!(cfg.skew.scale_factor, 300.0);
    assert_eq!(cfg.skew.max_skew_deg, 5.0);
    assert_eq!(cfg.nav.hide_threshold_px, 50.0);
    assert_eq!(cfg.transition.grace_ms, 200.0);
    assert_eq!(cfg.breakpoint.0, 768.0);
    cfg.validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = MotionConfig::from_json_str(r#"{ "skew": { "max_skew_deg": 8.0 } }"#).unwrap();
    assert_eq!(cfg.skew.max_skew_deg, 8.0);
    assert_eq!(cfg.skew.scale_factor, 300.0);
    assert_eq!(cfg.ticker, TickerConfig::default());
}

#[test]
fn zero_speed_is_rejected() {
    let err = MotionConfig::from_json_str(r#"{ "ticker": { "speed_px_per_sec": 0 } }"#)
        .unwrap_err();
    assert!(err.to_string().contains("ticker.speed_px_per_sec"));
}

#[test]
fn single_copy_is_rejected() {
    let mut cfg = MotionConfig::default();
    cfg.ticker.min_copies = 1;
    assert!(cfg.validate().is_err());
}

#[test]
fn copy_ceiling_below_floor_is_rejected() {
    let mut cfg = MotionConfig::default();
    cfg.ticker.max_copies = 3;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("ticker.max_copies"));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = MotionConfig::from_json_str("{ nope").unwrap_err();
    assert!(matches!(err, ScrollfxError::Serde(_)));
}

#[test]
fn reveal_motion_is_validated_with_config() {
    let err = MotionConfig::from_json_str(r#"{ "reveal": { "motion": { "duration_ms": -5 } } }"#)
        .unwrap_err();
    assert!(err.to_string().contains("duration_ms"));

    let cfg =
        MotionConfig::from_json_str(r#"{ "reveal": { "motion": { "from_y": 60 } } }"#).unwrap();
    assert_eq!(cfg.reveal.motion.from_y, 60.0);
    assert_eq!(cfg.reveal.motion.duration_ms, 1000.0);
}
