use super::*;
use crate::foundation::core::{Affine, ScrollDirection};
use proptest::prelude::*;

fn sample(velocity: f64, at: f64) -> ScrollSample {
    ScrollSample {
        offset: 0.0,
        velocity,
        direction: ScrollDirection::from_delta(velocity),
        timestamp: TimeMs(at),
    }
}

#[test]
fn skew_scales_then_clamps() {
    let cfg = SkewConfig::default();
    assert_eq!(skew_for_velocity(600.0, BandDirection::Left, &cfg), 2.0);
    assert_eq!(skew_for_velocity(600.0, BandDirection::Right, &cfg), -2.0);
    assert_eq!(skew_for_velocity(1.0e9, BandDirection::Left, &cfg), 5.0);
    assert_eq!(skew_for_velocity(-1.0e9, BandDirection::Left, &cfg), -5.0);
    assert_eq!(skew_for_velocity(f64::NAN, BandDirection::Left, &cfg), 0.0);
    assert_eq!(skew_for_velocity(f64::INFINITY, BandDirection::Right, &cfg), -5.0);
}

#[test]
fn skew_eases_toward_target() {
    let mut skew = VelocitySkew::new(BandId(0), BandDirection::Left, SkewConfig::default());
    skew.on_sample(&sample(1500.0, 0.0));
    assert_eq!(skew.target_deg(), 5.0);
    let mid = skew.skew_deg(TimeMs(100.0));
    assert!(mid > 0.0 && mid < 5.0);
    assert_eq!(skew.skew_deg(TimeMs(500.0)), 5.0);
}

#[test]
fn new_target_replaces_in_flight_skew() {
    let mut skew = VelocitySkew::new(BandId(0), BandDirection::Left, SkewConfig::default());
    skew.on_sample(&sample(1500.0, 0.0));
    let at_flip = skew.skew_deg(TimeMs(100.0));
    skew.on_sample(&sample(-1500.0, 100.0));

    assert_eq!(skew.skew_deg(TimeMs(100.0)), at_flip);
    assert_eq!(skew.target_deg(), -5.0);
    assert_eq!(skew.skew_deg(TimeMs(600.0)), -5.0);
}

#[test]
fn zero_skew_wrapper_is_identity() {
    let skew = VelocitySkew::new(BandId(0), BandDirection::Left, SkewConfig::default());
    let style = skew.wrapper_style(TimeMs(0.0));
    assert_eq!(style.skew_x_deg, Some(0.0));
    assert_eq!(style.to_affine(), Affine::IDENTITY);
}

proptest! {
    #[test]
    fn skew_never_leaves_bounds(
        velocities in proptest::collection::vec(-1.0e7f64..1.0e7, 1..40),
        at in 0.0f64..5000.0,
    ) {
        let cfg = SkewConfig::default();
        let mut skew = VelocitySkew::new(BandId(0), BandDirection::Right, cfg.clone());
        for (i, v) in velocities.iter().enumerate() {
            skew.on_sample(&sample(*v, i as f64 * 16.0));
            let now = TimeMs(i as f64 * 16.0 + at.min(15.0));
            let deg = skew.skew_deg(now);
            prop_assert!(deg.abs() <= cfg.max_skew_deg + 1e-9);
        }
        prop_assert!(skew.skew_deg(TimeMs(at + 1.0e6)).abs() <= cfg.max_skew_deg);
    }
}
