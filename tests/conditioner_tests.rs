//! Dead-band conditioner tests

use ecg_heart_monitor::conditioner::{condition, condition_with};
use ecg_heart_monitor::config::MonitorConfig;
use ecg_heart_monitor::sample::SAMPLE_MAX;

#[test]
fn test_inside_band_collapses_to_125() {
    assert_eq!(condition(101), 125);
    assert_eq!(condition(125), 125);
    assert_eq!(condition(149), 125);
}

#[test]
fn test_band_edges_pass_through() {
    // Both bounds are exclusive
    assert_eq!(condition(100), 100);
    assert_eq!(condition(150), 150);
}

#[test]
fn test_outside_band_unchanged() {
    assert_eq!(condition(0), 0);
    assert_eq!(condition(99), 99);
    assert_eq!(condition(151), 151);
    assert_eq!(condition(300), 300);
    assert_eq!(condition(SAMPLE_MAX), SAMPLE_MAX);
}

#[test]
fn test_full_adc_range() {
    for x in 0..=SAMPLE_MAX {
        let expected = if x > 100 && x < 150 { 125 } else { x };
        assert_eq!(condition(x), expected, "sample {}", x);
    }
}

#[test]
fn test_stock_config_matches_free_function() {
    let config = MonitorConfig::default();
    for x in 90..160 {
        assert_eq!(condition_with(&config, x), condition(x));
    }
}

#[test]
fn test_custom_band() {
    let config = MonitorConfig {
        dead_band_low: 10,
        dead_band_high: 20,
        dead_band_value: 0,
        ..MonitorConfig::default()
    };
    assert_eq!(condition_with(&config, 15), 0);
    assert_eq!(condition_with(&config, 10), 10);
    assert_eq!(condition_with(&config, 125), 125);
}
