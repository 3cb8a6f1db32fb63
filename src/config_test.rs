#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_missing_returns_default() {
    let lookup = lookup_from(&[]);
    assert_eq!(env_parse(&lookup, ENV_LONG_PRESS_MS, 42.0), Ok(42.0));
}

#[test]
fn env_parse_present_valid() {
    let lookup = lookup_from(&[(ENV_ZOOM_MAX_TICK, " 12 ")]);
    assert_eq!(env_parse(&lookup, ENV_ZOOM_MAX_TICK, 0_i32), Ok(12));
}

#[test]
fn env_parse_present_invalid_is_error() {
    let lookup = lookup_from(&[(ENV_ZOOM_MAX_TICK, "lots")]);
    assert_eq!(
        env_parse(&lookup, ENV_ZOOM_MAX_TICK, 0_i32),
        Err(ConfigError::Invalid { key: ENV_ZOOM_MAX_TICK, value: "lots".into() })
    );
}

// =============================================================================
// InteractionConfig::from_lookup
// =============================================================================

#[test]
fn no_variables_yields_defaults() {
    let config = InteractionConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config, InteractionConfig::default());
}

#[test]
fn variables_override_defaults() {
    let config = InteractionConfig::from_lookup(lookup_from(&[
        (ENV_ZOOM_BASE, "1.5"),
        (ENV_ZOOM_MIN_TICK, "-4"),
        (ENV_ZOOM_MAX_TICK, "6"),
        (ENV_DRAG_THRESHOLD_PX, "8"),
        (ENV_PAN_THRESHOLD_PX, "9"),
        (ENV_LONG_PRESS_MS, "750"),
        (ENV_LONG_PRESS_SLOP_PX, "12"),
        (ENV_CONTEXT_MENU_SUPPRESS_MS, "150"),
    ]))
    .unwrap();

    assert_eq!(config.zoom, ZoomSettings { base: 1.5, min_tick: -4, max_tick: 6 });
    assert_eq!(config.drag_threshold_px, 8.0);
    assert_eq!(config.pan_threshold_px, 9.0);
    assert_eq!(config.long_press_ms, 750.0);
    assert_eq!(config.long_press_slop_px, 12.0);
    assert_eq!(config.context_menu_suppress_ms, 150.0);
}

#[test]
fn unparsable_variable_is_reported() {
    let err = InteractionConfig::from_lookup(lookup_from(&[(ENV_PAN_THRESHOLD_PX, "five")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { key: ENV_PAN_THRESHOLD_PX, value: "five".into() });
    assert_eq!(err.to_string(), "invalid value for SCENE_PAN_THRESHOLD_PX: \"five\"");
}

#[test]
fn zoom_base_must_exceed_one() {
    for raw in ["1", "0.5", "NaN", "inf"] {
        let err = InteractionConfig::from_lookup(lookup_from(&[(ENV_ZOOM_BASE, raw)])).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { key: ENV_ZOOM_BASE, .. }), "{raw}");
    }
}

#[test]
fn tick_range_must_contain_zero() {
    let err = InteractionConfig::from_lookup(lookup_from(&[(ENV_ZOOM_MIN_TICK, "2")])).unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { key: ENV_ZOOM_MIN_TICK, .. }));

    let err = InteractionConfig::from_lookup(lookup_from(&[(ENV_ZOOM_MAX_TICK, "-1")])).unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { key: ENV_ZOOM_MAX_TICK, .. }));
}

#[test]
fn negative_threshold_is_rejected() {
    let err = InteractionConfig::from_lookup(lookup_from(&[(ENV_DRAG_THRESHOLD_PX, "-3")])).unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { key: ENV_DRAG_THRESHOLD_PX, .. }));
}

#[test]
fn long_press_must_be_positive() {
    let err = InteractionConfig::from_lookup(lookup_from(&[(ENV_LONG_PRESS_MS, "0")])).unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { key: ENV_LONG_PRESS_MS, .. }));
}

// =============================================================================
// from_env — env manipulation requires unsafe in edition 2024.
// =============================================================================

#[test]
fn from_env_reads_process_environment() {
    unsafe { std::env::set_var(ENV_LONG_PRESS_SLOP_PX, "14") };
    let config = InteractionConfig::from_env();
    unsafe { std::env::remove_var(ENV_LONG_PRESS_SLOP_PX) };
    assert_eq!(config.unwrap().long_press_slop_px, 14.0);
}
