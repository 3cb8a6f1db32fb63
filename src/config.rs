//! Interaction tuning from the environment.
//!
//! Every knob is optional; a missing variable keeps the default from
//! `scene::consts`. A variable that is present but unparsable, or a
//! combination that would break the engine (zoom base <= 1, an empty tick
//! range, negative thresholds), is a [`ConfigError`] rather than a silent
//! fallback.

use std::str::FromStr;

pub use scene::config::{InteractionConfig, ZoomSettings};

pub const ENV_ZOOM_BASE: &str = "SCENE_ZOOM_BASE";
pub const ENV_ZOOM_MIN_TICK: &str = "SCENE_ZOOM_MIN_TICK";
pub const ENV_ZOOM_MAX_TICK: &str = "SCENE_ZOOM_MAX_TICK";
pub const ENV_DRAG_THRESHOLD_PX: &str = "SCENE_DRAG_THRESHOLD_PX";
pub const ENV_PAN_THRESHOLD_PX: &str = "SCENE_PAN_THRESHOLD_PX";
pub const ENV_LONG_PRESS_MS: &str = "SCENE_LONG_PRESS_MS";
pub const ENV_LONG_PRESS_SLOP_PX: &str = "SCENE_LONG_PRESS_SLOP_PX";
pub const ENV_CONTEXT_MENU_SUPPRESS_MS: &str = "SCENE_CONTEXT_MENU_SUPPRESS_MS";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("{key} out of range: {reason}")]
    OutOfRange { key: &'static str, reason: &'static str },
}

/// Load a config from process environment variables.
pub trait FromEnv: Sized {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unparsable or out-of-range values.
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup (the environment, a map in tests).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unparsable or out-of-range values.
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>;
}

// =============================================================================
// INTERACTION CONFIG
// =============================================================================

impl FromEnv for InteractionConfig {
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = InteractionConfig::default();
        let config = InteractionConfig {
            zoom: ZoomSettings {
                base: env_parse(&lookup, ENV_ZOOM_BASE, defaults.zoom.base)?,
                min_tick: env_parse(&lookup, ENV_ZOOM_MIN_TICK, defaults.zoom.min_tick)?,
                max_tick: env_parse(&lookup, ENV_ZOOM_MAX_TICK, defaults.zoom.max_tick)?,
            },
            drag_threshold_px: env_parse(&lookup, ENV_DRAG_THRESHOLD_PX, defaults.drag_threshold_px)?,
            pan_threshold_px: env_parse(&lookup, ENV_PAN_THRESHOLD_PX, defaults.pan_threshold_px)?,
            long_press_ms: env_parse(&lookup, ENV_LONG_PRESS_MS, defaults.long_press_ms)?,
            long_press_slop_px: env_parse(&lookup, ENV_LONG_PRESS_SLOP_PX, defaults.long_press_slop_px)?,
            context_menu_suppress_ms: env_parse(
                &lookup,
                ENV_CONTEXT_MENU_SUPPRESS_MS,
                defaults.context_menu_suppress_ms,
            )?,
        };
        validate(&config)?;
        tracing::debug!(?config, "interaction config loaded");
        Ok(config)
    }
}

/// Check the invariants the engine relies on.
///
/// # Errors
///
/// Returns [`ConfigError::OutOfRange`] naming the first offending variable.
pub fn validate(config: &InteractionConfig) -> Result<(), ConfigError> {
    let zoom = &config.zoom;
    if !zoom.base.is_finite() || zoom.base <= 1.0 {
        return Err(ConfigError::OutOfRange { key: ENV_ZOOM_BASE, reason: "must be a finite number above 1" });
    }
    if zoom.min_tick > 0 {
        return Err(ConfigError::OutOfRange { key: ENV_ZOOM_MIN_TICK, reason: "must be <= 0" });
    }
    if zoom.max_tick < 0 {
        return Err(ConfigError::OutOfRange { key: ENV_ZOOM_MAX_TICK, reason: "must be >= 0" });
    }

    let non_negative = [
        (ENV_DRAG_THRESHOLD_PX, config.drag_threshold_px),
        (ENV_PAN_THRESHOLD_PX, config.pan_threshold_px),
        (ENV_LONG_PRESS_SLOP_PX, config.long_press_slop_px),
        (ENV_CONTEXT_MENU_SUPPRESS_MS, config.context_menu_suppress_ms),
    ];
    for (key, value) in non_negative {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::OutOfRange { key, reason: "must be a finite non-negative number" });
        }
    }
    if !config.long_press_ms.is_finite() || config.long_press_ms <= 0.0 {
        return Err(ConfigError::OutOfRange { key: ENV_LONG_PRESS_MS, reason: "must be a finite positive number" });
    }
    Ok(())
}

/// Parse `key` if present; a missing key yields `default`.
pub(crate) fn env_parse<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
