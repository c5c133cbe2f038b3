//! Timing configuration for the display and input loops.
//!
//! The refresh, pulse and debounce intervals depend on each other: a
//! refresh cycle has to finish its pulses well inside one tick, and the
//! debounce wait must yield to the refresh instead of blocking it. The
//! relationships are checked by [`TimingConfig::validate`] rather than
//! left implicit in constants.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Minimum ratio between the tick period and one lamp pulse.
pub const PULSE_HEADROOM: u64 = 10;

/// Timing for the multiplexed display and the button scan.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Period of the display refresh tick, in microseconds.
    #[serde(default = "default_tick_period_us")]
    tick_period_us: u64,

    /// How long one lamp stays lit per refresh, in microseconds.
    #[serde(default = "default_pulse_width_us")]
    pulse_width_us: u64,

    /// Refresh ticks between toggles of the whose-turn lamp.
    #[serde(default = "default_blink_ticks")]
    blink_ticks: u16,

    /// Hold before re-checking a pressed contact, in microseconds.
    #[serde(default = "default_debounce_us")]
    debounce_us: u64,

    /// Pause before the automated player moves, in milliseconds.
    #[serde(default = "default_think_delay_ms")]
    think_delay_ms: u64,

    /// Idle wait between button scans, in microseconds.
    #[serde(default = "default_scan_interval_us")]
    scan_interval_us: u64,
}

fn default_tick_period_us() -> u64 {
    8_192
}

fn default_pulse_width_us() -> u64 {
    800
}

fn default_blink_ticks() -> u16 {
    46
}

fn default_debounce_us() -> u64 {
    10_000
}

fn default_think_delay_ms() -> u64 {
    1_000
}

fn default_scan_interval_us() -> u64 {
    1_000
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_period_us: default_tick_period_us(),
            pulse_width_us: default_pulse_width_us(),
            blink_ticks: default_blink_ticks(),
            debounce_us: default_debounce_us(),
            think_delay_ms: default_think_delay_ms(),
            scan_interval_us: default_scan_interval_us(),
        }
    }
}

impl TimingConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// Missing keys fall back to the reference timings.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading timing config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(?config, "Timing config loaded");
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the timing relationships the display depends on.
    ///
    /// - every interval is non-zero
    /// - one pulse is at most a tenth of a tick, so a full cycle of cell
    ///   and status pulses fits the refresh period
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_us == 0 {
            return Err(ConfigError::new("tick_period_us must be positive".to_string()));
        }
        if self.pulse_width_us == 0 {
            return Err(ConfigError::new("pulse_width_us must be positive".to_string()));
        }
        if self.pulse_width_us.saturating_mul(PULSE_HEADROOM) > self.tick_period_us {
            return Err(ConfigError::new(format!(
                "pulse_width_us ({}) must be at most 1/{} of tick_period_us ({})",
                self.pulse_width_us, PULSE_HEADROOM, self.tick_period_us
            )));
        }
        if self.blink_ticks == 0 {
            return Err(ConfigError::new("blink_ticks must be positive".to_string()));
        }
        if self.debounce_us == 0 {
            return Err(ConfigError::new("debounce_us must be positive".to_string()));
        }
        if self.scan_interval_us == 0 {
            return Err(ConfigError::new("scan_interval_us must be positive".to_string()));
        }
        Ok(())
    }

    /// Refresh tick period.
    pub fn tick_period(&self) -> Duration {
        Duration::from_micros(self.tick_period_us)
    }

    /// Lamp pulse width.
    pub fn pulse_width(&self) -> Duration {
        Duration::from_micros(self.pulse_width_us)
    }

    /// Debounce hold.
    pub fn debounce(&self) -> Duration {
        Duration::from_micros(self.debounce_us)
    }

    /// Automated player's pause before moving.
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }

    /// Idle wait between scans.
    pub fn scan_interval(&self) -> Duration {
        Duration::from_micros(self.scan_interval_us)
    }

    /// Wall-clock time between blink toggles.
    pub fn blink_interval(&self) -> Duration {
        self.tick_period() * u32::from(self.blink_ticks)
    }
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
