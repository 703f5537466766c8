use crate::error::{Result, TeamError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// WheelConfig
// ---------------------------------------------------------------------------

/// Timing of the spinning-wheel animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelConfig {
    #[serde(default = "default_min_spin")]
    pub min_spin_ms: u64,
    #[serde(default = "default_max_spin")]
    pub max_spin_ms: u64,
    /// Highlight cadence at the start of a spin.
    #[serde(default = "default_fast_tick")]
    pub fast_tick_ms: u64,
    /// Highlight cadence as the spin runs out.
    #[serde(default = "default_slow_tick")]
    pub slow_tick_ms: u64,
    /// How often the spin driver ticks the state machine.
    #[serde(default = "default_frame")]
    pub frame_ms: u64,
}

fn default_min_spin() -> u64 {
    200
}

fn default_max_spin() -> u64 {
    400
}

fn default_fast_tick() -> u64 {
    50
}

fn default_slow_tick() -> u64 {
    300
}

fn default_frame() -> u64 {
    16
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            min_spin_ms: default_min_spin(),
            max_spin_ms: default_max_spin(),
            fast_tick_ms: default_fast_tick(),
            slow_tick_ms: default_slow_tick(),
            frame_ms: default_frame(),
        }
    }
}

impl WheelConfig {
    /// Uniform draw from `[min_spin_ms, max_spin_ms]`. A reversed range is
    /// read with its bounds swapped.
    pub fn sample_spin_duration<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let lo = self.min_spin_ms.min(self.max_spin_ms);
        let hi = self.min_spin_ms.max(self.max_spin_ms);
        Duration::from_millis(rng.gen_range(lo..=hi))
    }

    /// Highlight cadence after `elapsed` of a spin lasting `total`: linear from
    /// the fast tick at the start to the slow tick at the end.
    pub fn cadence_at(&self, elapsed: Duration, total: Duration) -> Duration {
        let fast = self.fast_tick_ms.min(self.slow_tick_ms) as f64;
        let slow = self.fast_tick_ms.max(self.slow_tick_ms) as f64;
        let progress = if total.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
        };
        let ms = fast + (slow - fast) * progress;
        Duration::from_micros((ms * 1000.0).round() as u64)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Team count used when none is given on the command line.
    #[serde(default = "default_teams")]
    pub teams: u32,
    #[serde(default)]
    pub wheel: WheelConfig,
}

fn default_version() -> u32 {
    1
}

fn default_teams() -> u32 {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            teams: default_teams(),
            wheel: WheelConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TeamError::InvalidConfig(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let wheel = &self.wheel;

        if self.teams == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "teams must be at least 1".to_string(),
            });
        }

        if wheel.min_spin_ms > wheel.max_spin_ms {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "wheel.min_spin_ms ({}) is greater than wheel.max_spin_ms ({})",
                    wheel.min_spin_ms, wheel.max_spin_ms
                ),
            });
        }

        if wheel.fast_tick_ms > wheel.slow_tick_ms {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "wheel.fast_tick_ms ({}) is greater than wheel.slow_tick_ms ({})",
                    wheel.fast_tick_ms, wheel.slow_tick_ms
                ),
            });
        }

        if wheel.frame_ms == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "wheel.frame_ms must be at least 1".to_string(),
            });
        }

        if wheel.max_spin_ms > 10_000 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "wheel.max_spin_ms={} (>10s per pick is unusual)",
                    wheel.max_spin_ms
                ),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
