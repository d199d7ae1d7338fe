//! Game-wide tuning, loadable from JSON.
//!
//! Every section has defaults matching the live game, so a config file
//! only needs to name the values it changes:
//!
//! ```
//! use paddock_logic::config::GameConfig;
//!
//! let config = GameConfig::from_json_str(r#"{ "race": { "min_time": 55.0 } }"#).unwrap();
//! assert_eq!(config.race.min_time, 55.0);
//! assert_eq!(config.race.base_time, 120.0);
//! assert!(config.validate().is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::breeding::BreedingConfig;
use crate::progression::ProgressionConfig;
use crate::recommend::RecommendConfig;
use crate::simulation::{JitterRange, RaceConfig};
use crate::stats::STAT_MAX;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub progression: ProgressionConfig,
    pub breeding: BreedingConfig,
    pub race: RaceConfig,
    pub recommend: RecommendConfig,
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("experience per level must be positive")]
    ZeroExperiencePerLevel,
    #[error("rest points range {min}..={max} is inverted")]
    InvertedRestRange { min: u32, max: u32 },
    #[error("probability {0} is outside 0..=1")]
    InvalidProbability(f64),
    #[error("stat jitter {0} must be within 0..=100")]
    InvalidStatJitter(i32),
    #[error("{name} range {min}..{max} is invalid")]
    InvalidJitterRange { name: &'static str, min: f64, max: f64 },
    #[error("payout table is empty")]
    EmptyPayoutTable,
    #[error("payout fraction {value} at position {position} is outside 0..=1")]
    InvalidPayout { position: usize, value: f64 },
    #[error("minimum race time {min} exceeds base time {base}")]
    InvalidTimeCurve { min: f64, base: f64 },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {}", join_errors(.0))]
    Invalid(Vec<ConfigError>),
}

impl GameConfig {
    /// Parse JSON without validating.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse JSON and reject it if [`GameConfig::validate`] finds anything.
    pub fn load_json(json: &str) -> Result<Self, ConfigLoadError> {
        let config = Self::from_json_str(json)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigLoadError::Invalid(errors))
        }
    }

    /// Validate all sections, returning every error found.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let p = &self.progression;
        if p.experience_per_level == 0 {
            errors.push(ConfigError::ZeroExperiencePerLevel);
        }
        if p.rest_points_min > p.rest_points_max {
            errors.push(ConfigError::InvertedRestRange {
                min: p.rest_points_min,
                max: p.rest_points_max,
            });
        }
        if !(0.0..=1.0).contains(&p.rest_stat_chance) {
            errors.push(ConfigError::InvalidProbability(p.rest_stat_chance));
        }

        if !(0..=STAT_MAX as i32).contains(&self.breeding.stat_jitter) {
            errors.push(ConfigError::InvalidStatJitter(self.breeding.stat_jitter));
        }

        let r = &self.race;
        check_range("performance jitter", r.performance_jitter, &mut errors);
        check_range("volatility", r.volatility, &mut errors);
        if r.payout_table.is_empty() {
            errors.push(ConfigError::EmptyPayoutTable);
        }
        for (i, &value) in r.payout_table.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                errors.push(ConfigError::InvalidPayout {
                    position: i + 1,
                    value,
                });
            }
        }
        if r.min_time.is_nan() || r.base_time.is_nan() || r.min_time > r.base_time {
            errors.push(ConfigError::InvalidTimeCurve {
                min: r.min_time,
                base: r.base_time,
            });
        }

        errors
    }
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn check_range(name: &'static str, range: JitterRange, errors: &mut Vec<ConfigError>) {
    let ok = range.min.is_finite()
        && range.max.is_finite()
        && range.min > 0.0
        && range.min <= range.max;
    if !ok {
        errors.push(ConfigError::InvalidJitterRange {
            name,
            min: range.min,
            max: range.max,
        });
    }
}
