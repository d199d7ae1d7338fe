//! Experience, leveling, stat training, and resting.
//!
//! A horse levels up each time its experience reaches `level × 100`; the
//! threshold is consumed and the horse earns training points. Training
//! points are then spent one-for-one on stats.
//!
//! ```
//! use paddock_logic::horse::{Horse, OwnerId};
//! use paddock_logic::progression::{add_experience, ProgressionConfig};
//!
//! let config = ProgressionConfig::default();
//! let mut horse = Horse::new("Rookie", OwnerId::new());
//! add_experience(&mut horse, 300, &config);
//! assert_eq!(horse.level, 3);
//! assert_eq!(horse.experience, 0);
//! assert_eq!(horse.training_points, 10);
//! ```
//!
//! # Training asymmetry
//!
//! Points spent on a stat close to the cap are not refunded when the cap
//! absorbs part of the gain.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::horse::Horse;
use crate::stats::{StatKind, STAT_MAX};

/// Tunable progression rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Experience needed per level; the threshold for level `n` is `n × this`.
    pub experience_per_level: u64,
    /// Training points granted on every level-up.
    pub training_points_per_level: u32,
    pub win_experience: u64,
    pub loss_experience: u64,
    /// Inclusive range of training points granted by a rest.
    pub rest_points_min: u32,
    pub rest_points_max: u32,
    /// Chance that a rest also grants one point in a random stat.
    pub rest_stat_chance: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            experience_per_level: 100,
            training_points_per_level: 5,
            win_experience: 50,
            loss_experience: 20,
            rest_points_min: 2,
            rest_points_max: 4,
            rest_stat_chance: 0.10,
        }
    }
}

/// Add experience, leveling up as many times as the total allows.
///
/// Returns the number of levels gained. There is no level cap.
pub fn add_experience(horse: &mut Horse, amount: u64, config: &ProgressionConfig) -> u32 {
    horse.experience = horse.experience.saturating_add(amount);

    let mut gained = 0;
    loop {
        let threshold = horse.level as u64 * config.experience_per_level;
        if threshold == 0 || horse.experience < threshold {
            break;
        }
        horse.experience -= threshold;
        horse.level += 1;
        horse.training_points = horse
            .training_points
            .saturating_add(config.training_points_per_level);
        gained += 1;
    }

    if gained > 0 {
        info!(
            "{} reached level {} (+{} levels, {} training points)",
            horse.name, horse.level, gained, horse.training_points
        );
    }
    gained
}

/// Spend `points` training points on `stat`.
///
/// Returns the new stat value. Fails without touching the horse when it
/// cannot afford the points. The full amount is deducted even if the stat
/// hits 100 first.
pub fn train_stat(horse: &mut Horse, stat: StatKind, points: u32) -> Result<u8, ValidationError> {
    if horse.training_points < points {
        return Err(ValidationError::InsufficientTrainingPoints {
            required: points,
            available: horse.training_points,
        });
    }

    horse.training_points -= points;
    let raised = (horse.stats.get(stat) as u32).saturating_add(points);
    Ok(horse.stats.set(stat, raised.min(STAT_MAX as u32) as i32))
}

/// Like [`train_stat`] but takes a stat name as supplied by a caller.
pub fn train_stat_named(horse: &mut Horse, stat: &str, points: u32) -> Result<u8, ValidationError> {
    let kind: StatKind = stat.parse()?;
    train_stat(horse, kind, points)
}

/// Update race counters and grant win or loss experience.
pub fn record_race_result(horse: &mut Horse, won: bool, earnings: u32, config: &ProgressionConfig) {
    horse.races_run += 1;
    if won {
        horse.races_won += 1;
    }
    horse.total_earnings += earnings as u64;

    let xp = if won {
        config.win_experience
    } else {
        config.loss_experience
    };
    add_experience(horse, xp, config);
}

/// What a rest produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestOutcome {
    pub training_points_gained: u32,
    /// Stat that received a free point, if the bonus roll hit.
    pub bonus_stat: Option<StatKind>,
}

/// Rest a horse: grant a few training points and maybe a free stat point.
///
/// The free point is paid for with one of the points just granted, so the
/// training call cannot normally fail; if it does, the rest still counts.
pub fn rest<R: Rng + ?Sized>(
    horse: &mut Horse,
    rng: &mut R,
    config: &ProgressionConfig,
) -> RestOutcome {
    let (lo, hi) = (
        config.rest_points_min.min(config.rest_points_max),
        config.rest_points_max.max(config.rest_points_min),
    );
    let gained = rng.gen_range(lo..=hi);
    horse.training_points = horse.training_points.saturating_add(gained);

    let mut bonus_stat = None;
    if rng.gen_bool(config.rest_stat_chance.clamp(0.0, 1.0)) {
        if let Some(&stat) = StatKind::ALL.choose(rng) {
            match train_stat(horse, stat, 1) {
                Ok(_) => bonus_stat = Some(stat),
                Err(e) => debug!("{}: rest bonus on {} skipped: {}", horse.name, stat, e),
            }
        }
    }

    RestOutcome {
        training_points_gained: gained,
        bonus_stat,
    }
}

/// Suggested next training target: the weakest stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecommendation {
    pub stat: StatKind,
    pub current_value: u8,
    /// Points that would take the stat to 100 (at least 1).
    pub points_needed: u32,
    pub training_points_available: u32,
    pub can_train: bool,
}

pub fn training_recommendation(horse: &Horse) -> TrainingRecommendation {
    let (stat, current_value) = horse.stats.lowest();
    TrainingRecommendation {
        stat,
        current_value,
        points_needed: (STAT_MAX as u32).saturating_sub(current_value as u32).max(1),
        training_points_available: horse.training_points,
        can_train: horse.training_points >= 1,
    }
}
