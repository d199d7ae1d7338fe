//! Race scoring, ranking, payouts, and race times.
//!
//! A race is resolved in two passes:
//!
//! 1. Each runner gets a raw score from its stats, level, and experience,
//!    scaled by a small jitter (±10% by default). Runners are ranked.
//! 2. The volatility pass scales every score by a wider independent
//!    multiplier (0.7–1.3 by default), letting upsets happen, and the
//!    field is re-ranked. This is the finishing order.
//!
//! Exact ties keep the previous order: input order in the first pass,
//! first-pass rank in the second. The tie-break is part of the comparator
//! so the result does not depend on sort stability.
//!
//! Payouts come from a fixed table of base-prize fractions; positions past
//! the end of the table get the last entry.

use std::cmp::Ordering;

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::horse::Horse;
use crate::progression::{record_race_result, ProgressionConfig};
use crate::race::{Race, RaceResult};

/// Half-open multiplier range `[min, max)` for random score scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JitterRange {
    pub min: f64,
    pub max: f64,
}

impl JitterRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Draw a multiplier. A degenerate range always yields `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

/// Scoring and payout constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub min_participants: usize,
    pub level_weight: f64,
    /// Weight of `ln(experience + 1)` in the raw score.
    pub experience_weight: f64,
    pub performance_jitter: JitterRange,
    pub volatility: JitterRange,
    /// Seconds for a runner scoring exactly `time_pivot_score`.
    pub base_time: f64,
    pub min_time: f64,
    pub time_pivot_score: f64,
    /// Seconds saved per score point above the pivot.
    pub seconds_per_point: f64,
    /// Fraction of the base prize paid per finishing position.
    pub payout_table: Vec<f64>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            min_participants: 2,
            level_weight: 0.1,
            experience_weight: 0.05,
            performance_jitter: JitterRange::new(0.9, 1.1),
            volatility: JitterRange::new(0.7, 1.3),
            base_time: 120.0,
            min_time: 60.0,
            time_pivot_score: 50.0,
            seconds_per_point: 0.1,
            payout_table: vec![1.0, 0.3, 0.2, 0.1, 0.05, 0.02, 0.01, 0.005],
        }
    }
}

impl RaceConfig {
    /// Raw score before any randomness.
    pub fn base_score(&self, horse: &Horse) -> f64 {
        horse.race_performance()
            + horse.level as f64 * self.level_weight
            + (horse.experience as f64).ln_1p() * self.experience_weight
    }

    /// Finishing time in seconds for an adjusted score. Never below `min_time`.
    pub fn race_time(&self, score: f64) -> f64 {
        (self.base_time - (score - self.time_pivot_score) * self.seconds_per_point).max(self.min_time)
    }

    /// Prize multiplier for a 1-based position.
    pub fn payout_fraction(&self, position: u32) -> f64 {
        if self.payout_table.is_empty() || position == 0 {
            return 0.0;
        }
        let idx = (position as usize - 1).min(self.payout_table.len() - 1);
        self.payout_table[idx]
    }

    /// Prize money for a 1-based position, rounded down.
    pub fn earnings(&self, position: u32, base_prize: u32) -> u32 {
        (base_prize as f64 * self.payout_fraction(position)).floor() as u32
    }

    /// Upper bound on total prize money paid to a field of `field_size`.
    pub fn max_total_payout(&self, base_prize: u32, field_size: usize) -> f64 {
        (1..=field_size as u32)
            .map(|p| base_prize as f64 * self.payout_fraction(p))
            .sum()
    }
}

/// A runner's score as it moves through the two passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredEntry {
    /// Index into the participant slice.
    pub index: usize,
    pub score: f64,
    /// Rank after the first pass (0-based); tie-break for the second.
    pub first_pass_rank: usize,
}

fn descending(a: &ScoredEntry, b: &ScoredEntry, tie: impl Fn(&ScoredEntry) -> usize) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| tie(a).cmp(&tie(b)))
}

/// Run both scoring passes and return the final order, best first.
///
/// Pure with respect to the horses; only the RNG advances.
pub fn rank_field<R: Rng + ?Sized>(
    participants: &[Horse],
    rng: &mut R,
    config: &RaceConfig,
) -> Vec<ScoredEntry> {
    let mut field: Vec<ScoredEntry> = participants
        .iter()
        .enumerate()
        .map(|(index, horse)| ScoredEntry {
            index,
            score: config.base_score(horse) * config.performance_jitter.sample(rng),
            first_pass_rank: 0,
        })
        .collect();

    field.sort_by(|a, b| descending(a, b, |e| e.index));
    for (rank, entry) in field.iter_mut().enumerate() {
        entry.first_pass_rank = rank;
        entry.score *= config.volatility.sample(rng);
    }

    field.sort_by(|a, b| descending(a, b, |e| e.first_pass_rank));
    field
}

/// Simulate `race` with `participants`, updating each horse's record.
///
/// Horses are updated in finishing order. Returned results are ordered by
/// position. Nothing is touched if a precondition fails. Marking the race
/// completed and persisting the horses and results is the caller's job.
pub fn simulate_race<R: Rng + ?Sized>(
    race: &Race,
    participants: &mut [Horse],
    rng: &mut R,
    config: &RaceConfig,
    progression: &ProgressionConfig,
) -> Result<Vec<RaceResult>, ValidationError> {
    if race.is_completed() {
        return Err(ValidationError::RaceAlreadyCompleted(race.id));
    }
    let required = config.min_participants.max(2);
    if participants.len() < required {
        return Err(ValidationError::TooFewParticipants {
            required,
            found: participants.len(),
        });
    }

    for (i, horse) in participants.iter().enumerate() {
        if participants[..i].iter().any(|h| h.id == horse.id) {
            return Err(ValidationError::DuplicateParticipant(horse.id));
        }
    }

    let ranking = rank_field(participants, rng, config);

    let mut results = Vec::with_capacity(ranking.len());
    for (slot, entry) in ranking.iter().enumerate() {
        let position = slot as u32 + 1;
        let horse = &mut participants[entry.index];
        let race_time = config.race_time(entry.score);
        let earnings = config.earnings(position, race.base_prize);

        debug!(
            "{}: #{} {} score {:.3} time {:.2}s earnings {}",
            race.name, position, horse.name, entry.score, race_time, earnings
        );

        record_race_result(horse, position == 1, earnings, progression);
        results.push(RaceResult::new(
            race.id,
            horse.id,
            position,
            earnings,
            race_time,
            entry.score,
        ));
    }

    if let Some(winner) = ranking.first() {
        info!(
            "{} simulated: {} runners, won by {}",
            race.name,
            results.len(),
            participants[winner.index].name
        );
    }
    Ok(results)
}
