//! Foal creation from two proven parents.
//!
//! Each foal stat is the rounded parent average plus an independent
//! integer jitter in `-stat_jitter..=stat_jitter`, clamped to 1–100.
//! The foal always belongs to the sire's owner.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::horse::{Horse, Lineage, OwnerId};
use crate::stats::{StatBlock, StatKind};

/// Breeding eligibility thresholds and inheritance spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreedingConfig {
    pub min_level: u32,
    pub min_races_run: u32,
    /// Maximum absolute deviation from the parent average, per stat.
    pub stat_jitter: i32,
}

impl Default for BreedingConfig {
    fn default() -> Self {
        Self {
            min_level: 5,
            min_races_run: 3,
            stat_jitter: 10,
        }
    }
}

/// Check both parents against the level requirement, then the race
/// requirement. The first violation found is returned.
pub fn check_breeding_eligibility(
    sire: &Horse,
    dam: &Horse,
    config: &BreedingConfig,
) -> Result<(), ValidationError> {
    for parent in [sire, dam] {
        if parent.level < config.min_level {
            return Err(ValidationError::BreedingLevelTooLow {
                horse: parent.id,
                level: parent.level,
                required: config.min_level,
            });
        }
    }
    for parent in [sire, dam] {
        if parent.races_run < config.min_races_run {
            return Err(ValidationError::BreedingTooFewRaces {
                horse: parent.id,
                races_run: parent.races_run,
                required: config.min_races_run,
            });
        }
    }
    Ok(())
}

/// Inherit one stat: rounded average plus jitter, clamped.
fn inherit<R: Rng + ?Sized>(sire: u8, dam: u8, jitter: i32, rng: &mut R) -> i32 {
    let average = ((sire as f64 + dam as f64) / 2.0).round() as i32;
    let spread = jitter.abs();
    average + rng.gen_range(-spread..=spread)
}

/// Breed a foal named `name` from `sire` and `dam`.
///
/// `requested_owner` is accepted for interface parity with callers that
/// send one, but the foal is always assigned to the sire's owner.
pub fn breed<R: Rng + ?Sized>(
    sire: &Horse,
    dam: &Horse,
    name: impl Into<String>,
    requested_owner: Option<OwnerId>,
    rng: &mut R,
    config: &BreedingConfig,
) -> Result<Horse, ValidationError> {
    check_breeding_eligibility(sire, dam, config)?;

    if let Some(owner) = requested_owner.filter(|o| *o != sire.owner) {
        debug!(
            "ignoring requested owner {} for foal of {}; using sire's owner {}",
            owner, sire.name, sire.owner
        );
    }

    let mut stats = StatBlock::default();
    for kind in StatKind::ALL {
        let value = inherit(sire.stats.get(kind), dam.stats.get(kind), config.stat_jitter, rng);
        stats.set(kind, value);
    }

    let mut foal = Horse::with_stats(name, sire.owner, stats);
    foal.lineage = Lineage {
        sire: Some(sire.id),
        dam: Some(dam.id),
    };

    info!(
        "bred {} from {} x {} (total stats {})",
        foal.name,
        sire.name,
        dam.name,
        foal.total_stats()
    );
    Ok(foal)
}
