//! Horse entity, identifiers, and lineage.
//!
//! Ownership and lineage are plain identifiers. Resolving a sire, dam, or
//! owner to a full record is the store's job; the core never walks a
//! live object graph.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stats::StatBlock;

/// Unique identifier of a horse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HorseId(pub Uuid);

impl HorseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HorseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HorseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Identifier of the user owning a horse. Users live outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(pub Uuid);

impl OwnerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Weak, historical references to a horse's parents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    pub sire: Option<HorseId>,
    pub dam: Option<HorseId>,
}

impl Lineage {
    pub fn is_foundation(&self) -> bool {
        self.sire.is_none() && self.dam.is_none()
    }
}

/// A racehorse and its progression state.
///
/// Counters (`races_won`, `races_run`, `total_earnings`) only move up, and
/// only through [`crate::progression::record_race_result`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horse {
    pub id: HorseId,
    pub name: String,
    pub owner: OwnerId,
    pub stats: StatBlock,
    pub level: u32,
    /// Experience toward the next level; resets on level-up.
    pub experience: u64,
    pub training_points: u32,
    pub races_won: u32,
    pub races_run: u32,
    pub total_earnings: u64,
    pub lineage: Lineage,
}

impl Horse {
    /// A freshly registered horse: level 1, all stats 50, no history.
    pub fn new(name: impl Into<String>, owner: OwnerId) -> Self {
        Self::with_stats(name, owner, StatBlock::default())
    }

    pub fn with_stats(name: impl Into<String>, owner: OwnerId, stats: StatBlock) -> Self {
        Self {
            id: HorseId::new(),
            name: name.into(),
            owner,
            stats,
            level: 1,
            experience: 0,
            training_points: 0,
            races_won: 0,
            races_run: 0,
            total_earnings: 0,
            lineage: Lineage::default(),
        }
    }

    pub fn total_stats(&self) -> u32 {
        self.stats.total()
    }

    /// Static weighted stat score; see [`StatBlock::race_performance`].
    pub fn race_performance(&self) -> f64 {
        self.stats.race_performance()
    }

    /// Fraction of races won, 0.0 for a horse that has never raced.
    pub fn win_rate(&self) -> f64 {
        if self.races_run == 0 {
            0.0
        } else {
            self.races_won as f64 / self.races_run as f64
        }
    }
}

/// Flattened view of a horse for display and reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorseReport {
    pub id: HorseId,
    pub name: String,
    pub level: u32,
    pub experience: u64,
    pub training_points: u32,
    pub stats: StatBlock,
    pub total_stats: u32,
    pub race_performance: f64,
    pub races_won: u32,
    pub races_run: u32,
    pub total_earnings: u64,
    pub win_rate: f64,
}

impl From<&Horse> for HorseReport {
    fn from(horse: &Horse) -> Self {
        Self {
            id: horse.id,
            name: horse.name.clone(),
            level: horse.level,
            experience: horse.experience,
            training_points: horse.training_points,
            stats: horse.stats,
            total_stats: horse.total_stats(),
            race_performance: horse.race_performance(),
            races_won: horse.races_won,
            races_run: horse.races_run,
            total_earnings: horse.total_earnings,
            win_rate: horse.win_rate(),
        }
    }
}
