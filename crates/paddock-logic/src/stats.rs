//! The five horse stats and the clamped block that stores them.
//!
//! Every stat is an integer in [`STAT_MIN`]..=[`STAT_MAX`]. Writes go
//! through [`StatBlock::set`], which clamps, so the range holds no matter
//! how a stat is changed (training, resting, inheritance).
//!
//! ```
//! use paddock_logic::stats::{StatBlock, StatKind};
//!
//! let mut stats = StatBlock::default();
//! stats.set(StatKind::Speed, 250);
//! assert_eq!(stats.get(StatKind::Speed), 100);
//! assert_eq!(stats.total(), 100 + 4 * 50);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const STAT_MIN: u8 = 1;
pub const STAT_MAX: u8 = 100;
/// Starting value for every stat of a freshly registered horse.
pub const STAT_DEFAULT: u8 = 50;

/// One of the five trainable stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Speed,
    Stamina,
    Power,
    Guts,
    Intelligence,
}

impl StatKind {
    /// All stats in canonical order.
    pub const ALL: [StatKind; 5] = [
        StatKind::Speed,
        StatKind::Stamina,
        StatKind::Power,
        StatKind::Guts,
        StatKind::Intelligence,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatKind::Speed => "speed",
            StatKind::Stamina => "stamina",
            StatKind::Power => "power",
            StatKind::Guts => "guts",
            StatKind::Intelligence => "intelligence",
        }
    }

    /// Weight of this stat in [`StatBlock::race_performance`].
    pub fn performance_weight(self) -> f64 {
        match self {
            StatKind::Speed => 0.30,
            StatKind::Stamina => 0.25,
            StatKind::Power => 0.20,
            StatKind::Guts => 0.15,
            StatKind::Intelligence => 0.10,
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        StatKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| ValidationError::UnknownStat(s.to_string()))
    }
}

/// Current stat values for one horse.
///
/// Deserialized blocks go through [`StatBlock::new`], so saved data with
/// out-of-range stats loads clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawStatBlock")]
pub struct StatBlock {
    speed: u8,
    stamina: u8,
    power: u8,
    guts: u8,
    intelligence: u8,
}

/// Wire shape of [`StatBlock`] before clamping.
#[derive(Deserialize)]
struct RawStatBlock {
    speed: u8,
    stamina: u8,
    power: u8,
    guts: u8,
    intelligence: u8,
}

impl From<RawStatBlock> for StatBlock {
    fn from(raw: RawStatBlock) -> Self {
        Self::new(
            i32::from(raw.speed),
            i32::from(raw.stamina),
            i32::from(raw.power),
            i32::from(raw.guts),
            i32::from(raw.intelligence),
        )
    }
}

impl Default for StatBlock {
    fn default() -> Self {
        Self::uniform(STAT_DEFAULT)
    }
}

impl StatBlock {
    /// Build a block from raw values, clamping each into range.
    pub fn new(speed: i32, stamina: i32, power: i32, guts: i32, intelligence: i32) -> Self {
        let mut block = Self::default();
        block.set(StatKind::Speed, speed);
        block.set(StatKind::Stamina, stamina);
        block.set(StatKind::Power, power);
        block.set(StatKind::Guts, guts);
        block.set(StatKind::Intelligence, intelligence);
        block
    }

    /// Every stat set to the same value (clamped).
    pub fn uniform(value: u8) -> Self {
        let v = value.clamp(STAT_MIN, STAT_MAX);
        Self {
            speed: v,
            stamina: v,
            power: v,
            guts: v,
            intelligence: v,
        }
    }

    pub fn get(&self, kind: StatKind) -> u8 {
        match kind {
            StatKind::Speed => self.speed,
            StatKind::Stamina => self.stamina,
            StatKind::Power => self.power,
            StatKind::Guts => self.guts,
            StatKind::Intelligence => self.intelligence,
        }
    }

    /// Set a stat, clamped to 1–100. Returns the stored value.
    pub fn set(&mut self, kind: StatKind, value: i32) -> u8 {
        let v = value.clamp(STAT_MIN as i32, STAT_MAX as i32) as u8;
        match kind {
            StatKind::Speed => self.speed = v,
            StatKind::Stamina => self.stamina = v,
            StatKind::Power => self.power = v,
            StatKind::Guts => self.guts = v,
            StatKind::Intelligence => self.intelligence = v,
        }
        v
    }

    /// Sum of all five stats.
    pub fn total(&self) -> u32 {
        StatKind::ALL.iter().map(|&k| self.get(k) as u32).sum()
    }

    /// Weighted stat sum used to rank horses.
    ///
    /// `0.30·speed + 0.25·stamina + 0.20·power + 0.15·guts + 0.10·intelligence`.
    /// The weights sum to 1.0, so a horse with every stat at `n` scores `n`.
    pub fn race_performance(&self) -> f64 {
        StatKind::ALL
            .iter()
            .map(|&k| self.get(k) as f64 * k.performance_weight())
            .sum()
    }

    /// The weakest stat. Ties resolve to the first in [`StatKind::ALL`].
    pub fn lowest(&self) -> (StatKind, u8) {
        let mut best = (StatKind::Speed, self.speed);
        for kind in StatKind::ALL.into_iter().skip(1) {
            let value = self.get(kind);
            if value < best.1 {
                best = (kind, value);
            }
        }
        best
    }

    /// Iterate `(kind, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (StatKind, u8)> + '_ {
        StatKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialized_stats_are_clamped() {
        let json = r#"{"speed":0,"stamina":250,"power":50,"guts":100,"intelligence":1}"#;
        let block: StatBlock = serde_json::from_str(json).unwrap();
        assert_eq!(block.get(StatKind::Speed), 1);
        assert_eq!(block.get(StatKind::Stamina), 100);
        assert_eq!(block.get(StatKind::Power), 50);
        assert_eq!(block.get(StatKind::Guts), 100);
        assert_eq!(block.get(StatKind::Intelligence), 1);
    }

    #[test]
    fn weights_sum_to_one() {
        let sum: f64 = StatKind::ALL.iter().map(|k| k.performance_weight()).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn uniform_block_performance_equals_value() {
        let block = StatBlock::uniform(70);
        assert!((block.race_performance() - 70.0).abs() < 1e-9);
    }

    #[test]
    fn race_performance_weighted() {
        let block = StatBlock::new(100, 0, 0, 0, 0);
        // stamina..intelligence clamp up to 1
        let expected = 30.0 + 0.25 + 0.20 + 0.15 + 0.10;
        assert!((block.race_performance() - expected).abs() < 1e-9);
    }

    #[test]
    fn set_clamps_both_ends() {
        let mut block = StatBlock::default();
        assert_eq!(block.set(StatKind::Guts, 500), 100);
        assert_eq!(block.set(StatKind::Guts, -20), 1);
        assert_eq!(block.get(StatKind::Guts), 1);
    }

    #[test]
    fn default_is_fifty_everywhere() {
        let block = StatBlock::default();
        assert!(block.iter().all(|(_, v)| v == 50));
        assert_eq!(block.total(), 250);
    }

    #[test]
    fn lowest_prefers_first_on_tie() {
        let block = StatBlock::new(60, 40, 40, 70, 80);
        assert_eq!(block.lowest(), (StatKind::Stamina, 40));
        assert_eq!(StatBlock::default().lowest(), (StatKind::Speed, 50));
    }

    #[test]
    fn parse_known_names() {
        assert_eq!("speed".parse::<StatKind>(), Ok(StatKind::Speed));
        assert_eq!("Intelligence".parse::<StatKind>(), Ok(StatKind::Intelligence));
        assert_eq!(" guts ".parse::<StatKind>(), Ok(StatKind::Guts));
    }

    #[test]
    fn parse_unknown_name_fails() {
        assert_eq!(
            "luck".parse::<StatKind>(),
            Err(ValidationError::UnknownStat("luck".into()))
        );
    }
}
