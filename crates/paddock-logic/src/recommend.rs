//! Entry recommendation: filter a roster and rank by race performance.
//!
//! The default filter only enforces a level floor and a career cap on
//! races run; it does not look at the race's level band. Set
//! [`RecommendConfig::respect_level_band`] to also require
//! [`Race::is_eligible_for_horse`].

use serde::{Deserialize, Serialize};

use crate::horse::Horse;
use crate::race::Race;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    pub min_level: u32,
    /// Horses with this many races or more are retired from entry lists.
    pub max_races_run: u32,
    pub respect_level_band: bool,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            min_level: 1,
            max_races_run: 50,
            respect_level_band: false,
        }
    }
}

impl RecommendConfig {
    pub fn is_eligible(&self, horse: &Horse, race: &Race) -> bool {
        horse.level >= self.min_level
            && horse.races_run < self.max_races_run
            && (!self.respect_level_band || race.is_eligible_for_horse(horse))
    }
}

/// Top `count` eligible horses by [`Horse::race_performance`], best first.
/// Equal performance keeps roster order.
pub fn recommend<'a>(
    all_horses: &'a [Horse],
    race: &Race,
    count: usize,
    config: &RecommendConfig,
) -> Vec<&'a Horse> {
    let mut eligible: Vec<&Horse> = all_horses
        .iter()
        .filter(|h| config.is_eligible(h, race))
        .collect();
    eligible.sort_by(|a, b| b.race_performance().total_cmp(&a.race_performance()));
    eligible.truncate(count);
    eligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horse::OwnerId;
    use crate::stats::StatBlock;
    use chrono::Utc;

    fn roster() -> Vec<Horse> {
        let owner = OwnerId::new();
        [55, 90, 70, 30, 85]
            .into_iter()
            .enumerate()
            .map(|(i, v)| Horse::with_stats(format!("H{i}"), owner, StatBlock::uniform(v)))
            .collect()
    }

    fn names(horses: &[&Horse]) -> Vec<String> {
        horses.iter().map(|h| h.name.clone()).collect()
    }

    #[test]
    fn ranks_by_performance_and_limits() {
        let horses = roster();
        let race = Race::new("Open", Utc::now());
        let picked = recommend(&horses, &race, 3, &RecommendConfig::default());
        assert_eq!(names(&picked), vec!["H1", "H4", "H2"]);
    }

    #[test]
    fn veterans_are_filtered() {
        let mut horses = roster();
        horses[1].races_run = 50;
        horses[4].races_run = 49;
        let race = Race::new("Open", Utc::now());
        let picked = recommend(&horses, &race, 2, &RecommendConfig::default());
        assert_eq!(names(&picked), vec!["H4", "H2"]);
    }

    #[test]
    fn level_band_ignored_by_default() {
        let mut horses = roster();
        horses[1].level = 20;
        let race = Race::new("Maiden", Utc::now()).with_prize_and_band(500, 1, 3);
        let picked = recommend(&horses, &race, 1, &RecommendConfig::default());
        assert_eq!(names(&picked), vec!["H1"]);
    }

    #[test]
    fn level_band_applied_when_configured() {
        let mut horses = roster();
        horses[1].level = 20;
        let race = Race::new("Maiden", Utc::now()).with_prize_and_band(500, 1, 3);
        let config = RecommendConfig {
            respect_level_band: true,
            ..Default::default()
        };
        let picked = recommend(&horses, &race, 1, &config);
        assert_eq!(names(&picked), vec!["H4"]);
    }

    #[test]
    fn count_larger_than_roster() {
        let horses = roster();
        let race = Race::new("Open", Utc::now());
        assert_eq!(recommend(&horses, &race, 50, &RecommendConfig::default()).len(), 5);
        assert!(recommend(&horses, &race, 0, &RecommendConfig::default()).is_empty());
    }

    #[test]
    fn ties_keep_roster_order() {
        let owner = OwnerId::new();
        let horses: Vec<Horse> = (0..4).map(|i| Horse::new(format!("T{i}"), owner)).collect();
        let race = Race::new("Open", Utc::now());
        let picked = recommend(&horses, &race, 4, &RecommendConfig::default());
        assert_eq!(names(&picked), vec!["T0", "T1", "T2", "T3"]);
    }
}
