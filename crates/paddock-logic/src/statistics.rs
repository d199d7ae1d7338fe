//! Summary of a race's results.

use serde::{Deserialize, Serialize};

use crate::race::RaceResult;

/// Aggregate over all results of one race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RaceStatistics {
    /// The race has no recorded results (not run yet, or unknown).
    NoResults,
    Summary {
        total_participants: usize,
        /// Seconds.
        average_time: f64,
        fastest_time: f64,
        total_prize_pool: u64,
    },
}

pub fn race_statistics(results: &[RaceResult]) -> RaceStatistics {
    if results.is_empty() {
        return RaceStatistics::NoResults;
    }

    let total_time: f64 = results.iter().map(|r| r.race_time()).sum();
    let fastest_time = results
        .iter()
        .map(|r| r.race_time())
        .fold(f64::INFINITY, f64::min);

    RaceStatistics::Summary {
        total_participants: results.len(),
        average_time: total_time / results.len() as f64,
        fastest_time,
        total_prize_pool: results.iter().map(|r| r.earnings() as u64).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horse::HorseId;
    use crate::race::RaceId;

    #[test]
    fn empty_results_report_none() {
        assert_eq!(race_statistics(&[]), RaceStatistics::NoResults);
    }

    #[test]
    fn summary_over_results() {
        let race = RaceId::new();
        let results = vec![
            RaceResult::new(race, HorseId::new(), 1, 1000, 110.0, 70.0),
            RaceResult::new(race, HorseId::new(), 2, 300, 114.0, 60.0),
            RaceResult::new(race, HorseId::new(), 3, 200, 121.0, 49.0),
        ];
        match race_statistics(&results) {
            RaceStatistics::Summary {
                total_participants,
                average_time,
                fastest_time,
                total_prize_pool,
            } => {
                assert_eq!(total_participants, 3);
                assert!((average_time - 115.0).abs() < 1e-9);
                assert!((fastest_time - 110.0).abs() < 1e-9);
                assert_eq!(total_prize_pool, 1500);
            }
            other => panic!("expected summary, got {other:?}"),
        }
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(RaceStatistics::NoResults).unwrap();
        assert_eq!(json["kind"], "no_results");
    }
}
