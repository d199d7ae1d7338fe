//! Integration tests for a full race day.
//!
//! Exercises: recommend → simulate_race → progression → statistics,
//! then breeding from the horses that came through it.
//!
//! All tests are pure logic with seeded RNGs.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use paddock_logic::breeding::breed;
use paddock_logic::config::GameConfig;
use paddock_logic::horse::{Horse, OwnerId};
use paddock_logic::progression::{rest, train_stat};
use paddock_logic::race::Race;
use paddock_logic::recommend::recommend;
use paddock_logic::simulation::simulate_race;
use paddock_logic::statistics::{race_statistics, RaceStatistics};
use paddock_logic::stats::{StatBlock, StatKind};
use paddock_logic::ValidationError;

// ── Helpers ────────────────────────────────────────────────────────────

fn stable(n: usize) -> Vec<Horse> {
    let owner = OwnerId::new();
    (0..n)
        .map(|i| {
            let base = 35 + (i as i32 * 11) % 50;
            Horse::with_stats(
                format!("Stable {i}"),
                owner,
                StatBlock::new(base, base + 5, base - 3, base + 2, base),
            )
        })
        .collect()
}

/// Enter the recommended field for `race` and write the updated horses back.
fn run_race(
    roster: &mut [Horse],
    race: &Race,
    config: &GameConfig,
    rng: &mut StdRng,
) -> Result<Vec<paddock_logic::RaceResult>, ValidationError> {
    let entry_ids: Vec<_> = recommend(
        roster,
        race,
        race.max_participants as usize,
        &config.recommend,
    )
    .into_iter()
    .map(|h| h.id)
    .collect();

    let mut field: Vec<Horse> = entry_ids
        .iter()
        .filter_map(|id| roster.iter().find(|h| h.id == *id).cloned())
        .collect();
    let results = simulate_race(race, &mut field, rng, &config.race, &config.progression)?;

    for updated in field {
        if let Some(slot) = roster.iter_mut().find(|h| h.id == updated.id) {
            *slot = updated;
        }
    }
    Ok(results)
}

// ── Race day ───────────────────────────────────────────────────────────

#[test]
fn recommended_field_runs_and_summarizes() {
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut roster = stable(12);
    let race = Race::new("Tenno Sho", Utc::now());

    let results = run_race(&mut roster, &race, &config, &mut rng).unwrap();
    assert_eq!(results.len(), 8, "field capped at max participants");

    let ran: Vec<_> = roster.iter().filter(|h| h.races_run == 1).collect();
    assert_eq!(ran.len(), 8);
    assert_eq!(roster.iter().filter(|h| h.races_won == 1).count(), 1);

    match race_statistics(&results) {
        RaceStatistics::Summary {
            total_participants,
            fastest_time,
            average_time,
            total_prize_pool,
        } => {
            assert_eq!(total_participants, 8);
            assert!(fastest_time <= average_time);
            assert!(fastest_time >= 60.0);
            // 1000 + 300 + 200 + 100 + 50 + 20 + 10 + 5
            assert_eq!(total_prize_pool, 1685);
        }
        RaceStatistics::NoResults => panic!("expected a summary"),
    }
}

#[test]
fn winner_earnings_match_base_prize() {
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(7);
    let mut roster = stable(2);
    let race = Race::new("Match Race", Utc::now());

    let results = run_race(&mut roster, &race, &config, &mut rng).unwrap();
    assert_eq!(results[0].earnings(), 1000);
    assert_eq!(results[1].earnings(), 300);

    let winner = roster.iter().find(|h| h.id == results[0].horse_id()).unwrap();
    assert_eq!(winner.total_earnings, 1000);
    assert_eq!(winner.experience, 50);
}

#[test]
fn completed_race_cannot_be_rerun() {
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(1);
    let mut roster = stable(4);
    let mut race = Race::new("Once Only", Utc::now());

    run_race(&mut roster, &race, &config, &mut rng).unwrap();
    race.mark_completed().unwrap();
    let snapshot = roster.clone();

    let err = run_race(&mut roster, &race, &config, &mut rng).unwrap_err();
    assert_eq!(err, ValidationError::RaceAlreadyCompleted(race.id));
    assert_eq!(roster, snapshot);
}

#[test]
fn single_eligible_horse_is_not_a_race() {
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(1);
    let mut roster = stable(3);
    roster[0].races_run = 50;
    roster[1].races_run = 60;
    let race = Race::new("Walkover", Utc::now());

    let err = run_race(&mut roster, &race, &config, &mut rng).unwrap_err();
    assert!(matches!(err, ValidationError::TooFewParticipants { found: 1, .. }));
}

// ── Season → breeding ──────────────────────────────────────────────────

#[test]
fn season_produces_breedable_horses() {
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(31);
    let mut roster = stable(4);

    // 50 races at no less than 20 XP each reaches the 1000 XP needed for
    // level 5; the 50-race cap retires everyone right after.
    for day in 0..50 {
        let race = Race::new(format!("Day {day}"), Utc::now());
        run_race(&mut roster, &race, &config, &mut rng).unwrap();
    }

    for h in &roster {
        assert_eq!(h.races_run, 50);
        assert!(h.races_won <= h.races_run);
        assert!(h.level >= 5, "{} only reached level {}", h.name, h.level);
    }
    let wins: u32 = roster.iter().map(|h| h.races_won).sum();
    assert_eq!(wins, 50);

    let foal = breed(&roster[0], &roster[1], "Season Foal", None, &mut rng, &config.breeding)
        .unwrap();
    assert_eq!(foal.owner, roster[0].owner);
    assert_eq!(foal.level, 1);
    assert!(foal.stats.iter().all(|(_, v)| (1..=100).contains(&v)));
}

#[test]
fn training_and_rest_cycle() {
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(5);
    let mut horse = Horse::new("Gym Rat", OwnerId::new());

    let mut earned = 0;
    for _ in 0..10 {
        earned += rest(&mut horse, &mut rng, &config.progression).training_points_gained;
    }
    assert!((20..=40).contains(&earned));

    let available = horse.training_points;
    let before = horse.stats.get(StatKind::Speed);
    train_stat(&mut horse, StatKind::Speed, available).unwrap();
    assert_eq!(horse.training_points, 0);
    assert!(horse.stats.get(StatKind::Speed) > before);
    assert!(train_stat(&mut horse, StatKind::Speed, 1).is_err());
}
