//! Integration tests for the game service over the in-memory store.
//!
//! Exercises: schedule → run_race → persisted results and horses,
//! transactional failure, and resuming from a snapshot.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use paddock_logic::config::GameConfig;
use paddock_logic::horse::{Horse, HorseId, OwnerId};
use paddock_logic::race::Race;
use paddock_logic::statistics::RaceStatistics;
use paddock_logic::stats::StatBlock;
use paddock_logic::ValidationError;
use paddock_store::{GameService, MemoryStore, ServiceError, Store};

// ── Helpers ────────────────────────────────────────────────────────────

fn service_with(store: MemoryStore, seed: u64) -> GameService<StdRng> {
    GameService::new(store, GameConfig::default(), StdRng::seed_from_u64(seed))
}

/// Register `n` horses with strictly increasing stats. Returns ids weakest first.
fn register_field(svc: &mut GameService<StdRng>, n: usize) -> Vec<HorseId> {
    let owner = OwnerId::new();
    (0..n)
        .map(|i| {
            let horse = Horse::with_stats(
                format!("Entrant {i}"),
                owner,
                StatBlock::uniform(30 + 4 * i as u8),
            );
            svc.register_horse(horse).unwrap()
        })
        .collect()
}

// ── Race day ───────────────────────────────────────────────────────────

#[test]
fn run_race_enters_the_best_horses_up_to_the_cap() {
    let mut svc = service_with(MemoryStore::new(), 1);
    let ids = register_field(&mut svc, 10);
    let race = Race::new("Capped", Utc::now()).with_max_participants(6);
    let race_id = svc.schedule_race(race).unwrap();

    let results = svc.run_race(race_id).unwrap();
    assert_eq!(results.len(), 6);

    let entered: Vec<HorseId> = results.iter().map(|r| r.horse_id()).collect();
    for weak in &ids[..4] {
        assert!(!entered.contains(weak), "weak horse was entered");
        assert_eq!(svc.horse(*weak).unwrap().races_run, 0);
    }
    for strong in &ids[4..] {
        assert!(entered.contains(strong));
    }
}

#[test]
fn persisted_results_match_horse_records() {
    let mut svc = service_with(MemoryStore::new(), 2);
    register_field(&mut svc, 5);
    let race_id = svc.schedule_race(Race::new("Ledger", Utc::now())).unwrap();
    svc.run_race(race_id).unwrap();

    let stored = svc.race_results(race_id).unwrap();
    let positions: Vec<u32> = stored.iter().map(|r| r.position()).collect();
    assert_eq!(positions, vec![1, 2, 3, 4, 5]);

    for result in &stored {
        let horse = svc.horse(result.horse_id()).unwrap();
        assert_eq!(horse.total_earnings, result.earnings() as u64);
        assert_eq!(horse.races_won, u32::from(result.won()));
        let expected_xp = if result.won() { 50 } else { 20 };
        assert_eq!(horse.experience, expected_xp);
    }

    match svc.race_statistics(race_id).unwrap() {
        RaceStatistics::Summary {
            total_participants,
            total_prize_pool,
            ..
        } => {
            assert_eq!(total_participants, 5);
            // 1000 + 300 + 200 + 100 + 50
            assert_eq!(total_prize_pool, 1650);
        }
        RaceStatistics::NoResults => panic!("race has results"),
    }
}

#[test]
fn walkover_fails_cleanly_and_race_can_run_later() {
    let mut svc = service_with(MemoryStore::new(), 3);
    register_field(&mut svc, 1);
    let race_id = svc.schedule_race(Race::new("Walkover", Utc::now())).unwrap();
    let before = svc.store().clone();

    let err = svc.run_race(race_id).unwrap_err();
    assert_eq!(
        err,
        ServiceError::Validation(ValidationError::TooFewParticipants {
            required: 2,
            found: 1
        })
    );
    assert_eq!(svc.store(), &before);

    register_field(&mut svc, 3);
    let results = svc.run_race(race_id).unwrap();
    assert_eq!(results.len(), 4);
    assert!(svc.store().race(race_id).unwrap().is_completed());
}

#[test]
fn duplicate_entry_is_rejected() {
    let mut svc = service_with(MemoryStore::new(), 4);
    let ids = register_field(&mut svc, 2);
    let race_id = svc.schedule_race(Race::new("Twice", Utc::now())).unwrap();

    let err = svc
        .simulate_race(race_id, &[ids[0], ids[1], ids[0]])
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::Validation(ValidationError::DuplicateParticipant(ids[0]))
    );
    assert_eq!(svc.store().result_count(), 0);
}

// ── Persistence ────────────────────────────────────────────────────────

#[test]
fn season_resumes_from_snapshot() {
    let mut svc = service_with(MemoryStore::new(), 5);
    let ids = register_field(&mut svc, 4);
    let first = svc.schedule_race(Race::new("Before Save", Utc::now())).unwrap();
    svc.run_race(first).unwrap();

    let mut buffer = Vec::new();
    svc.store().save_snapshot(&mut buffer).unwrap();
    let restored = MemoryStore::load_snapshot(&buffer[..]).unwrap();
    assert_eq!(&restored, svc.store());

    let mut resumed = service_with(restored, 6);
    assert!(matches!(
        resumed.run_race(first),
        Err(ServiceError::Validation(ValidationError::RaceAlreadyCompleted(_)))
    ));

    let second = resumed.schedule_race(Race::new("After Load", Utc::now())).unwrap();
    resumed.run_race(second).unwrap();
    for id in &ids {
        assert_eq!(resumed.horse(*id).unwrap().races_run, 2);
    }
    assert_eq!(resumed.store().result_count(), 8);
}

#[test]
fn report_reflects_race_history() {
    let mut svc = service_with(MemoryStore::new(), 7);
    register_field(&mut svc, 2);
    let race_id = svc.schedule_race(Race::new("Match", Utc::now())).unwrap();
    let results = svc.run_race(race_id).unwrap();

    let winner = svc.horse_report(results[0].horse_id()).unwrap();
    assert_eq!(winner.races_run, 1);
    assert_eq!(winner.win_rate, 1.0);
    assert_eq!(winner.total_earnings, 1000);

    let loser = svc.horse_report(results[1].horse_id()).unwrap();
    assert_eq!(loser.win_rate, 0.0);
    assert_eq!(loser.total_earnings, 300);

    assert!(svc.horse_report(HorseId::new()).unwrap_err().is_not_found());
}
