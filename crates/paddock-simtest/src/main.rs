//! Paddock Headless Season Harness
//!
//! Plays a seeded season over the fixture roster through `GameService`
//! and checks the game's invariants after every step. Runs entirely
//! in-process with the in-memory store.
//!
//! Usage:
//!   cargo run -p paddock-simtest
//!   cargo run -p paddock-simtest -- --verbose --seed 42

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use paddock_logic::config::GameConfig;
use paddock_logic::horse::{Horse, HorseId, OwnerId};
use paddock_logic::race::{Race, RaceId, RaceType, TrackCondition};
use paddock_logic::statistics::RaceStatistics;
use paddock_logic::stats::{StatBlock, StatKind, STAT_MAX, STAT_MIN};
use paddock_logic::ValidationError;
use paddock_store::{GameService, MemoryStore, ServiceError, Store};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

// ── Fixtures ────────────────────────────────────────────────────────────
const ROSTER_JSON: &str = include_str!("../../../data/roster.json");
const CONFIG_JSON: &str = include_str!("../../../data/game_config.json");

const DEFAULT_SEED: u64 = 20240501;
/// Enough races for every roster horse to reach the career cap.
const SEASON_RACES: usize = 100;

#[derive(Debug, Deserialize)]
struct RosterEntry {
    name: String,
    stable: String,
    speed: i32,
    stamina: i32,
    power: i32,
    guts: i32,
    intelligence: i32,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

fn seed_arg() -> u64 {
    let args: Vec<String> = std::env::args().collect();
    args.windows(2)
        .find(|w| w[0] == "--seed")
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(DEFAULT_SEED)
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let seed = seed_arg();
    println!("=== Paddock Season Harness (seed {}) ===\n", seed);

    let mut results = Vec::new();

    // 1. Config fixture
    let config = validate_config(&mut results).unwrap_or_default();

    // 2. Roster fixture
    let roster = validate_roster(&mut results);

    let mut service = GameService::new(MemoryStore::new(), config, StdRng::seed_from_u64(seed));
    let ids: Vec<HorseId> = roster
        .into_iter()
        .filter_map(|h| service.register_horse(h).ok())
        .collect();

    // 3. Season of races
    results.extend(play_season(&mut service, verbose));

    // 4. Career totals after the season
    results.extend(validate_careers(&service, &ids));

    // 5. Breeding from retired horses
    results.extend(validate_breeding(&mut service, &ids));

    // 6. Training and rest
    results.extend(validate_training(&mut service, &ids, verbose));

    // 7. Snapshot round trip
    results.extend(validate_snapshot(service.store()));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Config ───────────────────────────────────────────────────────────

fn validate_config(results: &mut Vec<TestResult>) -> Option<GameConfig> {
    println!("--- Config ---");

    let defaults = GameConfig::default();
    let default_errors = defaults.validate();
    results.push(check(
        "config_defaults_valid",
        default_errors.is_empty(),
        format!("{} errors in built-in defaults", default_errors.len()),
    ));

    match GameConfig::load_json(CONFIG_JSON) {
        Ok(config) => {
            results.push(check(
                "config_fixture_matches_defaults",
                config == defaults,
                "fixture restates the documented constants".into(),
            ));
            Some(config)
        }
        Err(e) => {
            results.push(check("config_fixture_loads", false, e.to_string()));
            None
        }
    }
}

// ── 2. Roster ───────────────────────────────────────────────────────────

fn validate_roster(results: &mut Vec<TestResult>) -> Vec<Horse> {
    println!("--- Roster ---");

    let entries: Vec<RosterEntry> = match serde_json::from_str(ROSTER_JSON) {
        Ok(r) => r,
        Err(e) => {
            results.push(check("roster_parse", false, format!("JSON parse error: {}", e)));
            return Vec::new();
        }
    };

    results.push(check(
        "roster_fills_two_fields",
        entries.len() >= 16,
        format!("{} horses loaded", entries.len()),
    ));

    let out_of_range: Vec<&str> = entries
        .iter()
        .filter(|e| {
            [e.speed, e.stamina, e.power, e.guts, e.intelligence]
                .iter()
                .any(|v| *v < STAT_MIN as i32 || *v > STAT_MAX as i32)
        })
        .map(|e| e.name.as_str())
        .collect();
    results.push(check(
        "roster_stats_in_range",
        out_of_range.is_empty(),
        if out_of_range.is_empty() {
            "all stats within 1..=100".into()
        } else {
            format!("out of range: {:?}", out_of_range)
        },
    ));

    let mut owners: BTreeMap<String, OwnerId> = BTreeMap::new();
    entries
        .into_iter()
        .map(|e| {
            let owner = *owners.entry(e.stable).or_insert_with(OwnerId::new);
            Horse::with_stats(
                e.name,
                owner,
                StatBlock::new(e.speed, e.stamina, e.power, e.guts, e.intelligence),
            )
        })
        .collect()
}

// ── 3. Season ───────────────────────────────────────────────────────────

fn schedule(service: &mut GameService<StdRng>, i: usize) -> Result<RaceId, ServiceError> {
    let conditions = [
        TrackCondition::Good,
        TrackCondition::Firm,
        TrackCondition::Soft,
        TrackCondition::Heavy,
    ];
    let mut race = Race::new(format!("Season Race {}", i + 1), Utc::now() + Duration::days(i as i64))
        .with_prize_and_band(500 + (i as u32 % 5) * 250, 1, 10);
    race.track_condition = conditions[i % conditions.len()];
    if i % 10 == 9 {
        race.race_type = RaceType::Stakes;
    }
    service.schedule_race(race)
}

fn play_season(service: &mut GameService<StdRng>, verbose: bool) -> Vec<TestResult> {
    println!("--- Season ({} races) ---", SEASON_RACES);
    let mut results = Vec::new();

    let mut dense = 0;
    let mut bounded = 0;
    let mut winner_paid = 0;
    let mut summaries = 0;
    let mut failures = Vec::new();

    for i in 0..SEASON_RACES {
        let race_id = match schedule(service, i) {
            Ok(id) => id,
            Err(e) => {
                failures.push(format!("race {}: {}", i + 1, e));
                continue;
            }
        };
        let race = match service.store().race(race_id) {
            Ok(r) => r,
            Err(e) => {
                failures.push(e.to_string());
                continue;
            }
        };
        let race_results = match service.run_race(race_id) {
            Ok(r) => r,
            Err(e) => {
                failures.push(format!("race {}: {}", i + 1, e));
                continue;
            }
        };

        let n = race_results.len();
        let mut positions: Vec<u32> = race_results.iter().map(|r| r.position()).collect();
        positions.sort_unstable();
        if positions == (1..=n as u32).collect::<Vec<_>>() {
            dense += 1;
        }

        let paid: u64 = race_results.iter().map(|r| r.earnings() as u64).sum();
        let cap = service.config().race.max_total_payout(race.base_prize, n);
        if paid as f64 <= cap {
            bounded += 1;
        }

        if race_results
            .first()
            .is_some_and(|r| r.won() && r.earnings() == race.base_prize)
        {
            winner_paid += 1;
        }

        if let Ok(RaceStatistics::Summary {
            total_participants,
            average_time,
            fastest_time,
            total_prize_pool,
        }) = service.race_statistics(race_id)
        {
            if total_participants == n && fastest_time <= average_time && total_prize_pool == paid {
                summaries += 1;
            }
        }

        if verbose && i % 10 == 0 {
            println!("  race {:>3}: {} runners, {} paid", i + 1, n, paid);
        }
    }

    results.push(check(
        "season_races_run",
        failures.is_empty(),
        if failures.is_empty() {
            format!("{} races completed", SEASON_RACES)
        } else {
            failures.join("; ")
        },
    ));
    results.push(check(
        "positions_dense",
        dense == SEASON_RACES,
        format!("{}/{} races with positions 1..N", dense, SEASON_RACES),
    ));
    results.push(check(
        "payout_bounded",
        bounded == SEASON_RACES,
        format!("{}/{} races within the payout table", bounded, SEASON_RACES),
    ));
    results.push(check(
        "winner_takes_base_prize",
        winner_paid == SEASON_RACES,
        format!("{}/{} winners paid the full prize", winner_paid, SEASON_RACES),
    ));
    results.push(check(
        "statistics_consistent",
        summaries == SEASON_RACES,
        format!("{}/{} summaries agree with results", summaries, SEASON_RACES),
    ));

    // A completed race must not run twice, and the failure must leave no trace.
    let rerun = service.store().races().next().map(|r| r.id);
    if let Some(race_id) = rerun {
        let before = service.store().clone();
        let outcome = service.run_race(race_id);
        results.push(check(
            "completed_race_rejected",
            matches!(
                outcome,
                Err(ServiceError::Validation(ValidationError::RaceAlreadyCompleted(_)))
            ) && service.store() == &before,
            "rerun refused with store unchanged".into(),
        ));
    }

    results
}

// ── 4. Careers ──────────────────────────────────────────────────────────

fn validate_careers(service: &GameService<StdRng>, ids: &[HorseId]) -> Vec<TestResult> {
    println!("--- Careers ---");
    let mut results = Vec::new();
    let progression = &service.config().progression;
    let cap = service.config().recommend.max_races_run;

    let horses: Vec<Horse> = ids.iter().filter_map(|id| service.horse(*id).ok()).collect();

    let capped = horses.iter().filter(|h| h.races_run == cap).count();
    results.push(check(
        "careers_reach_cap",
        capped == horses.len(),
        format!("{}/{} horses ran {} races", capped, horses.len(), cap),
    ));

    let wins: u32 = horses.iter().map(|h| h.races_won).sum();
    results.push(check(
        "one_winner_per_race",
        wins as usize == SEASON_RACES,
        format!("{} wins over {} races", wins, SEASON_RACES),
    ));

    let earned: u64 = horses.iter().map(|h| h.total_earnings).sum();
    let paid: u64 = service
        .store()
        .races()
        .flat_map(|r| service.store().results_by_race(r.id))
        .map(|r| r.earnings() as u64)
        .sum();
    results.push(check(
        "earnings_match_results",
        earned == paid,
        format!("horses hold {}, results paid {}", earned, paid),
    ));

    let bad_level: Vec<&str> = horses
        .iter()
        .filter(|h| {
            h.experience >= h.level as u64 * progression.experience_per_level
                || h.training_points != (h.level - 1) * progression.training_points_per_level
        })
        .map(|h| h.name.as_str())
        .collect();
    results.push(check(
        "level_accounting",
        bad_level.is_empty(),
        if bad_level.is_empty() {
            "experience below threshold, points match level-ups".into()
        } else {
            format!("inconsistent: {:?}", bad_level)
        },
    ));

    let breedable = horses
        .iter()
        .filter(|h| h.level >= service.config().breeding.min_level)
        .count();
    results.push(check(
        "season_makes_breeders",
        breedable == horses.len(),
        format!("{}/{} horses at breeding level", breedable, horses.len()),
    ));

    results
}

// ── 5. Breeding ─────────────────────────────────────────────────────────

fn validate_breeding(service: &mut GameService<StdRng>, ids: &[HorseId]) -> Vec<TestResult> {
    println!("--- Breeding ---");
    let mut results = Vec::new();

    let (sire, dam) = match (
        ids.first().and_then(|id| service.horse(*id).ok()),
        ids.get(1).and_then(|id| service.horse(*id).ok()),
    ) {
        (Some(s), Some(d)) => (s, d),
        _ => {
            results.push(check("breeding_parents", false, "roster too small".into()));
            return results;
        }
    };

    let count_before = service.store().horse_count();
    let foal = match service.breed_horses(sire.id, dam.id, "Harness Foal", Some(dam.owner)) {
        Ok(f) => f,
        Err(e) => {
            results.push(check("breeding_succeeds", false, e.to_string()));
            return results;
        }
    };

    results.push(check(
        "foal_registered",
        service.store().horse_count() == count_before + 1 && service.horse(foal.id).is_ok(),
        format!("{} horses after breeding", service.store().horse_count()),
    ));
    results.push(check(
        "foal_owned_by_sire_owner",
        foal.owner == sire.owner,
        "requested owner ignored".into(),
    ));
    results.push(check(
        "foal_lineage",
        foal.lineage.sire == Some(sire.id) && foal.lineage.dam == Some(dam.id),
        format!("{} x {}", sire.name, dam.name),
    ));
    results.push(check(
        "foal_starts_fresh",
        foal.level == 1 && foal.experience == 0 && foal.races_run == 0,
        format!("level {}, {} races", foal.level, foal.races_run),
    ));

    let jitter = service.config().breeding.stat_jitter as f64;
    let outside: Vec<StatKind> = StatKind::ALL
        .into_iter()
        .filter(|k| {
            let avg = ((sire.stats.get(*k) as f64 + dam.stats.get(*k) as f64) / 2.0).round();
            let v = foal.stats.get(*k) as f64;
            (v - avg).abs() > jitter && v != STAT_MIN as f64 && v != STAT_MAX as f64
        })
        .collect();
    results.push(check(
        "foal_stats_inherited",
        outside.is_empty(),
        if outside.is_empty() {
            "every stat within jitter of the parent average".into()
        } else {
            format!("outside jitter: {:?}", outside)
        },
    ));

    let count_before = service.store().horse_count();
    let rejected = service.breed_horses(foal.id, sire.id, "Too Soon", None);
    results.push(check(
        "foal_cannot_breed",
        matches!(
            rejected,
            Err(ServiceError::Validation(ValidationError::BreedingLevelTooLow { .. }))
        ) && service.store().horse_count() == count_before,
        "level 1 foal refused".into(),
    ));

    results
}

// ── 6. Training & rest ──────────────────────────────────────────────────

fn validate_training(
    service: &mut GameService<StdRng>,
    ids: &[HorseId],
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Training & Rest ---");
    let mut results = Vec::new();

    let mut trained = 0;
    let mut in_range = true;
    for id in ids {
        let Ok(advice) = service.training_recommendation(*id) else {
            continue;
        };
        if !advice.can_train {
            continue;
        }
        let points = advice.points_needed.min(advice.training_points_available);
        match service.train_horse(*id, advice.stat.as_str(), points) {
            Ok(horse) => {
                trained += 1;
                in_range &= horse.stats.iter().all(|(_, v)| (STAT_MIN..=STAT_MAX).contains(&v));
                if verbose {
                    println!(
                        "  {} {} -> {}",
                        horse.name,
                        advice.stat,
                        horse.stats.get(advice.stat)
                    );
                }
            }
            Err(e) => println!("  training {} failed: {}", id, e),
        }
    }
    results.push(check(
        "training_spends_points",
        trained == ids.len() && in_range,
        format!("{}/{} horses trained their weakest stat", trained, ids.len()),
    ));

    let unknown = ids
        .first()
        .map(|id| service.train_horse(*id, "charisma", 1));
    results.push(check(
        "unknown_stat_rejected",
        matches!(
            unknown,
            Some(Err(ServiceError::Validation(ValidationError::UnknownStat(_))))
        ),
        "'charisma' refused".into(),
    ));

    let (lo, hi) = {
        let p = &service.config().progression;
        (p.rest_points_min, p.rest_points_max)
    };
    let mut rested = 0;
    let mut bonuses = 0;
    for id in ids {
        if let Ok(report) = service.rest_horse(*id) {
            if (lo..=hi).contains(&report.training_points_gained) {
                rested += 1;
            }
            if report.bonus_stat.is_some() {
                bonuses += 1;
            }
        }
    }
    results.push(check(
        "rest_grants_points",
        rested == ids.len(),
        format!("{}/{} rests in {}..={}, {} bonus stats", rested, ids.len(), lo, hi, bonuses),
    ));

    results
}

// ── 7. Snapshot ─────────────────────────────────────────────────────────

fn validate_snapshot(store: &MemoryStore) -> Vec<TestResult> {
    println!("--- Snapshot ---");
    let mut results = Vec::new();

    let mut buffer = Vec::new();
    let binary = store
        .save_snapshot(&mut buffer)
        .and_then(|_| MemoryStore::load_snapshot(&buffer[..]));
    results.push(check(
        "binary_snapshot_roundtrip",
        binary.as_ref().is_ok_and(|s| s == store),
        format!("{} bytes", buffer.len()),
    ));

    // Float fields may drift in the last digit through JSON, so compare
    // the integer tables and counts only.
    let json = store.to_json().and_then(|j| MemoryStore::from_json(&j));
    results.push(check(
        "json_export_roundtrip",
        json.as_ref().is_ok_and(|s| {
            s.all_horses() == store.all_horses()
                && s.race_count() == store.race_count()
                && s.result_count() == store.result_count()
        }),
        format!(
            "{} horses, {} races, {} results",
            store.horse_count(),
            store.race_count(),
            store.result_count()
        ),
    ));

    results
}
