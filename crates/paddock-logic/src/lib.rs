//! Pure race and progression logic for Paddock.
//!
//! Stat rules, progression, breeding and race scoring are free functions
//! over plain structs. Callers own storage. Anything left to chance draws
//! from a generator the caller passes in, so a seeded run replays exactly.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`breeding`] | Foal stat inheritance from two eligible parents |
//! | [`config`] | Tunable constants, JSON loading, validation |
//! | [`error`] | Validation error taxonomy |
//! | [`horse`] | Horse entity, identifiers, lineage, stat report |
//! | [`progression`] | Experience, leveling, stat training, resting |
//! | [`race`] | Race and race-result entities, eligibility predicates |
//! | [`recommend`] | Eligibility filter and performance ranking for entries |
//! | [`simulation`] | Two-pass race scoring, ranking, payouts, race times |
//! | [`statistics`] | Summary of a completed race's results |
//! | [`stats`] | The five stat kinds and the clamped stat block |

pub mod breeding;
pub mod config;
pub mod error;
pub mod horse;
pub mod progression;
pub mod race;
pub mod recommend;
pub mod simulation;
pub mod statistics;
pub mod stats;

pub use config::GameConfig;
pub use error::ValidationError;
pub use horse::{Horse, HorseId, OwnerId};
pub use race::{Race, RaceId, RaceResult};
pub use stats::{StatBlock, StatKind};
