//! Validation errors raised by the core when a precondition is violated.
//!
//! Every variant is reported before any mutation takes place, so a caller
//! receiving one of these can discard the request without rolling back.

use thiserror::Error;

use crate::horse::HorseId;
use crate::race::RaceId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A race needs at least `required` runners.
    #[error("race needs at least {required} participants, got {found}")]
    TooFewParticipants { required: usize, found: usize },

    /// The same horse was entered twice.
    #[error("horse {0} is entered more than once")]
    DuplicateParticipant(HorseId),

    #[error("race {0} has already been completed")]
    RaceAlreadyCompleted(RaceId),

    /// Race fields are inconsistent (zero prize, inverted level band, ...).
    #[error("invalid race: {0}")]
    InvalidRace(String),

    #[error("both horses must be at least level {required} to breed (horse {horse} is level {level})")]
    BreedingLevelTooLow {
        horse: HorseId,
        level: u32,
        required: u32,
    },

    #[error("both horses must have run at least {required} races to breed (horse {horse} has run {races_run})")]
    BreedingTooFewRaces {
        horse: HorseId,
        races_run: u32,
        required: u32,
    },

    #[error("unknown stat '{0}' (expected speed, stamina, power, guts or intelligence)")]
    UnknownStat(String),

    #[error("not enough training points: {required} required, {available} available")]
    InsufficientTrainingPoints { required: u32, available: u32 },
}
