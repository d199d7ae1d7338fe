//! Race and race-result entities.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::horse::{Horse, HorseId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RaceId(pub Uuid);

impl RaceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResultId(pub Uuid);

impl ResultId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ResultId {
    fn default() -> Self {
        Self::new()
    }
}

/// Race grade. Descriptive only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RaceType {
    #[default]
    Normal,
    Stakes,
    Handicap,
}

/// Going on the day. Descriptive only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackCondition {
    #[default]
    Good,
    Firm,
    Soft,
    Heavy,
}

/// A scheduled race.
///
/// `distance`, `track_condition` and `race_type` describe the race but do
/// not influence scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    pub id: RaceId,
    pub name: String,
    pub scheduled_at: DateTime<Utc>,
    pub base_prize: u32,
    pub min_level: u32,
    pub max_level: u32,
    pub max_participants: u32,
    /// Metres.
    pub distance: u32,
    pub track_condition: TrackCondition,
    pub race_type: RaceType,
    is_completed: bool,
}

impl Race {
    /// A 1200m race on good ground with a 1000 prize, open to levels 1–10
    /// and up to 8 runners.
    pub fn new(name: impl Into<String>, scheduled_at: DateTime<Utc>) -> Self {
        Self {
            id: RaceId::new(),
            name: name.into(),
            scheduled_at,
            base_prize: 1000,
            min_level: 1,
            max_level: 10,
            max_participants: 8,
            distance: 1200,
            track_condition: TrackCondition::default(),
            race_type: RaceType::default(),
            is_completed: false,
        }
    }

    pub fn with_prize_and_band(mut self, base_prize: u32, min_level: u32, max_level: u32) -> Self {
        self.base_prize = base_prize;
        self.min_level = min_level;
        self.max_level = max_level;
        self
    }

    pub fn with_max_participants(mut self, max_participants: u32) -> Self {
        self.max_participants = max_participants;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Flag the race as run. Can only happen once.
    pub fn mark_completed(&mut self) -> Result<(), ValidationError> {
        if self.is_completed {
            return Err(ValidationError::RaceAlreadyCompleted(self.id));
        }
        self.is_completed = true;
        Ok(())
    }

    /// Level band check. Not applied by the default recommendation filter.
    pub fn is_eligible_for_horse(&self, horse: &Horse) -> bool {
        horse.level >= self.min_level && horse.level <= self.max_level && !self.is_completed
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_at > now && !self.is_completed
    }

    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_at < now || self.is_completed
    }

    /// Check field consistency.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_prize == 0 {
            return Err(ValidationError::InvalidRace("base prize must be positive".into()));
        }
        if self.min_level == 0 {
            return Err(ValidationError::InvalidRace("minimum level must be at least 1".into()));
        }
        if self.min_level > self.max_level {
            return Err(ValidationError::InvalidRace(format!(
                "level band {}..={} is inverted",
                self.min_level, self.max_level
            )));
        }
        if self.max_participants < 2 {
            return Err(ValidationError::InvalidRace(format!(
                "max participants must be at least 2, got {}",
                self.max_participants
            )));
        }
        Ok(())
    }
}

/// One horse's finish in one race. Created by the simulation only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    id: ResultId,
    race_id: RaceId,
    horse_id: HorseId,
    position: u32,
    earnings: u32,
    race_time: f64,
    performance_score: f64,
}

impl RaceResult {
    pub(crate) fn new(
        race_id: RaceId,
        horse_id: HorseId,
        position: u32,
        earnings: u32,
        race_time: f64,
        performance_score: f64,
    ) -> Self {
        Self {
            id: ResultId::new(),
            race_id,
            horse_id,
            position,
            earnings,
            race_time,
            performance_score,
        }
    }

    pub fn id(&self) -> ResultId {
        self.id
    }

    pub fn race_id(&self) -> RaceId {
        self.race_id
    }

    pub fn horse_id(&self) -> HorseId {
        self.horse_id
    }

    /// 1-based finishing position.
    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn earnings(&self) -> u32 {
        self.earnings
    }

    /// Seconds.
    pub fn race_time(&self) -> f64 {
        self.race_time
    }

    pub fn performance_score(&self) -> f64 {
        self.performance_score
    }

    pub fn won(&self) -> bool {
        self.position == 1
    }
}
