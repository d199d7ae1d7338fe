//! Lookup and save interface, and the in-memory store behind it.

use std::collections::BTreeMap;

use paddock_logic::horse::{Horse, HorseId, OwnerId};
use paddock_logic::race::{Race, RaceId, RaceResult};

use crate::error::{EntityKind, StoreError};

/// What the game needs from persistence. Querying lives here, not in the core.
pub trait Store {
    fn horse(&self, id: HorseId) -> Result<Horse, StoreError>;
    fn save_horse(&mut self, horse: Horse) -> Result<(), StoreError>;
    fn race(&self, id: RaceId) -> Result<Race, StoreError>;
    fn save_race(&mut self, race: Race) -> Result<(), StoreError>;
    fn save_result(&mut self, result: RaceResult) -> Result<(), StoreError>;
    fn horses_by_owner(&self, owner: OwnerId) -> Vec<Horse>;
    /// Results of one race, by finishing position.
    fn results_by_race(&self, race: RaceId) -> Vec<RaceResult>;
    fn all_horses(&self) -> Vec<Horse>;
}

/// Ordered in-memory tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    pub(crate) horses: BTreeMap<HorseId, Horse>,
    pub(crate) races: BTreeMap<RaceId, Race>,
    pub(crate) results: Vec<RaceResult>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against a staged copy; keep its writes only if it returns `Ok`.
    pub fn transaction<T, E>(
        &mut self,
        f: impl FnOnce(&mut MemoryStore) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut staged = self.clone();
        let value = f(&mut staged)?;
        *self = staged;
        Ok(value)
    }

    pub fn horse_count(&self) -> usize {
        self.horses.len()
    }

    pub fn race_count(&self) -> usize {
        self.races.len()
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    pub fn races(&self) -> impl Iterator<Item = &Race> {
        self.races.values()
    }
}

impl Store for MemoryStore {
    fn horse(&self, id: HorseId) -> Result<Horse, StoreError> {
        self.horses.get(&id).cloned().ok_or(StoreError::NotFound {
            kind: EntityKind::Horse,
            id: id.to_string(),
        })
    }

    fn save_horse(&mut self, horse: Horse) -> Result<(), StoreError> {
        self.horses.insert(horse.id, horse);
        Ok(())
    }

    fn race(&self, id: RaceId) -> Result<Race, StoreError> {
        self.races.get(&id).cloned().ok_or(StoreError::NotFound {
            kind: EntityKind::Race,
            id: id.to_string(),
        })
    }

    fn save_race(&mut self, race: Race) -> Result<(), StoreError> {
        self.races.insert(race.id, race);
        Ok(())
    }

    fn save_result(&mut self, result: RaceResult) -> Result<(), StoreError> {
        self.results.push(result);
        Ok(())
    }

    fn horses_by_owner(&self, owner: OwnerId) -> Vec<Horse> {
        self.horses
            .values()
            .filter(|h| h.owner == owner)
            .cloned()
            .collect()
    }

    fn results_by_race(&self, race: RaceId) -> Vec<RaceResult> {
        let mut results: Vec<RaceResult> = self
            .results
            .iter()
            .filter(|r| r.race_id() == race)
            .cloned()
            .collect();
        results.sort_by_key(|r| r.position());
        results
    }

    fn all_horses(&self) -> Vec<Horse> {
        self.horses.values().cloned().collect()
    }
}
