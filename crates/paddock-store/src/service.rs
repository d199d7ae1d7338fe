//! The caller side of the core: load, invoke, persist.
//!
//! Every mutating entry point runs inside one [`MemoryStore::transaction`],
//! so a request either lands completely or leaves the store untouched.

use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use paddock_logic::breeding::breed;
use paddock_logic::config::GameConfig;
use paddock_logic::horse::{Horse, HorseId, HorseReport, OwnerId};
use paddock_logic::progression::{
    rest, train_stat_named, training_recommendation, TrainingRecommendation,
};
use paddock_logic::race::{Race, RaceId, RaceResult};
use paddock_logic::recommend::recommend;
use paddock_logic::simulation::simulate_race;
use paddock_logic::statistics::{race_statistics, RaceStatistics};
use paddock_logic::stats::StatKind;

use crate::error::ServiceError;
use crate::store::{MemoryStore, Store};

/// Result of resting a horse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestReport {
    pub training_points_gained: u32,
    pub bonus_stat: Option<StatKind>,
    pub horse: Horse,
}

/// Game entry points over a [`MemoryStore`], with an injected RNG.
pub struct GameService<R: Rng> {
    store: MemoryStore,
    config: GameConfig,
    rng: R,
}

impl<R: Rng> GameService<R> {
    pub fn new(store: MemoryStore, config: GameConfig, rng: R) -> Self {
        Self { store, config, rng }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn into_store(self) -> MemoryStore {
        self.store
    }

    /// Add a horse created elsewhere.
    pub fn register_horse(&mut self, horse: Horse) -> Result<HorseId, ServiceError> {
        let id = horse.id;
        self.store.save_horse(horse)?;
        Ok(id)
    }

    pub fn schedule_race(&mut self, race: Race) -> Result<RaceId, ServiceError> {
        race.validate()?;
        let id = race.id;
        self.store.save_race(race)?;
        Ok(id)
    }

    pub fn horse(&self, id: HorseId) -> Result<Horse, ServiceError> {
        Ok(self.store.horse(id)?)
    }

    pub fn horses_of(&self, owner: OwnerId) -> Vec<Horse> {
        self.store.horses_by_owner(owner)
    }

    /// Run `race_id` with the given entries and mark it completed.
    ///
    /// Each runner's updated horse is saved before its result, in
    /// finishing order.
    pub fn simulate_race(
        &mut self,
        race_id: RaceId,
        entries: &[HorseId],
    ) -> Result<Vec<RaceResult>, ServiceError> {
        let Self { store, config, rng } = self;
        let outcome = store.transaction(|tx| {
            let mut race = tx.race(race_id)?;
            let mut field = entries
                .iter()
                .map(|id| tx.horse(*id))
                .collect::<Result<Vec<_>, _>>()?;

            let results = simulate_race(&race, &mut field, rng, &config.race, &config.progression)?;
            for result in &results {
                if let Some(horse) = field.iter().find(|h| h.id == result.horse_id()) {
                    tx.save_horse(horse.clone())?;
                }
                tx.save_result(result.clone())?;
            }

            race.mark_completed()?;
            tx.save_race(race)?;
            Ok::<_, ServiceError>(results)
        });

        match &outcome {
            Ok(results) => info!("race {} completed with {} results", race_id, results.len()),
            Err(e) => warn!("race {} not simulated: {}", race_id, e),
        }
        outcome
    }

    /// Enter the recommended field (up to `max_participants`) and run it.
    pub fn run_race(&mut self, race_id: RaceId) -> Result<Vec<RaceResult>, ServiceError> {
        let race = self.store.race(race_id)?;
        let entries: Vec<HorseId> = self
            .recommend_horses(race_id, race.max_participants as usize)?
            .iter()
            .map(|h| h.id)
            .collect();
        self.simulate_race(race_id, &entries)
    }

    pub fn train_horse(
        &mut self,
        horse_id: HorseId,
        stat: &str,
        points: u32,
    ) -> Result<Horse, ServiceError> {
        let outcome = self.store.transaction(|tx| {
            let mut horse = tx.horse(horse_id)?;
            let value = train_stat_named(&mut horse, stat, points)?;
            info!("{} trained {} to {} ({} points)", horse.name, stat, value, points);
            tx.save_horse(horse.clone())?;
            Ok::<_, ServiceError>(horse)
        });
        if let Err(e) = &outcome {
            warn!("training {} rejected: {}", horse_id, e);
        }
        outcome
    }

    pub fn rest_horse(&mut self, horse_id: HorseId) -> Result<RestReport, ServiceError> {
        let Self { store, config, rng } = self;
        store.transaction(|tx| {
            let mut horse = tx.horse(horse_id)?;
            let outcome = rest(&mut horse, rng, &config.progression);
            tx.save_horse(horse.clone())?;
            Ok::<_, ServiceError>(RestReport {
                training_points_gained: outcome.training_points_gained,
                bonus_stat: outcome.bonus_stat,
                horse,
            })
        })
    }

    /// Breed a foal and register it. The foal belongs to the sire's owner.
    pub fn breed_horses(
        &mut self,
        sire_id: HorseId,
        dam_id: HorseId,
        name: &str,
        requested_owner: Option<OwnerId>,
    ) -> Result<Horse, ServiceError> {
        let Self { store, config, rng } = self;
        let outcome = store.transaction(|tx| {
            let sire = tx.horse(sire_id)?;
            let dam = tx.horse(dam_id)?;
            let foal = breed(&sire, &dam, name, requested_owner, rng, &config.breeding)?;
            tx.save_horse(foal.clone())?;
            Ok::<_, ServiceError>(foal)
        });
        if let Err(e) = &outcome {
            warn!("breeding {} x {} rejected: {}", sire_id, dam_id, e);
        }
        outcome
    }

    /// Best `count` eligible horses for `race_id` from the whole store.
    pub fn recommend_horses(
        &self,
        race_id: RaceId,
        count: usize,
    ) -> Result<Vec<Horse>, ServiceError> {
        let race = self.store.race(race_id)?;
        let roster = self.store.all_horses();
        Ok(recommend(&roster, &race, count, &self.config.recommend)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn race_statistics(&self, race_id: RaceId) -> Result<RaceStatistics, ServiceError> {
        self.store.race(race_id)?;
        Ok(race_statistics(&self.store.results_by_race(race_id)))
    }

    pub fn race_results(&self, race_id: RaceId) -> Result<Vec<RaceResult>, ServiceError> {
        self.store.race(race_id)?;
        Ok(self.store.results_by_race(race_id))
    }

    pub fn training_recommendation(
        &self,
        horse_id: HorseId,
    ) -> Result<TrainingRecommendation, ServiceError> {
        Ok(training_recommendation(&self.store.horse(horse_id)?))
    }

    pub fn horse_report(&self, horse_id: HorseId) -> Result<HorseReport, ServiceError> {
        Ok(HorseReport::from(&self.store.horse(horse_id)?))
    }
}
