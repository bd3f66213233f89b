use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use super::domain::{Opportunity, OpportunityId};
use super::scoring::{score_all, OpportunityCategory, ScoredOpportunity};

/// Current scored population plus the user's manual category placements.
///
/// Readers receive an `Arc` snapshot, so a rescore or override swaps in a new
/// population without exposing a half-updated one.
#[derive(Default)]
pub struct OpportunityBoard {
    state: RwLock<BoardState>,
}

#[derive(Default)]
struct BoardState {
    population: Arc<Vec<ScoredOpportunity>>,
    overrides: BTreeMap<OpportunityId, OpportunityCategory>,
}

/// Bookkeeping from a population swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshOutcome {
    pub scored: usize,
    pub overrides_retained: usize,
    pub overrides_dropped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("opportunity {0} is not on the board")]
    UnknownOpportunity(OpportunityId),
}

impl OpportunityBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<Vec<ScoredOpportunity>> {
        Arc::clone(&self.read().population)
    }

    pub fn get(&self, id: &OpportunityId) -> Option<ScoredOpportunity> {
        self.read()
            .population
            .iter()
            .find(|candidate| &candidate.opportunity.id == id)
            .cloned()
    }

    /// Rescore a fresh batch and swap it in. Overrides follow their opportunity id and
    /// are dropped only when that id is no longer present.
    pub fn replace(&self, opportunities: &[Opportunity]) -> RefreshOutcome {
        let mut population = score_all(opportunities);

        let mut state = self.write();
        let present: HashSet<&OpportunityId> = population
            .iter()
            .map(|candidate| &candidate.opportunity.id)
            .collect();
        let before = state.overrides.len();
        let overrides: BTreeMap<OpportunityId, OpportunityCategory> = state
            .overrides
            .iter()
            .filter(|(id, _)| present.contains(id))
            .map(|(id, category)| (id.clone(), *category))
            .collect();

        for candidate in &mut population {
            candidate.user_category_override = overrides.get(&candidate.opportunity.id).copied();
        }

        let outcome = RefreshOutcome {
            scored: population.len(),
            overrides_retained: overrides.len(),
            overrides_dropped: before - overrides.len(),
        };
        state.overrides = overrides;
        state.population = Arc::new(population);
        outcome
    }

    pub fn set_category_override(
        &self,
        id: &OpportunityId,
        category: OpportunityCategory,
    ) -> Result<ScoredOpportunity, BoardError> {
        let mut state = self.write();
        let index = position(&state.population, id)?;

        state.overrides.insert(id.clone(), category);
        // Copy-on-write: outstanding snapshots keep the previous population.
        let population = Arc::make_mut(&mut state.population);
        population[index].user_category_override = Some(category);
        Ok(population[index].clone())
    }

    pub fn clear_category_override(
        &self,
        id: &OpportunityId,
    ) -> Result<ScoredOpportunity, BoardError> {
        let mut state = self.write();
        let index = position(&state.population, id)?;

        state.overrides.remove(id);
        let population = Arc::make_mut(&mut state.population);
        population[index].user_category_override = None;
        Ok(population[index].clone())
    }

    /// Bulk move to `Exclude`. Nothing changes if any id is unknown.
    pub fn exclude(&self, ids: &[OpportunityId]) -> Result<usize, BoardError> {
        let mut state = self.write();
        let indices = ids
            .iter()
            .map(|id| position(&state.population, id))
            .collect::<Result<Vec<_>, _>>()?;

        for id in ids {
            state
                .overrides
                .insert(id.clone(), OpportunityCategory::Exclude);
        }
        let population = Arc::make_mut(&mut state.population);
        for index in &indices {
            population[*index].user_category_override = Some(OpportunityCategory::Exclude);
        }
        Ok(indices.len())
    }

    pub fn overrides(&self) -> BTreeMap<OpportunityId, OpportunityCategory> {
        self.read().overrides.clone()
    }

    /// Population grouped by effective category; every column is present, even if empty.
    pub fn grouped(&self) -> BTreeMap<OpportunityCategory, Vec<ScoredOpportunity>> {
        let snapshot = self.snapshot();
        let mut columns: BTreeMap<OpportunityCategory, Vec<ScoredOpportunity>> =
            OpportunityCategory::ALL
                .iter()
                .map(|category| (*category, Vec::new()))
                .collect();

        for candidate in snapshot.iter() {
            columns
                .entry(candidate.effective_category())
                .or_default()
                .push(candidate.clone());
        }
        columns
    }

    fn read(&self) -> RwLockReadGuard<'_, BoardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BoardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn position(population: &[ScoredOpportunity], id: &OpportunityId) -> Result<usize, BoardError> {
    population
        .iter()
        .position(|candidate| &candidate.opportunity.id == id)
        .ok_or_else(|| BoardError::UnknownOpportunity(id.clone()))
}
