use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::board::{BoardError, OpportunityBoard, RefreshOutcome};
use super::domain::{Opportunity, OpportunityId, ValidationError};
use super::filters::{
    apply_filters, apply_preset, quick_filter, quick_filters, FilterError, FilterSpec,
    FilterSummary, QuickFilter,
};
use super::provider::{OpportunityProvider, ProviderError};
use super::repository::{
    NewSavedFilter, RepositoryError, SavedFilter, SavedFilterId, SavedFilterRepository,
};
use super::scoring::{OpportunityCategory, ScoredOpportunity};

/// Service composing the data provider, scored board, and saved-filter store.
pub struct OpportunityService<P, S> {
    provider: Arc<P>,
    saved_filters: Arc<S>,
    board: OpportunityBoard,
}

/// Filtered population together with its counts.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub results: Vec<ScoredOpportunity>,
    pub summary: FilterSummary,
}

impl<P, S> OpportunityService<P, S>
where
    P: OpportunityProvider + 'static,
    S: SavedFilterRepository + 'static,
{
    pub fn new(provider: Arc<P>, saved_filters: Arc<S>) -> Self {
        Self {
            provider,
            saved_filters,
            board: OpportunityBoard::new(),
        }
    }

    /// Pull the latest batch from the provider and rescore it.
    pub fn refresh(&self) -> Result<RefreshOutcome, ServiceError> {
        let opportunities = self.provider.fetch()?;
        self.ingest(&opportunities)
    }

    /// Validate and score a batch, replacing the current population atomically.
    ///
    /// Ids must be unique within the batch; overrides are keyed by id.
    pub fn ingest(&self, opportunities: &[Opportunity]) -> Result<RefreshOutcome, ServiceError> {
        let mut seen = HashSet::with_capacity(opportunities.len());
        for opportunity in opportunities {
            opportunity
                .validate()
                .map_err(|source| ServiceError::InvalidOpportunity {
                    id: opportunity.id.clone(),
                    source,
                })?;
            if !seen.insert(&opportunity.id) {
                return Err(ServiceError::InvalidOpportunity {
                    id: opportunity.id.clone(),
                    source: ValidationError::new("id", "duplicate identifier in batch"),
                });
            }
        }

        let outcome = self.board.replace(opportunities);
        info!(
            scored = outcome.scored,
            overrides_retained = outcome.overrides_retained,
            overrides_dropped = outcome.overrides_dropped,
            "opportunity population rescored"
        );
        Ok(outcome)
    }

    pub fn scored(&self) -> Arc<Vec<ScoredOpportunity>> {
        self.board.snapshot()
    }

    pub fn board(&self) -> &OpportunityBoard {
        &self.board
    }

    /// Filter the current snapshot; scoring is never rerun here.
    pub fn search(&self, spec: &FilterSpec) -> Result<SearchResult, ServiceError> {
        let snapshot = self.board.snapshot();
        let results = apply_filters(&snapshot, spec)?;
        let summary = FilterSummary::new(snapshot.len(), &results);
        debug!(
            total = summary.total,
            filtered = summary.filtered,
            "filters applied"
        );
        Ok(SearchResult { results, summary })
    }

    pub fn set_category_override(
        &self,
        id: &OpportunityId,
        category: OpportunityCategory,
    ) -> Result<ScoredOpportunity, ServiceError> {
        let updated = self.board.set_category_override(id, category)?;
        info!(opportunity = %id, category = category.label(), "category override set");
        Ok(updated)
    }

    pub fn clear_category_override(
        &self,
        id: &OpportunityId,
    ) -> Result<ScoredOpportunity, ServiceError> {
        let updated = self.board.clear_category_override(id)?;
        info!(opportunity = %id, "category override cleared");
        Ok(updated)
    }

    pub fn exclude(&self, ids: &[OpportunityId]) -> Result<usize, ServiceError> {
        let excluded = self.board.exclude(ids)?;
        info!(excluded, "opportunities excluded");
        Ok(excluded)
    }

    pub fn presets(&self, now: DateTime<Utc>) -> Vec<QuickFilter> {
        quick_filters(now)
    }

    pub fn apply_preset(
        &self,
        active: &FilterSpec,
        preset_id: &str,
        now: DateTime<Utc>,
    ) -> Result<FilterSpec, ServiceError> {
        let preset = quick_filter(preset_id, now)
            .ok_or_else(|| ServiceError::UnknownPreset(preset_id.to_string()))?;
        Ok(apply_preset(active, &preset))
    }

    pub fn save_filter(&self, request: NewSavedFilter) -> Result<SavedFilter, ServiceError> {
        request.filters.validate()?;
        let saved = self.saved_filters.save(request)?;
        info!(saved_filter = %saved.id.0, name = %saved.name, "filter saved");
        Ok(saved)
    }

    pub fn saved_filters(&self) -> Result<Vec<SavedFilter>, ServiceError> {
        Ok(self.saved_filters.list()?)
    }

    /// Fetch a saved filter for activation, counting the use.
    pub fn load_saved_filter(&self, id: &SavedFilterId) -> Result<SavedFilter, ServiceError> {
        if self.saved_filters.fetch(id)?.is_none() {
            return Err(RepositoryError::NotFound.into());
        }
        Ok(self.saved_filters.record_usage(id)?)
    }
}

/// Error raised by the opportunity service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("opportunity {id}: {source}")]
    InvalidOpportunity {
        id: OpportunityId,
        #[source]
        source: ValidationError,
    },
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("unknown quick filter '{0}'")]
    UnknownPreset(String),
}
