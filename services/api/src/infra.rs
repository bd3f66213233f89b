use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use opportunity_engine::opportunities::{
    NewSavedFilter, Opportunity, OpportunityProvider, ProviderError, RepositoryError,
    SavedFilter, SavedFilterId, SavedFilterRepository,
};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use crate::demo::sample_opportunities;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySavedFilterRepository {
    records: Arc<Mutex<Vec<SavedFilter>>>,
}

impl SavedFilterRepository for InMemorySavedFilterRepository {
    fn save(&self, filter: NewSavedFilter) -> Result<SavedFilter, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|saved| saved.name == filter.name) {
            return Err(RepositoryError::Conflict);
        }

        let saved = SavedFilter {
            id: SavedFilterId(format!("filter-{}", guard.len() + 1)),
            name: filter.name,
            description: filter.description,
            filters: filter.filters,
            is_default: filter.is_default,
            created_by: filter.created_by,
            created_at: Utc::now(),
            usage_count: 0,
        };
        guard.push(saved.clone());
        Ok(saved)
    }

    fn list(&self) -> Result<Vec<SavedFilter>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.clone())
    }

    fn fetch(&self, id: &SavedFilterId) -> Result<Option<SavedFilter>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|saved| &saved.id == id).cloned())
    }

    fn record_usage(&self, id: &SavedFilterId) -> Result<SavedFilter, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let saved = guard
            .iter_mut()
            .find(|saved| &saved.id == id)
            .ok_or(RepositoryError::NotFound)?;
        saved.usage_count += 1;
        Ok(saved.clone())
    }
}

/// Serves the bundled sample set with deadlines anchored to the time of each fetch.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SampleOpportunityProvider;

impl OpportunityProvider for SampleOpportunityProvider {
    fn fetch(&self) -> Result<Vec<Opportunity>, ProviderError> {
        Ok(sample_opportunities(Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opportunity_engine::opportunities::FilterSpec;

    fn request(name: &str) -> NewSavedFilter {
        NewSavedFilter {
            name: name.to_string(),
            description: String::new(),
            filters: FilterSpec::default(),
            is_default: false,
            created_by: "ops".to_string(),
        }
    }

    #[test]
    fn duplicate_names_conflict() {
        let repository = InMemorySavedFilterRepository::default();
        repository.save(request("Utah IT")).expect("first save");

        assert!(matches!(
            repository.save(request("Utah IT")),
            Err(RepositoryError::Conflict)
        ));
        assert_eq!(repository.list().expect("list").len(), 1);
    }

    #[test]
    fn usage_is_counted_per_load() {
        let repository = InMemorySavedFilterRepository::default();
        let saved = repository.save(request("High value")).expect("saved");

        repository.record_usage(&saved.id).expect("first use");
        let updated = repository.record_usage(&saved.id).expect("second use");

        assert_eq!(updated.usage_count, 2);
        assert!(matches!(
            repository.record_usage(&SavedFilterId("filter-99".to_string())),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn sample_provider_serves_valid_records() {
        let records = SampleOpportunityProvider.fetch().expect("sample set");

        assert_eq!(records.len(), 8);
        assert!(records.iter().all(|record| record.validate().is_ok()));
    }
}
