use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::opportunities::domain::{Opportunity, OpportunityId};
use crate::opportunities::provider::{OpportunityProvider, ProviderError};
use crate::opportunities::repository::{
    NewSavedFilter, RepositoryError, SavedFilter, SavedFilterId, SavedFilterRepository,
};
use crate::opportunities::scoring::ScoredOpportunity;
use crate::opportunities::{opportunity_router, OpportunityService};

pub(super) fn deadline(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, month, day, 17, 0, 0)
        .single()
        .expect("valid deadline")
}

pub(super) fn opportunity(id: &str) -> Opportunity {
    Opportunity {
        id: OpportunityId::from(id),
        title: "Facilities Support".to_string(),
        agency_name: "General Services Administration".to_string(),
        description: "Janitorial and grounds services".to_string(),
        location: "Boise, ID".to_string(),
        opportunity_type: "Services".to_string(),
        estimated_value_min: 2_000_000,
        estimated_value_max: 8_000_000,
        response_deadline: deadline(12, 1),
        naics_codes: vec!["561720".to_string()],
        set_aside_program: None,
        contract_vehicle: None,
        required_certifications: Vec::new(),
        security_clearance: None,
        competition_level: None,
    }
}

pub(super) fn utah_it_opportunity() -> Opportunity {
    Opportunity {
        id: OpportunityId::from("1"),
        title: "IT Support Services for Federal Agency".to_string(),
        agency_name: "Department of Defense".to_string(),
        description: "Comprehensive IT support services including help desk, network administration, and cybersecurity support.".to_string(),
        location: "Salt Lake City, UT".to_string(),
        opportunity_type: "Services".to_string(),
        estimated_value_min: 500_000,
        estimated_value_max: 2_000_000,
        response_deadline: deadline(11, 15),
        naics_codes: vec!["541511".to_string(), "541512".to_string()],
        set_aside_program: Some("Small Business Set-Aside".to_string()),
        contract_vehicle: Some("GSA Schedule".to_string()),
        required_certifications: vec!["CMMC Level 2".to_string()],
        security_clearance: Some("Secret".to_string()),
        competition_level: Some("medium".to_string()),
    }
}

/// Mixed population spanning several categories.
pub(super) fn sample_population() -> Vec<Opportunity> {
    let mut va = opportunity("2");
    va.title = "Software Development for Healthcare System".to_string();
    va.agency_name = "Department of Veterans Affairs".to_string();
    va.description = "Patient management software with VA integration.".to_string();
    va.location = "Denver, CO".to_string();
    va.opportunity_type = "Development".to_string();
    va.estimated_value_min = 1_000_000;
    va.estimated_value_max = 5_000_000;
    va.naics_codes = vec!["541511".to_string(), "621111".to_string()];
    va.set_aside_program = Some("8(a) Competitive".to_string());
    va.contract_vehicle = Some("OASIS".to_string());
    va.competition_level = Some("high".to_string());

    let mut hill = opportunity("3");
    hill.title = "Construction Services for Military Base".to_string();
    hill.agency_name = "U.S. Air Force".to_string();
    hill.description = "Construction and renovation of administrative buildings.".to_string();
    hill.location = "Hill AFB, UT".to_string();
    hill.opportunity_type = "Construction".to_string();
    hill.estimated_value_min = 2_000_000;
    hill.estimated_value_max = 10_000_000;
    hill.naics_codes = vec!["236220".to_string(), "237310".to_string()];
    hill.set_aside_program = Some("VOSB Set-Aside".to_string());
    hill.contract_vehicle = Some("Multiple Award Schedule".to_string());
    hill.response_deadline = deadline(10, 30);

    let mut training = opportunity("5");
    training.title = "Training and Development Program".to_string();
    training.agency_name = "Department of Labor".to_string();
    training.description = "Workforce development and training for federal employees.".to_string();
    training.location = "Salt Lake City, UT".to_string();
    training.opportunity_type = "Training".to_string();
    training.estimated_value_min = 200_000;
    training.estimated_value_max = 800_000;
    training.naics_codes = vec!["611513".to_string(), "541611".to_string()];
    training.set_aside_program = Some("HUBZone Set-Aside".to_string());
    training.contract_vehicle = Some("GSA Schedule".to_string());

    vec![utah_it_opportunity(), va, hill, training, opportunity("9")]
}

pub(super) fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(super) fn ids(scored: &[ScoredOpportunity]) -> Vec<&str> {
    scored
        .iter()
        .map(|candidate| candidate.opportunity.id.as_str())
        .collect()
}

#[derive(Default, Clone)]
pub(super) struct StaticProvider {
    pub(super) records: Arc<Mutex<Vec<Opportunity>>>,
}

impl StaticProvider {
    pub(super) fn with(records: Vec<Opportunity>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub(super) fn replace(&self, records: Vec<Opportunity>) {
        *self.records.lock().expect("provider mutex poisoned") = records;
    }
}

impl OpportunityProvider for StaticProvider {
    fn fetch(&self) -> Result<Vec<Opportunity>, ProviderError> {
        Ok(self.records.lock().expect("provider mutex poisoned").clone())
    }
}

pub(super) struct OfflineProvider;

impl OpportunityProvider for OfflineProvider {
    fn fetch(&self) -> Result<Vec<Opportunity>, ProviderError> {
        Err(ProviderError::Unavailable("feed offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySavedFilters {
    pub(super) records: Arc<Mutex<Vec<SavedFilter>>>,
}

impl SavedFilterRepository for MemorySavedFilters {
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
            created_at: deadline(10, 1),
            usage_count: 0,
        };
        guard.push(saved.clone());
        Ok(saved)
    }

    fn list(&self) -> Result<Vec<SavedFilter>, RepositoryError> {
        Ok(self.records.lock().expect("repository mutex poisoned").clone())
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

pub(super) fn build_service() -> (
    OpportunityService<StaticProvider, MemorySavedFilters>,
    StaticProvider,
) {
    let provider = StaticProvider::with(sample_population());
    let service = OpportunityService::new(
        Arc::new(provider.clone()),
        Arc::new(MemorySavedFilters::default()),
    );
    service.refresh().expect("sample population loads");
    (service, provider)
}

pub(super) fn router_with_service(
    service: OpportunityService<StaticProvider, MemorySavedFilters>,
) -> axum::Router {
    opportunity_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
