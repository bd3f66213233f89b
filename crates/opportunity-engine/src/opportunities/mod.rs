//! Opportunity scoring, triage, and filtering for the business-development pipeline.
//!
//! Raw records are scored once per ingestion batch; filters, presets, and category
//! overrides then operate on that scored population without rescoring.

pub mod board;
pub mod domain;
pub mod filters;
pub mod provider;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use board::{BoardError, OpportunityBoard, RefreshOutcome};
pub use domain::{Opportunity, OpportunityId, ValidationError};
pub use filters::{
    apply_filters, apply_preset, quick_filter, quick_filters, Bounds, FilterError, FilterPatch,
    FilterSpec, FilterSummary, QuickFilter,
};
pub use provider::{
    parse_opportunities, CsvOpportunityProvider, OpportunityProvider, ProviderError,
};
pub use repository::{
    NewSavedFilter, RepositoryError, SavedFilter, SavedFilterId, SavedFilterRepository,
};
pub use router::opportunity_router;
pub use scoring::{
    categorize, explain, score, score_all, Explanation, MatchDetail, OpportunityCategory,
    OpportunityScore, ScoredOpportunity,
};
pub use service::{OpportunityService, SearchResult, ServiceError};
