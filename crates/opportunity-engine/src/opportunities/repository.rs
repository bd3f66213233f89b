use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::filters::FilterSpec;

/// Identifier wrapper for persisted filter presets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedFilterId(pub String);

/// Named snapshot of a full filter, owned by the user that saved it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedFilter {
    pub id: SavedFilterId,
    pub name: String,
    pub description: String,
    pub filters: FilterSpec,
    pub is_default: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub usage_count: u32,
}

/// Request payload for persisting the active filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSavedFilter {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub filters: FilterSpec,
    #[serde(default)]
    pub is_default: bool,
    pub created_by: String,
}

/// Storage abstraction for saved filters (document store, key-value store, memory).
pub trait SavedFilterRepository: Send + Sync {
    fn save(&self, filter: NewSavedFilter) -> Result<SavedFilter, RepositoryError>;
    fn list(&self) -> Result<Vec<SavedFilter>, RepositoryError>;
    fn fetch(&self, id: &SavedFilterId) -> Result<Option<SavedFilter>, RepositoryError>;
    /// Increment the usage counter, returning the updated record.
    fn record_usage(&self, id: &SavedFilterId) -> Result<SavedFilter, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("saved filter already exists")]
    Conflict,
    #[error("saved filter not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
