//! Multi-dimensional filtering over an already-scored population.
//!
//! Every dimension is an independent predicate and the result is their conjunction. An
//! empty set or an open range constrains nothing.

mod predicates;
mod presets;
mod summary;

pub use presets::{apply_preset, quick_filter, quick_filters, FilterPatch, QuickFilter};
pub use summary::FilterSummary;

use super::scoring::ScoredOpportunity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Inclusive range with optional ends; a missing end is open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    #[serde(default)]
    pub min: Option<T>,
    #[serde(default)]
    pub max: Option<T>,
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn new(min: T, max: T) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: T) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: T) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: T) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    fn check(&self, dimension: &'static str) -> Result<(), FilterError> {
        match (self.min, self.max) {
            (Some(min), Some(max))
                if matches!(min.partial_cmp(&max), Some(Ordering::Greater) | None) =>
            {
                Err(FilterError::InvertedRange { dimension })
            }
            _ => Ok(()),
        }
    }
}

/// Active filter for one session or view. `Default` constrains nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub naics_codes: BTreeSet<String>,
    pub opportunity_types: BTreeSet<String>,
    pub estimated_value_range: Bounds<u64>,
    pub due_date_range: Bounds<DateTime<Utc>>,
    /// Accepted and carried for callers; no geographic computation is performed.
    pub location_radius: Option<u32>,
    pub set_aside_programs: BTreeSet<String>,
    pub contract_vehicles: BTreeSet<String>,
    pub required_certifications: BTreeSet<String>,
    pub security_clearances: BTreeSet<String>,
    pub match_score_range: Bounds<u8>,
    /// Percentage scale, 0–100.
    pub win_probability_range: Bounds<f64>,
    pub competition_levels: BTreeSet<String>,
    pub keywords: BTreeSet<String>,
    pub exclude_keywords: BTreeSet<String>,
    pub agencies: BTreeSet<String>,
    pub exclude_agencies: BTreeSet<String>,
}

impl FilterSpec {
    pub fn validate(&self) -> Result<(), FilterError> {
        self.estimated_value_range.check("estimated_value_range")?;
        self.due_date_range.check("due_date_range")?;
        self.match_score_range.check("match_score_range")?;
        self.win_probability_range.check("win_probability_range")
    }

    /// Conjunction of every active dimension.
    pub fn matches(&self, candidate: &ScoredOpportunity) -> bool {
        let opportunity = &candidate.opportunity;

        predicates::naics(&self.naics_codes, &opportunity.naics_codes)
            && predicates::member(&self.opportunity_types, Some(&opportunity.opportunity_type))
            && predicates::value_contained(&self.estimated_value_range, opportunity)
            && predicates::bounded(&self.due_date_range, opportunity.response_deadline)
            && predicates::member(&self.set_aside_programs, opportunity.set_aside_program.as_ref())
            && predicates::member(&self.contract_vehicles, opportunity.contract_vehicle.as_ref())
            && predicates::any_member(
                &self.required_certifications,
                &opportunity.required_certifications,
            )
            && predicates::member(
                &self.security_clearances,
                opportunity.security_clearance.as_ref(),
            )
            && predicates::bounded(&self.match_score_range, candidate.match_score)
            && predicates::bounded(
                &self.win_probability_range,
                candidate.win_probability_percent(),
            )
            && predicates::member(
                &self.competition_levels,
                opportunity.competition_level.as_ref(),
            )
            && predicates::keywords_included(&self.keywords, opportunity)
            && predicates::keywords_absent(&self.exclude_keywords, opportunity)
            && predicates::agency_included(&self.agencies, &opportunity.agency_name)
            && predicates::agency_not_excluded(&self.exclude_agencies, &opportunity.agency_name)
    }
}

/// Filter configuration rejected before evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("{dimension} has min greater than max")]
    InvertedRange { dimension: &'static str },
}

/// Stable filter: survivors keep their relative order. Zero matches is not an error.
pub fn apply_filters(
    scored: &[ScoredOpportunity],
    spec: &FilterSpec,
) -> Result<Vec<ScoredOpportunity>, FilterError> {
    spec.validate()?;

    Ok(scored
        .iter()
        .filter(|candidate| spec.matches(candidate))
        .cloned()
        .collect())
}
