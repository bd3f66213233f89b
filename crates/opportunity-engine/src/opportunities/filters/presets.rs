use super::{Bounds, FilterSpec};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Partial filter; present fields replace the active value, absent ones are untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naics_codes: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opportunity_types: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_value_range: Option<Bounds<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date_range: Option<Bounds<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_aside_programs: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_vehicles: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_certifications: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_clearances: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score_range: Option<Bounds<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_probability_range: Option<Bounds<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competition_levels: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_keywords: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agencies: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_agencies: Option<BTreeSet<String>>,
}

/// Named, read-only filter template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickFilter {
    pub id: String,
    pub name: String,
    pub description: String,
    pub filters: FilterPatch,
}

/// Shallow merge of a preset into the active filter.
pub fn apply_preset(active: &FilterSpec, preset: &QuickFilter) -> FilterSpec {
    let patch = preset.filters.clone();
    let mut merged = active.clone();

    macro_rules! overwrite {
        ($($field:ident),+ $(,)?) => {
            $(
                if let Some(value) = patch.$field {
                    merged.$field = value;
                }
            )+
        };
    }

    overwrite!(
        naics_codes,
        opportunity_types,
        estimated_value_range,
        due_date_range,
        set_aside_programs,
        contract_vehicles,
        required_certifications,
        security_clearances,
        match_score_range,
        win_probability_range,
        competition_levels,
        keywords,
        exclude_keywords,
        agencies,
        exclude_agencies,
    );

    if patch.location_radius.is_some() {
        merged.location_radius = patch.location_radius;
    }

    merged
}

/// Built-in presets. `now` anchors the relative deadline window.
pub fn quick_filters(now: DateTime<Utc>) -> Vec<QuickFilter> {
    vec![
        QuickFilter {
            id: "hot-leads".to_string(),
            name: "Hot Leads".to_string(),
            description: "High match score, high win probability".to_string(),
            filters: FilterPatch {
                match_score_range: Some(Bounds::new(80, 100)),
                win_probability_range: Some(Bounds::new(70.0, 100.0)),
                ..FilterPatch::default()
            },
        },
        QuickFilter {
            id: "small-business".to_string(),
            name: "Small Business Set-Asides".to_string(),
            description: "Small business opportunities only".to_string(),
            filters: FilterPatch {
                set_aside_programs: Some(string_set(&[
                    "Small Business Set-Aside",
                    "8(a) Competitive",
                    "WOSB Set-Aside",
                ])),
                ..FilterPatch::default()
            },
        },
        QuickFilter {
            id: "high-value".to_string(),
            name: "High Value Contracts".to_string(),
            description: "Contracts over $1M".to_string(),
            filters: FilterPatch {
                estimated_value_range: Some(Bounds::new(1_000_000, 10_000_000)),
                ..FilterPatch::default()
            },
        },
        QuickFilter {
            id: "urgent".to_string(),
            name: "Urgent Deadlines".to_string(),
            description: "Due within 30 days".to_string(),
            filters: FilterPatch {
                due_date_range: Some(Bounds::new(now, now + Duration::days(30))),
                ..FilterPatch::default()
            },
        },
    ]
}

pub fn quick_filter(id: &str, now: DateTime<Utc>) -> Option<QuickFilter> {
    quick_filters(now).into_iter().find(|preset| preset.id == id)
}

fn string_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}
