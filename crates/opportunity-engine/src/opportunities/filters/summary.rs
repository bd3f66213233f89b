use super::super::scoring::{OpportunityCategory, ScoredOpportunity};
use serde::Serialize;
use std::collections::BTreeMap;

/// Result counts for a filter pass, broken down by effective category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub total: usize,
    pub filtered: usize,
    pub by_category: BTreeMap<OpportunityCategory, usize>,
}

impl FilterSummary {
    pub fn new(total: usize, filtered: &[ScoredOpportunity]) -> Self {
        let mut by_category: BTreeMap<OpportunityCategory, usize> = OpportunityCategory::ALL
            .iter()
            .map(|category| (*category, 0))
            .collect();

        for candidate in filtered {
            *by_category
                .entry(candidate.effective_category())
                .or_default() += 1;
        }

        Self {
            total,
            filtered: filtered.len(),
            by_category,
        }
    }
}
