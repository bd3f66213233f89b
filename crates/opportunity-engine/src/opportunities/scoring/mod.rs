mod explain;
mod policy;
mod rules;

pub use explain::{explain, Explanation, MatchDetail};
pub use policy::{categorize, OpportunityCategory};

use super::domain::Opportunity;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

/// Raw engine output for a single record, before categorization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityScore {
    pub match_score: u8,
    pub win_probability: f64,
    pub match_boosts: Vec<&'static str>,
    pub win_boosts: Vec<&'static str>,
}

/// Transparent additive rule set; no normalization beyond the final clamp.
pub fn score(opportunity: &Opportunity) -> OpportunityScore {
    OpportunityScore {
        match_score: rules::match_score(opportunity),
        win_probability: rules::win_probability(opportunity),
        match_boosts: rules::applied_boosts(&rules::MATCH_BOOSTS, opportunity),
        win_boosts: rules::applied_boosts(&rules::WIN_BOOSTS, opportunity),
    }
}

/// Opportunity enriched with engine output. Replaced wholesale when rescored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredOpportunity {
    pub opportunity: Opportunity,
    pub match_score: u8,
    pub win_probability: f64,
    pub category: OpportunityCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_category_override: Option<OpportunityCategory>,
    pub match_details: Vec<MatchDetail>,
    pub recommendations: Vec<String>,
}

impl ScoredOpportunity {
    pub fn assemble(opportunity: Opportunity) -> Self {
        let OpportunityScore {
            match_score,
            win_probability,
            ..
        } = score(&opportunity);
        let category = categorize(match_score, win_probability);
        let Explanation {
            match_details,
            recommendations,
        } = explain(&opportunity, match_score);

        Self {
            opportunity,
            match_score,
            win_probability,
            category,
            user_category_override: None,
            match_details,
            recommendations,
        }
    }

    /// The user's board placement when present, otherwise the computed category.
    pub fn effective_category(&self) -> OpportunityCategory {
        self.user_category_override.unwrap_or(self.category)
    }

    /// Win probability on the 0–100 scale used by filters, free of float noise.
    pub fn win_probability_percent(&self) -> f64 {
        (self.win_probability * 10_000.0).round() / 100.0
    }
}

/// Score a batch. Records are independent, so the map runs in parallel; order is kept.
pub fn score_all(opportunities: &[Opportunity]) -> Vec<ScoredOpportunity> {
    opportunities
        .par_iter()
        .cloned()
        .map(ScoredOpportunity::assemble)
        .collect()
}
