use serde::{Deserialize, Serialize};

/// Pipeline bucket an opportunity is triaged into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityCategory {
    HotLead,
    GoodMatch,
    Potential,
    ReviewNeeded,
    LowPriority,
    /// Only reachable through an explicit user override.
    Exclude,
}

impl OpportunityCategory {
    /// Board column order.
    pub const ALL: [OpportunityCategory; 6] = [
        OpportunityCategory::HotLead,
        OpportunityCategory::GoodMatch,
        OpportunityCategory::Potential,
        OpportunityCategory::ReviewNeeded,
        OpportunityCategory::LowPriority,
        OpportunityCategory::Exclude,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OpportunityCategory::HotLead => "Hot Lead",
            OpportunityCategory::GoodMatch => "Good Match",
            OpportunityCategory::Potential => "Potential",
            OpportunityCategory::ReviewNeeded => "Review Needed",
            OpportunityCategory::LowPriority => "Low Priority",
            OpportunityCategory::Exclude => "Exclude",
        }
    }
}

struct CategoryRule {
    category: OpportunityCategory,
    applies: fn(u8, f64) -> bool,
}

// Evaluated top to bottom; the first rule that holds wins.
const RULES: [CategoryRule; 4] = [
    CategoryRule {
        category: OpportunityCategory::HotLead,
        applies: hot_lead,
    },
    CategoryRule {
        category: OpportunityCategory::GoodMatch,
        applies: good_match,
    },
    CategoryRule {
        category: OpportunityCategory::Potential,
        applies: potential,
    },
    CategoryRule {
        category: OpportunityCategory::LowPriority,
        applies: low_priority,
    },
];

/// Assign the computed pipeline category for a score pair.
pub fn categorize(match_score: u8, win_probability: f64) -> OpportunityCategory {
    RULES
        .iter()
        .find(|rule| (rule.applies)(match_score, win_probability))
        .map(|rule| rule.category)
        .unwrap_or(OpportunityCategory::ReviewNeeded)
}

fn hot_lead(match_score: u8, win_probability: f64) -> bool {
    match_score >= 85 && win_probability >= 0.70
}

fn good_match(match_score: u8, win_probability: f64) -> bool {
    match_score >= 70 && win_probability >= 0.50
}

fn potential(match_score: u8, win_probability: f64) -> bool {
    match_score >= 50 && win_probability >= 0.30
}

fn low_priority(match_score: u8, win_probability: f64) -> bool {
    match_score < 30 || win_probability < 0.20
}
