use super::super::domain::Opportunity;
use super::rules::IT_SERVICES_NAICS_PREFIX;
use serde::{Deserialize, Serialize};

/// Human-readable reason an opportunity matched, with a fixed confidence weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub score: u8,
    pub description: String,
}

impl MatchDetail {
    fn new(kind: &str, score: u8, description: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            score,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub match_details: Vec<MatchDetail>,
    pub recommendations: Vec<String>,
}

/// Explain a match. Depends only on the record and its match score.
pub fn explain(opportunity: &Opportunity, match_score: u8) -> Explanation {
    Explanation {
        match_details: match_details(opportunity),
        recommendations: recommendations(match_score),
    }
}

fn match_details(opportunity: &Opportunity) -> Vec<MatchDetail> {
    let mut details = Vec::new();

    if opportunity.has_naics_prefix(IT_SERVICES_NAICS_PREFIX) {
        details.push(MatchDetail::new(
            "NAICS Code Match",
            85,
            "Strong match with IT services NAICS codes",
        ));
    }

    if opportunity.is_in_utah() {
        details.push(MatchDetail::new(
            "Location Match",
            90,
            "Opportunity located in Utah",
        ));
    }

    if let Some(program) = opportunity.set_aside() {
        details.push(MatchDetail::new(
            "Set-Aside Program",
            75,
            format!("Eligible for {program}"),
        ));
    }

    if let Some(vehicle) = opportunity.vehicle() {
        details.push(MatchDetail::new(
            "Contract Vehicle",
            70,
            format!("Available through {vehicle}"),
        ));
    }

    details
}

fn recommendations(match_score: u8) -> Vec<String> {
    let tier: &[&str] = if match_score >= 80 {
        &[
            "High priority - Consider immediate response",
            "Review requirements and prepare detailed proposal",
        ]
    } else if match_score >= 60 {
        &[
            "Good match - Worth investigating further",
            "Check team availability and past performance",
        ]
    } else if match_score >= 40 {
        &[
            "Moderate match - Review if resources available",
            "Consider teaming with other companies",
        ]
    } else {
        &["Low match - Focus on higher priority opportunities"]
    };

    tier.iter().map(|line| line.to_string()).collect()
}
