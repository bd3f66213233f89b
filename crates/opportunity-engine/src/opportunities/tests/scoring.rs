use super::common::*;
use crate::opportunities::scoring::{
    categorize, explain, score, score_all, OpportunityCategory, ScoredOpportunity,
};

#[test]
fn utah_small_business_it_record_scores_full_match() {
    let outcome = score(&utah_it_opportunity());

    assert_eq!(outcome.match_score, 100);
    assert_eq!(outcome.win_probability, 0.55);
    assert_eq!(
        outcome.match_boosts,
        vec![
            "utah_location",
            "small_business_set_aside",
            "it_services_naics",
            "value_sweet_spot"
        ]
    );
    assert_eq!(outcome.win_boosts, vec!["set_aside_present", "utah_location"]);
}

#[test]
fn worked_example_lands_in_good_match() {
    let scored = ScoredOpportunity::assemble(utah_it_opportunity());

    assert_eq!(scored.category, OpportunityCategory::GoodMatch);
    assert_eq!(scored.effective_category(), OpportunityCategory::GoodMatch);
    assert!(scored.user_category_override.is_none());
}

#[test]
fn unboosted_record_keeps_base_values() {
    let outcome = score(&opportunity("plain"));

    assert_eq!(outcome.match_score, 50);
    assert_eq!(outcome.win_probability, 0.30);
    assert!(outcome.match_boosts.is_empty());
    assert!(outcome.win_boosts.is_empty());
}

#[test]
fn small_utah_set_aside_becomes_hot_lead() {
    let mut record = utah_it_opportunity();
    record.estimated_value_max = 900_000;

    let scored = ScoredOpportunity::assemble(record);

    assert_eq!(scored.match_score, 100);
    assert_eq!(scored.win_probability, 0.75);
    assert_eq!(scored.category, OpportunityCategory::HotLead);
}

#[test]
fn boosts_apply_once_regardless_of_repeated_matches() {
    let mut record = opportunity("many-codes");
    record.naics_codes = vec![
        "541511".to_string(),
        "541512".to_string(),
        "541519".to_string(),
    ];
    record.location = "Utah County, UT".to_string();

    let outcome = score(&record);

    assert_eq!(outcome.match_score, 80);
}

#[test]
fn empty_naics_list_contributes_nothing() {
    let mut record = opportunity("no-codes");
    record.naics_codes.clear();

    assert_eq!(score(&record).match_score, 50);
}

#[test]
fn sweet_spot_requires_both_bounds() {
    let mut record = opportunity("band");
    record.estimated_value_min = 500_000;
    record.estimated_value_max = 5_000_000;
    assert_eq!(score(&record).match_score, 60);

    record.estimated_value_max = 5_000_001;
    assert_eq!(score(&record).match_score, 50);

    record.estimated_value_min = 499_999;
    record.estimated_value_max = 600_000;
    assert_eq!(score(&record).match_score, 50);
}

#[test]
fn empty_set_aside_string_is_not_a_program() {
    let mut record = opportunity("blank-program");
    record.set_aside_program = Some(String::new());

    assert_eq!(score(&record).win_probability, 0.30);
}

#[test]
fn scores_stay_within_bounds_for_sample_population() {
    for scored in score_all(&sample_population()) {
        assert!(scored.match_score <= 100);
        assert!((0.05..=0.95).contains(&scored.win_probability));
    }
}

#[test]
fn score_all_preserves_input_order() {
    let population = sample_population();
    let scored = score_all(&population);

    assert_eq!(ids(&scored), vec!["1", "2", "3", "5", "9"]);
    assert_eq!(
        scored
            .iter()
            .map(|candidate| candidate.category)
            .collect::<Vec<_>>(),
        vec![
            OpportunityCategory::GoodMatch,
            OpportunityCategory::Potential,
            OpportunityCategory::GoodMatch,
            OpportunityCategory::GoodMatch,
            OpportunityCategory::Potential,
        ]
    );
}

#[test]
fn categorize_respects_rule_order_at_thresholds() {
    assert_eq!(categorize(85, 0.70), OpportunityCategory::HotLead);
    assert_eq!(categorize(84, 0.95), OpportunityCategory::GoodMatch);
    assert_eq!(categorize(70, 0.50), OpportunityCategory::GoodMatch);
    assert_eq!(categorize(100, 0.49), OpportunityCategory::Potential);
    assert_eq!(categorize(50, 0.30), OpportunityCategory::Potential);
}

#[test]
fn categorize_falls_through_to_review_needed() {
    assert_eq!(categorize(45, 0.60), OpportunityCategory::ReviewNeeded);
    assert_eq!(categorize(30, 0.20), OpportunityCategory::ReviewNeeded);
    assert_eq!(categorize(90, 0.25), OpportunityCategory::ReviewNeeded);
}

#[test]
fn categorize_flags_low_priority_after_other_rules_fail() {
    assert_eq!(categorize(29, 0.90), OpportunityCategory::LowPriority);
    assert_eq!(categorize(100, 0.19), OpportunityCategory::LowPriority);
    assert_eq!(categorize(0, 0.05), OpportunityCategory::LowPriority);
}

#[test]
fn categorize_never_computes_exclude() {
    for match_score in (0..=100).step_by(5) {
        for percent in (5..=95).step_by(5) {
            let category = categorize(match_score, f64::from(percent) / 100.0);
            assert_ne!(category, OpportunityCategory::Exclude);
            assert_eq!(category, categorize(match_score, f64::from(percent) / 100.0));
        }
    }
}

#[test]
fn explanation_lists_matching_signals_in_order() {
    let explanation = explain(&utah_it_opportunity(), 100);

    let kinds: Vec<&str> = explanation
        .match_details
        .iter()
        .map(|detail| detail.kind.as_str())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "NAICS Code Match",
            "Location Match",
            "Set-Aside Program",
            "Contract Vehicle"
        ]
    );
    let scores: Vec<u8> = explanation
        .match_details
        .iter()
        .map(|detail| detail.score)
        .collect();
    assert_eq!(scores, vec![85, 90, 75, 70]);
    assert_eq!(
        explanation.match_details[2].description,
        "Eligible for Small Business Set-Aside"
    );
    assert_eq!(
        explanation.match_details[3].description,
        "Available through GSA Schedule"
    );
}

#[test]
fn explanation_is_empty_without_signals() {
    let explanation = explain(&opportunity("plain"), 50);

    assert!(explanation.match_details.is_empty());
    assert_eq!(
        explanation.recommendations,
        vec![
            "Moderate match - Review if resources available",
            "Consider teaming with other companies"
        ]
    );
}

#[test]
fn recommendation_ladder_picks_a_single_tier() {
    let record = opportunity("ladder");

    assert_eq!(
        explain(&record, 80).recommendations[0],
        "High priority - Consider immediate response"
    );
    assert_eq!(
        explain(&record, 79).recommendations[0],
        "Good match - Worth investigating further"
    );
    assert_eq!(explain(&record, 60).recommendations.len(), 2);
    assert_eq!(
        explain(&record, 39).recommendations,
        vec!["Low match - Focus on higher priority opportunities"]
    );
}

#[test]
fn match_detail_serializes_kind_as_type() {
    let explanation = explain(&utah_it_opportunity(), 100);
    let value = serde_json::to_value(&explanation.match_details[0]).expect("serializes");

    assert_eq!(value["type"], "NAICS Code Match");
    assert_eq!(value["score"], 85);
}
