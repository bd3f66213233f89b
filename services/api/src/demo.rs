use crate::infra::{InMemorySavedFilterRepository, SampleOpportunityProvider};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use opportunity_engine::error::AppError;
use opportunity_engine::opportunities::{
    score, Bounds, CsvOpportunityProvider, FilterSpec, Opportunity, OpportunityCategory,
    OpportunityId, OpportunityProvider, OpportunityService, SearchResult,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// CSV export of opportunity records
    pub(crate) csv: PathBuf,
    /// Quick filter preset to apply (hot-leads, small-business, high-value, urgent)
    #[arg(long)]
    pub(crate) preset: Option<String>,
    /// Only list opportunities at or above this match score
    #[arg(long)]
    pub(crate) min_score: Option<u8>,
    /// Print match details and recommendations for each opportunity
    #[arg(long)]
    pub(crate) explain: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Quick filter preset to showcase after the board overview
    #[arg(long)]
    pub(crate) preset: Option<String>,
    /// Opportunity ids to move to the Exclude column before rendering the board
    #[arg(long = "exclude")]
    pub(crate) exclude: Vec<String>,
    /// Print match details and recommendations for each opportunity
    #[arg(long)]
    pub(crate) explain: bool,
}

pub(crate) fn run_score_report(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        csv,
        preset,
        min_score,
        explain,
    } = args;

    let service = OpportunityService::new(
        Arc::new(CsvOpportunityProvider::new(csv.clone())),
        Arc::new(InMemorySavedFilterRepository::default()),
    );
    let outcome = service.refresh()?;
    println!("Scored {} opportunities from {}", outcome.scored, csv.display());

    let mut spec = FilterSpec {
        match_score_range: min_score.map(Bounds::at_least).unwrap_or_default(),
        ..FilterSpec::default()
    };
    if let Some(preset) = preset {
        spec = service.apply_preset(&spec, &preset, Utc::now())?;
        println!("Applied quick filter: {preset}");
    }

    let result = service.search(&spec)?;
    render_results(&result, explain);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        preset,
        exclude,
        explain,
    } = args;

    println!("Opportunity engine demo");
    let service = OpportunityService::new(
        Arc::new(SampleOpportunityProvider),
        Arc::new(InMemorySavedFilterRepository::default()),
    );
    let outcome = service.refresh()?;
    println!("Scored {} sample opportunities", outcome.scored);

    if !exclude.is_empty() {
        let ids: Vec<OpportunityId> = exclude.iter().map(|id| OpportunityId(id.clone())).collect();
        let moved = service.exclude(&ids)?;
        println!("Excluded {moved} opportunities by request");
    }

    println!("\nPipeline board");
    for (category, column) in service.board().grouped() {
        let ids: Vec<&str> = column
            .iter()
            .map(|candidate| candidate.opportunity.id.as_str())
            .collect();
        println!("  {:<14} {:>2}  [{}]", category.label(), column.len(), ids.join(", "));
    }

    let now = Utc::now();
    println!("\nQuick filters");
    for quick in service.presets(now) {
        let spec = service.apply_preset(&FilterSpec::default(), &quick.id, now)?;
        let hits = service.search(&spec)?.summary.filtered;
        println!("  {:<16} {:>2} hits  {}", quick.id, hits, quick.description);
    }

    if let Some(preset) = preset {
        let spec = service.apply_preset(&FilterSpec::default(), &preset, now)?;
        println!("\nResults for quick filter: {preset}");
        render_results(&service.search(&spec)?, explain);
    } else if explain {
        render_results(&service.search(&FilterSpec::default())?, true);
    }

    Ok(())
}

fn render_results(result: &SearchResult, explain: bool) {
    println!(
        "\nShowing {} of {} opportunities",
        result.summary.filtered, result.summary.total
    );
    for candidate in &result.results {
        let opportunity = &candidate.opportunity;
        let boosts = score(opportunity);
        println!(
            "- [{}] {} ({})",
            opportunity.id, opportunity.title, opportunity.agency_name
        );
        println!(
            "    match {:>3}  win {:>5.1}%  category {}",
            candidate.match_score,
            candidate.win_probability_percent(),
            category_label(candidate.effective_category(), candidate.category),
        );
        if !boosts.match_boosts.is_empty() || !boosts.win_boosts.is_empty() {
            println!(
                "    boosts: match [{}]  win [{}]",
                boosts.match_boosts.join(", "),
                boosts.win_boosts.join(", ")
            );
        }

        if explain {
            for detail in &candidate.match_details {
                println!(
                    "    * {} ({}): {}",
                    detail.kind, detail.score, detail.description
                );
            }
            for recommendation in &candidate.recommendations {
                println!("    > {recommendation}");
            }
        }
    }

    let counts: Vec<String> = result
        .summary
        .by_category
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(category, count)| format!("{}: {count}", category.label()))
        .collect();
    if !counts.is_empty() {
        println!("By category: {}", counts.join(", "));
    }
}

fn category_label(effective: OpportunityCategory, computed: OpportunityCategory) -> String {
    if effective == computed {
        effective.label().to_string()
    } else {
        format!("{} (scored {})", effective.label(), computed.label())
    }
}

/// Representative federal solicitations. Deadlines are offsets from `reference` so
/// date-based presets stay meaningful whenever the demo runs.
pub(crate) fn sample_opportunities(reference: DateTime<Utc>) -> Vec<Opportunity> {
    let record = |id: &str,
                  title: &str,
                  agency: &str,
                  (min, max): (u64, u64),
                  due_in_days: i64,
                  naics: [&str; 2],
                  set_aside: &str,
                  vehicle: &str,
                  location: &str,
                  description: &str,
                  kind: &str| Opportunity {
        id: OpportunityId::from(id),
        title: title.to_string(),
        agency_name: agency.to_string(),
        description: description.to_string(),
        location: location.to_string(),
        opportunity_type: kind.to_string(),
        estimated_value_min: min,
        estimated_value_max: max,
        response_deadline: reference + Duration::days(due_in_days),
        naics_codes: naics.iter().map(|code| code.to_string()).collect(),
        set_aside_program: Some(set_aside.to_string()),
        contract_vehicle: Some(vehicle.to_string()),
        required_certifications: Vec::new(),
        security_clearance: None,
        competition_level: None,
    };

    let mut records = vec![
        record(
            "1",
            "IT Support Services for Federal Agency",
            "Department of Defense",
            (500_000, 2_000_000),
            20,
            ["541511", "541512"],
            "Small Business Set-Aside",
            "GSA Schedule",
            "Salt Lake City, UT",
            "Comprehensive IT support services including help desk, network administration, and cybersecurity support.",
            "Services",
        ),
        record(
            "2",
            "Software Development for Healthcare System",
            "Department of Veterans Affairs",
            (1_000_000, 5_000_000),
            56,
            ["541511", "621111"],
            "8(a) Competitive",
            "OASIS",
            "Denver, CO",
            "Development of patient management software system with integration to existing VA infrastructure.",
            "Development",
        ),
        record(
            "3",
            "Construction Services for Military Base",
            "U.S. Air Force",
            (2_000_000, 10_000_000),
            5,
            ["236220", "237310"],
            "VOSB Set-Aside",
            "Multiple Award Schedule",
            "Hill AFB, UT",
            "Construction and renovation of administrative buildings and support facilities.",
            "Construction",
        ),
        record(
            "4",
            "Cybersecurity Assessment Services",
            "Department of Homeland Security",
            (300_000, 1_500_000),
            76,
            ["541512", "541519"],
            "WOSB Set-Aside",
            "SEWP",
            "Washington, DC",
            "Comprehensive cybersecurity assessment and penetration testing for critical infrastructure.",
            "Services",
        ),
        record(
            "5",
            "Training and Development Program",
            "Department of Labor",
            (200_000, 800_000),
            112,
            ["611513", "541611"],
            "HUBZone Set-Aside",
            "GSA Schedule",
            "Salt Lake City, UT",
            "Workforce development and training program for federal employees.",
            "Training",
        ),
        record(
            "6",
            "Data Analytics Platform Development",
            "National Institutes of Health",
            (800_000, 3_000_000),
            41,
            ["541511", "541690"],
            "Small Business Set-Aside",
            "CIO-SP3",
            "Bethesda, MD",
            "Development of data analytics platform for research data management and analysis.",
            "Development",
        ),
        record(
            "7",
            "Facilities Maintenance Services",
            "General Services Administration",
            (500_000, 2_500_000),
            35,
            ["561210", "238220"],
            "Small Business Set-Aside",
            "GSA Schedule",
            "Multiple Locations",
            "Comprehensive facilities maintenance and management services for federal buildings.",
            "Services",
        ),
        record(
            "8",
            "Environmental Consulting Services",
            "Environmental Protection Agency",
            (400_000, 1_800_000),
            91,
            ["541620", "541370"],
            "SDVOSB Set-Aside",
            "OASIS",
            "Denver, CO",
            "Environmental impact assessments and compliance consulting services.",
            "Consulting",
        ),
    ];

    records[0].required_certifications = vec!["CMMC Level 2".to_string()];
    records[0].security_clearance = Some("Secret".to_string());
    records[0].competition_level = Some("medium".to_string());
    records[1].competition_level = Some("high".to_string());
    records[3].security_clearance = Some("Top Secret".to_string());
    records[3].competition_level = Some("high".to_string());
    records[6].competition_level = Some("low".to_string());

    records
}
