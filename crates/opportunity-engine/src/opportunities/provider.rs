use super::domain::{Opportunity, OpportunityId, ValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// Batch source of raw opportunity records (SAM.gov exports, partner feeds, fixtures).
pub trait OpportunityProvider: Send + Sync {
    fn fetch(&self) -> Result<Vec<Opportunity>, ProviderError>;
}

/// Error raised while retrieving or ingesting opportunity records.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("failed to read opportunity export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to open opportunity export: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: ValidationError,
    },
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Reads a CSV export from disk on every fetch.
#[derive(Debug, Clone)]
pub struct CsvOpportunityProvider {
    path: PathBuf,
}

impl CsvOpportunityProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OpportunityProvider for CsvOpportunityProvider {
    fn fetch(&self) -> Result<Vec<Opportunity>, ProviderError> {
        let file = File::open(&self.path)?;
        parse_opportunities(file)
    }
}

/// Parse and validate a CSV export. The first invalid row aborts the import.
pub fn parse_opportunities<R: Read>(reader: R) -> Result<Vec<Opportunity>, ProviderError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut opportunities = Vec::new();

    for (index, row) in csv_reader.deserialize::<OpportunityRow>().enumerate() {
        // Header occupies line 1.
        let line = index + 2;
        let opportunity = row?
            .into_opportunity()
            .and_then(|opportunity| opportunity.validate().map(|_| opportunity))
            .map_err(|source| ProviderError::InvalidRecord { line, source })?;
        opportunities.push(opportunity);
    }

    Ok(opportunities)
}

#[derive(Debug, Deserialize)]
struct OpportunityRow {
    id: String,
    title: String,
    agency: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    location: String,
    #[serde(rename = "type", default)]
    opportunity_type: String,
    value_min: String,
    value_max: String,
    deadline: String,
    #[serde(default)]
    naics: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    set_aside: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    vehicle: Option<String>,
    #[serde(default)]
    certifications: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    clearance: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    competition: Option<String>,
}

impl OpportunityRow {
    fn into_opportunity(self) -> Result<Opportunity, ValidationError> {
        let estimated_value_min = parse_dollars("estimated_value_min", &self.value_min)?;
        let estimated_value_max = parse_dollars("estimated_value_max", &self.value_max)?;
        let response_deadline = parse_deadline(&self.deadline)?;

        Ok(Opportunity {
            id: OpportunityId(self.id),
            title: self.title,
            agency_name: self.agency,
            description: self.description,
            location: self.location,
            opportunity_type: self.opportunity_type,
            estimated_value_min,
            estimated_value_max,
            response_deadline,
            naics_codes: split_list(&self.naics),
            set_aside_program: self.set_aside,
            contract_vehicle: self.vehicle,
            required_certifications: split_list(&self.certifications),
            security_clearance: self.clearance,
            competition_level: self.competition,
        })
    }
}

fn parse_dollars(field: &'static str, raw: &str) -> Result<u64, ValidationError> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    cleaned.trim().parse::<u64>().map_err(|_| {
        ValidationError::new(
            field,
            format!("'{raw}' is not a non-negative whole-dollar amount"),
        )
    })
}

fn parse_deadline(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            ValidationError::new(
                "response_deadline",
                format!("'{raw}' is not RFC 3339 or YYYY-MM-DD"),
            )
        })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "id,title,agency,description,location,type,value_min,value_max,deadline,naics,set_aside,vehicle\n";

    #[test]
    fn parses_export_rows() {
        let csv = format!(
            "{HEADER}opp-1,IT Support,Department of Defense,Help desk,\"Salt Lake City, UT\",Services,\"$500,000\",2000000,2026-11-15,541511;541512,Small Business Set-Aside,GSA Schedule\n"
        );

        let opportunities = parse_opportunities(csv.as_bytes()).expect("import succeeds");

        assert_eq!(opportunities.len(), 1);
        let opportunity = &opportunities[0];
        assert_eq!(opportunity.estimated_value_min, 500_000);
        assert_eq!(opportunity.naics_codes, vec!["541511", "541512"]);
        assert_eq!(opportunity.location, "Salt Lake City, UT");
        assert_eq!(
            opportunity.set_aside_program.as_deref(),
            Some("Small Business Set-Aside")
        );
        assert_eq!(
            opportunity.response_deadline.date_naive(),
            NaiveDate::from_ymd_opt(2026, 11, 15).expect("valid date")
        );
    }

    #[test]
    fn blank_optional_columns_become_none() {
        let csv = format!(
            "{HEADER}opp-2,Paving,UDOT,Road work,Provo UT,Construction,10,20,2026-12-01T17:00:00Z,237310,,\n"
        );

        let opportunities = parse_opportunities(csv.as_bytes()).expect("import succeeds");

        assert!(opportunities[0].set_aside_program.is_none());
        assert!(opportunities[0].contract_vehicle.is_none());
        assert!(opportunities[0].required_certifications.is_empty());
    }

    #[test]
    fn negative_values_name_the_field() {
        let csv = format!(
            "{HEADER}opp-3,Paving,UDOT,Road work,Provo UT,Construction,-10,20,2026-12-01,237310,,\n"
        );

        match parse_opportunities(csv.as_bytes()) {
            Err(ProviderError::InvalidRecord { line, source }) => {
                assert_eq!(line, 2);
                assert_eq!(source.field, "estimated_value_min");
            }
            other => panic!("expected invalid record, got {other:?}"),
        }
    }

    #[test]
    fn inverted_value_band_is_rejected_at_ingestion() {
        let csv = format!(
            "{HEADER}opp-4,Paving,UDOT,Road work,Provo UT,Construction,900,20,2026-12-01,237310,,\n"
        );

        match parse_opportunities(csv.as_bytes()) {
            Err(ProviderError::InvalidRecord { source, .. }) => {
                assert_eq!(source.field, "estimated_value_min");
            }
            other => panic!("expected invalid record, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_deadline_is_rejected() {
        let csv = format!(
            "{HEADER}opp-5,Paving,UDOT,Road work,Provo UT,Construction,10,20,next tuesday,237310,,\n"
        );

        match parse_opportunities(csv.as_bytes()) {
            Err(ProviderError::InvalidRecord { source, .. }) => {
                assert_eq!(source.field, "response_deadline");
            }
            other => panic!("expected invalid record, got {other:?}"),
        }
    }
}
