use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for sourced opportunities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpportunityId(pub String);

impl OpportunityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OpportunityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for OpportunityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Solicitation record as published by the contracting data provider.
///
/// Records are treated as immutable once ingested; a changed record is re-ingested and
/// re-scored rather than edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: OpportunityId,
    pub title: String,
    pub agency_name: String,
    pub description: String,
    pub location: String,
    pub opportunity_type: String,
    pub estimated_value_min: u64,
    pub estimated_value_max: u64,
    pub response_deadline: DateTime<Utc>,
    pub naics_codes: Vec<String>,
    #[serde(default)]
    pub set_aside_program: Option<String>,
    #[serde(default)]
    pub contract_vehicle: Option<String>,
    #[serde(default)]
    pub required_certifications: Vec<String>,
    #[serde(default)]
    pub security_clearance: Option<String>,
    #[serde(default)]
    pub competition_level: Option<String>,
}

impl Opportunity {
    /// Reject records whose values would make the score meaningless.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.0.trim().is_empty() {
            return Err(ValidationError::new("id", "must not be empty"));
        }

        if self.estimated_value_min > self.estimated_value_max {
            return Err(ValidationError::new(
                "estimated_value_min",
                format!(
                    "{} exceeds estimated_value_max {}",
                    self.estimated_value_min, self.estimated_value_max
                ),
            ));
        }

        if let Some(code) = self.naics_codes.iter().find(|code| !is_naics_code(code)) {
            return Err(ValidationError::new(
                "naics_codes",
                format!("'{code}' is not a 6-digit NAICS code"),
            ));
        }

        Ok(())
    }

    pub fn set_aside(&self) -> Option<&str> {
        self.set_aside_program
            .as_deref()
            .filter(|program| !program.is_empty())
    }

    pub fn vehicle(&self) -> Option<&str> {
        self.contract_vehicle
            .as_deref()
            .filter(|vehicle| !vehicle.is_empty())
    }

    /// `UT` is matched as a raw, case-sensitive substring, so "OUTSIDE CONUS" also counts.
    pub(crate) fn is_in_utah(&self) -> bool {
        self.location.contains("UT") || self.location.contains("Utah")
    }

    pub(crate) fn has_naics_prefix(&self, prefix: &str) -> bool {
        self.naics_codes.iter().any(|code| code.starts_with(prefix))
    }
}

fn is_naics_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|byte| byte.is_ascii_digit())
}

/// Ingestion failure naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
