use super::super::domain::Opportunity;
use super::Bounds;
use std::collections::BTreeSet;

/// An opportunity code refines a filter code, or a filter code falls in the code's
/// two-digit sector. Intentionally permissive in both directions.
pub(super) fn naics(filter_codes: &BTreeSet<String>, codes: &[String]) -> bool {
    if filter_codes.is_empty() {
        return true;
    }

    codes.iter().any(|code| {
        let sector = code.get(..2).unwrap_or(code.as_str());
        filter_codes.iter().any(|filter_code| {
            code.starts_with(filter_code.as_str()) || filter_code.starts_with(sector)
        })
    })
}

pub(super) fn member(allowed: &BTreeSet<String>, value: Option<&String>) -> bool {
    allowed.is_empty() || value.is_some_and(|value| allowed.contains(value))
}

pub(super) fn any_member(allowed: &BTreeSet<String>, values: &[String]) -> bool {
    allowed.is_empty() || values.iter().any(|value| allowed.contains(value))
}

pub(super) fn bounded<T: PartialOrd + Copy>(bounds: &Bounds<T>, value: T) -> bool {
    bounds.contains(value)
}

/// The opportunity's whole value band must sit inside the filter range.
pub(super) fn value_contained(bounds: &Bounds<u64>, opportunity: &Opportunity) -> bool {
    bounds
        .min
        .map_or(true, |min| opportunity.estimated_value_min >= min)
        && bounds
            .max
            .map_or(true, |max| opportunity.estimated_value_max <= max)
}

pub(super) fn keywords_included(keywords: &BTreeSet<String>, opportunity: &Opportunity) -> bool {
    if keywords.is_empty() {
        return true;
    }

    let haystacks = [
        opportunity.title.to_lowercase(),
        opportunity.description.to_lowercase(),
        opportunity.agency_name.to_lowercase(),
    ];
    keywords.iter().any(|keyword| {
        let needle = keyword.to_lowercase();
        haystacks.iter().any(|text| text.contains(&needle))
    })
}

/// Agency name is deliberately not searched for exclusions.
pub(super) fn keywords_absent(excluded: &BTreeSet<String>, opportunity: &Opportunity) -> bool {
    if excluded.is_empty() {
        return true;
    }

    let haystacks = [
        opportunity.title.to_lowercase(),
        opportunity.description.to_lowercase(),
    ];
    !excluded.iter().any(|keyword| {
        let needle = keyword.to_lowercase();
        haystacks.iter().any(|text| text.contains(&needle))
    })
}

pub(super) fn agency_included(agencies: &BTreeSet<String>, agency_name: &str) -> bool {
    agencies.is_empty()
        || agencies
            .iter()
            .any(|agency| agency.eq_ignore_ascii_case(agency_name))
}

pub(super) fn agency_not_excluded(excluded: &BTreeSet<String>, agency_name: &str) -> bool {
    !excluded
        .iter()
        .any(|agency| agency.eq_ignore_ascii_case(agency_name))
}
