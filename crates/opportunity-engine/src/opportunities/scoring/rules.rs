use super::super::domain::Opportunity;

const MATCH_BASE: i16 = 50;
const MATCH_FLOOR: i16 = 0;
const MATCH_CEILING: i16 = 100;

// Win probability is accumulated in whole percentage points.
const WIN_BASE: i16 = 30;
const WIN_FLOOR: i16 = 5;
const WIN_CEILING: i16 = 95;

pub(crate) const IT_SERVICES_NAICS_PREFIX: &str = "5415";
const SWEET_SPOT_MIN: u64 = 500_000;
const SWEET_SPOT_MAX: u64 = 5_000_000;
const SMALL_CONTRACT_MAX: u64 = 1_000_000;

/// Additive adjustment applied at most once when its predicate holds.
pub(crate) struct Boost {
    pub(crate) name: &'static str,
    pub(crate) points: i16,
    pub(crate) applies: fn(&Opportunity) -> bool,
}

pub(crate) const MATCH_BOOSTS: [Boost; 4] = [
    Boost {
        name: "utah_location",
        points: 20,
        applies: in_utah,
    },
    Boost {
        name: "small_business_set_aside",
        points: 15,
        applies: small_business_set_aside,
    },
    Boost {
        name: "it_services_naics",
        points: 10,
        applies: it_services_naics,
    },
    Boost {
        name: "value_sweet_spot",
        points: 10,
        applies: value_sweet_spot,
    },
];

pub(crate) const WIN_BOOSTS: [Boost; 3] = [
    Boost {
        name: "small_contract",
        points: 20,
        applies: small_contract,
    },
    Boost {
        name: "set_aside_present",
        points: 15,
        applies: set_aside_present,
    },
    Boost {
        name: "utah_location",
        points: 10,
        applies: in_utah,
    },
];

pub(crate) fn match_score(opportunity: &Opportunity) -> u8 {
    let total = MATCH_BASE + applied_points(&MATCH_BOOSTS, opportunity);
    total.clamp(MATCH_FLOOR, MATCH_CEILING) as u8
}

pub(crate) fn win_probability(opportunity: &Opportunity) -> f64 {
    let points = WIN_BASE + applied_points(&WIN_BOOSTS, opportunity);
    f64::from(points.clamp(WIN_FLOOR, WIN_CEILING)) / 100.0
}

/// Names of the boosts that fired, in table order.
pub(crate) fn applied_boosts(boosts: &[Boost], opportunity: &Opportunity) -> Vec<&'static str> {
    boosts
        .iter()
        .filter(|boost| (boost.applies)(opportunity))
        .map(|boost| boost.name)
        .collect()
}

fn applied_points(boosts: &[Boost], opportunity: &Opportunity) -> i16 {
    boosts
        .iter()
        .filter(|boost| (boost.applies)(opportunity))
        .map(|boost| boost.points)
        .sum()
}

fn in_utah(opportunity: &Opportunity) -> bool {
    opportunity.is_in_utah()
}

fn small_business_set_aside(opportunity: &Opportunity) -> bool {
    opportunity
        .set_aside_program
        .as_deref()
        .is_some_and(|program| program.contains("Small Business"))
}

fn it_services_naics(opportunity: &Opportunity) -> bool {
    opportunity.has_naics_prefix(IT_SERVICES_NAICS_PREFIX)
}

fn value_sweet_spot(opportunity: &Opportunity) -> bool {
    opportunity.estimated_value_min >= SWEET_SPOT_MIN
        && opportunity.estimated_value_max <= SWEET_SPOT_MAX
}

fn small_contract(opportunity: &Opportunity) -> bool {
    opportunity.estimated_value_max <= SMALL_CONTRACT_MAX
}

fn set_aside_present(opportunity: &Opportunity) -> bool {
    opportunity.set_aside().is_some()
}
