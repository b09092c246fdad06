use serde::Serialize;

use super::factors::{capped, tier, total, FactorContribution};
use super::features::Features;
use super::keywords::{
    lead_value, matches_any, ESSENTIAL_SERVICES, LOW_COMPETITION_CITIES, METRO_CITIES,
    STATE_MARKERS,
};

pub const SEARCH_VOLUME_CAP: f64 = 30.0;
pub const COMPETITION_LEVEL_CAP: f64 = 30.0;
pub const MONETIZATION_CAP: f64 = 20.0;
pub const GEOGRAPHIC_OPPORTUNITY_CAP: f64 = 20.0;

/// Lead value thresholds mapped to monetization points.
const MONETIZATION_TIERS: &[(f64, f64)] = &[(150.0, 20.0), (100.0, 15.0), (75.0, 10.0)];

/// Whether the prospect's niche and location are worth a lead-gen play.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadGenFactors {
    pub search_volume: f64,
    pub competition_level: f64,
    pub monetization: f64,
    pub geographic_opportunity: f64,
}

impl LeadGenFactors {
    pub fn calculate(features: &Features) -> Self {
        Self {
            search_volume: search_volume(features),
            competition_level: competition_level(features),
            monetization: monetization(features),
            geographic_opportunity: geographic_opportunity(features),
        }
    }

    pub fn total(&self) -> f64 {
        total(&[
            self.search_volume,
            self.competition_level,
            self.monetization,
            self.geographic_opportunity,
        ])
    }

    pub fn contributions(&self) -> [FactorContribution; 4] {
        [
            FactorContribution::new("Search Volume", self.search_volume, SEARCH_VOLUME_CAP),
            FactorContribution::new(
                "Competition Level",
                self.competition_level,
                COMPETITION_LEVEL_CAP,
            ),
            FactorContribution::new("Monetization", self.monetization, MONETIZATION_CAP),
            FactorContribution::new(
                "Geographic Opportunity",
                self.geographic_opportunity,
                GEOGRAPHIC_OPPORTUNITY_CAP,
            ),
        ]
    }
}

fn search_volume(features: &Features) -> f64 {
    let points = if matches_any(&features.business_type, ESSENTIAL_SERVICES) {
        25.0
    } else {
        10.0
    };
    capped(points, SEARCH_VOLUME_CAP)
}

fn competition_level(features: &Features) -> f64 {
    let mut points = 15.0;
    if matches_any(&features.city, LOW_COMPETITION_CITIES) {
        points += 10.0;
    }
    capped(points, COMPETITION_LEVEL_CAP)
}

fn monetization(features: &Features) -> f64 {
    let value = lead_value(&features.business_type) as f64;
    capped(tier(value, MONETIZATION_TIERS, 5.0), MONETIZATION_CAP)
}

fn geographic_opportunity(features: &Features) -> f64 {
    let points = if matches_any(&features.city, METRO_CITIES) {
        20.0
    } else if matches_any(&features.city, STATE_MARKERS) {
        15.0
    } else {
        10.0
    };
    capped(points, GEOGRAPHIC_OPPORTUNITY_CAP)
}
