use serde::Serialize;

use super::factors::{capped, total, FactorContribution};
use super::features::Features;
use super::keywords::{
    count_hits, matches_any, COMMERCIAL_KEYWORDS, HIGH_VALUE_INDUSTRIES,
    MEDIUM_VALUE_INDUSTRIES, PREMIUM_KEYWORDS, SCALE_KEYWORDS,
};
use crate::prospect::Prospect;

pub const COMMERCIAL_FOCUS_CAP: f64 = 25.0;
pub const PRICE_INDICATORS_CAP: f64 = 25.0;
pub const SCALE_SIGNALS_CAP: f64 = 25.0;
pub const INDUSTRY_VALUE_CAP: f64 = 25.0;

/// Likelihood that a prospect represents commercial, premium or scaled work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighTicketFactors {
    pub commercial_focus: f64,
    pub price_indicators: f64,
    pub scale_signals: f64,
    pub industry_value: f64,
}

impl HighTicketFactors {
    pub fn calculate(prospect: &Prospect, features: &Features) -> Self {
        Self {
            commercial_focus: commercial_focus(features),
            price_indicators: price_indicators(features),
            scale_signals: scale_signals(prospect, features),
            industry_value: industry_value(features),
        }
    }

    pub fn total(&self) -> f64 {
        total(&[
            self.commercial_focus,
            self.price_indicators,
            self.scale_signals,
            self.industry_value,
        ])
    }

    pub fn contributions(&self) -> [FactorContribution; 4] {
        [
            FactorContribution::new("Commercial Focus", self.commercial_focus, COMMERCIAL_FOCUS_CAP),
            FactorContribution::new("Price Indicators", self.price_indicators, PRICE_INDICATORS_CAP),
            FactorContribution::new("Scale Signals", self.scale_signals, SCALE_SIGNALS_CAP),
            FactorContribution::new("Industry Value", self.industry_value, INDUSTRY_VALUE_CAP),
        ]
    }
}

fn commercial_focus(features: &Features) -> f64 {
    let hits = count_hits(&features.search_text, COMMERCIAL_KEYWORDS);
    capped(hits as f64 * 8.0, COMMERCIAL_FOCUS_CAP)
}

fn price_indicators(features: &Features) -> f64 {
    let hits = count_hits(&features.search_text, PREMIUM_KEYWORDS);
    capped(hits as f64 * 6.0, PRICE_INDICATORS_CAP)
}

fn scale_signals(prospect: &Prospect, features: &Features) -> f64 {
    let keyword_points = count_hits(&features.search_text, SCALE_KEYWORDS) as f64 * 5.0;

    // Strict thresholds: 101 reviews / 11 employees for the top tier
    let review_points = match prospect.reviews() {
        n if n > 100 => 10.0,
        n if n > 50 => 5.0,
        _ => 0.0,
    };
    let employee_points = match prospect.employees() {
        n if n > 10 => 10.0,
        n if n > 5 => 5.0,
        _ => 0.0,
    };

    capped(
        keyword_points + review_points + employee_points,
        SCALE_SIGNALS_CAP,
    )
}

/// Single tier pick; unknown industries still get a floor of 8.
fn industry_value(features: &Features) -> f64 {
    let points = if matches_any(&features.business_type, HIGH_VALUE_INDUSTRIES) {
        25.0
    } else if matches_any(&features.business_type, MEDIUM_VALUE_INDUSTRIES) {
        15.0
    } else {
        8.0
    };
    capped(points, INDUSTRY_VALUE_CAP)
}
