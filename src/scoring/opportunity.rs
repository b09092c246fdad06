use serde::Serialize;

use super::factors::{capped, tier, total, FactorContribution};
use super::features::Features;
use super::keywords::{matches_any, ESSENTIAL_SERVICES};
use crate::prospect::types::present;
use crate::prospect::Prospect;

pub const WEBSITE_GAP_CAP: f64 = 30.0;
pub const MARKETING_GAP_CAP: f64 = 30.0;
pub const COMPETITOR_WEAKNESS_CAP: f64 = 10.0;
pub const GROWTH_POTENTIAL_CAP: f64 = 20.0;

/// Flat placeholder until competitor market data is available.
pub const COMPETITOR_WEAKNESS_POINTS: f64 = 10.0;

/// Size of the marketing and digital-presence gap for a prospect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityFactors {
    pub website_gap: f64,
    pub marketing_gap: f64,
    pub competitor_weakness: f64,
    pub growth_potential: f64,
}

impl OpportunityFactors {
    pub fn calculate(prospect: &Prospect, features: &Features) -> Self {
        Self {
            website_gap: website_gap(prospect),
            marketing_gap: marketing_gap(prospect),
            competitor_weakness: COMPETITOR_WEAKNESS_POINTS,
            growth_potential: growth_potential(prospect, features),
        }
    }

    pub fn total(&self) -> f64 {
        total(&[
            self.website_gap,
            self.marketing_gap,
            self.competitor_weakness,
            self.growth_potential,
        ])
    }

    pub fn contributions(&self) -> [FactorContribution; 4] {
        [
            FactorContribution::new("Website Gap", self.website_gap, WEBSITE_GAP_CAP),
            FactorContribution::new("Marketing Gap", self.marketing_gap, MARKETING_GAP_CAP),
            FactorContribution::new(
                "Competitor Weakness",
                self.competitor_weakness,
                COMPETITOR_WEAKNESS_CAP,
            ),
            FactorContribution::new(
                "Growth Potential",
                self.growth_potential,
                GROWTH_POTENTIAL_CAP,
            ),
        ]
    }
}

/// Tiered, first match wins.
fn website_gap(prospect: &Prospect) -> f64 {
    let points = match present(&prospect.website) {
        None => 30.0,
        Some(_) if prospect.needs_website.unwrap_or(false) => 25.0,
        Some(url) if !url.contains("http") => 20.0,
        Some(_) if !prospect.has_cms.unwrap_or(false) => 15.0,
        Some(_) => 5.0,
    };
    capped(points, WEBSITE_GAP_CAP)
}

fn marketing_gap(prospect: &Prospect) -> f64 {
    let mut points = 0.0;

    let facebook = prospect.has_facebook();
    let instagram = prospect.has_instagram();
    if !facebook && !instagram && !prospect.has_linkedin() {
        points += 15.0;
    } else if facebook != instagram {
        points += 8.0;
    }

    if !prospect.has_analytics.unwrap_or(false) {
        points += 7.0;
    }

    if !prospect.has_live_chat.unwrap_or(false) && !prospect.has_booking_widget.unwrap_or(false) {
        points += 5.0;
    }

    if !prospect.has_any_email() {
        points += 5.0;
    }

    // Good service, but not asking for reviews
    if prospect.rating() >= 4.0 && prospect.reviews() < 20 {
        points += 10.0;
    }

    capped(points, MARKETING_GAP_CAP)
}

fn growth_potential(prospect: &Prospect, features: &Features) -> f64 {
    let mut points = tier(prospect.rating(), &[(4.5, 10.0), (4.0, 5.0)], 0.0);

    if prospect.reviews() >= 50 {
        points += 5.0;
    }

    if matches_any(&features.business_type, ESSENTIAL_SERVICES) {
        points += 5.0;
    }

    capped(points, GROWTH_POTENTIAL_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors(p: &Prospect) -> OpportunityFactors {
        OpportunityFactors::calculate(p, &Features::extract(p))
    }

    fn with_website(url: &str) -> Prospect {
        Prospect {
            website: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_website_gap_tiers() {
        assert_eq!(factors(&Prospect::default()).website_gap, 30.0);

        let mut p = with_website("https://acme.com");
        p.needs_website = Some(true);
        assert_eq!(factors(&p).website_gap, 25.0);

        assert_eq!(factors(&with_website("acme.com")).website_gap, 20.0);
        assert_eq!(factors(&with_website("https://acme.com")).website_gap, 15.0);

        let mut p = with_website("https://acme.com");
        p.has_cms = Some(false);
        assert_eq!(factors(&p).website_gap, 15.0);
        p.has_cms = Some(true);
        assert_eq!(factors(&p).website_gap, 5.0);
    }

    #[test]
    fn test_website_gap_empty_string_is_missing() {
        assert_eq!(factors(&with_website("")).website_gap, 30.0);
    }

    #[test]
    fn test_marketing_gap_no_presence_caps_at_30() {
        // 15 + 7 + 5 + 5 + 10 = 42
        let p = Prospect {
            google_rating: Some(4.2),
            review_count: Some(3),
            ..Default::default()
        };
        assert_eq!(factors(&p).marketing_gap, 30.0);
    }

    #[test]
    fn test_marketing_gap_single_social() {
        let p = Prospect {
            company_instagram: Some("https://instagram.com/acme".to_string()),
            has_analytics: Some(true),
            has_booking_widget: Some(true),
            email: Some("owner@acme.com".to_string()),
            ..Default::default()
        };
        assert_eq!(factors(&p).marketing_gap, 8.0);
    }

    #[test]
    fn test_marketing_gap_fully_covered() {
        let p = Prospect {
            facebook: Some("fb".to_string()),
            instagram: Some("ig".to_string()),
            has_analytics: Some(true),
            has_live_chat: Some(true),
            additional_emails: Some(vec!["sales@acme.com".to_string()]),
            google_rating: Some(4.8),
            review_count: Some(20),
            ..Default::default()
        };
        assert_eq!(factors(&p).marketing_gap, 0.0);
    }

    #[test]
    fn test_marketing_gap_linkedin_only() {
        // LinkedIn suppresses the "no social" bonus; neither FB nor IG earns nothing
        let p = Prospect {
            company_linkedin: Some("li".to_string()),
            has_analytics: Some(true),
            has_live_chat: Some(true),
            email: Some("a@b.com".to_string()),
            ..Default::default()
        };
        assert_eq!(factors(&p).marketing_gap, 0.0);
    }

    #[test]
    fn test_competitor_weakness_is_constant() {
        assert_eq!(factors(&Prospect::default()).competitor_weakness, 10.0);
        assert_eq!(
            factors(&with_website("https://acme.com")).competitor_weakness,
            COMPETITOR_WEAKNESS_POINTS
        );
    }

    #[test]
    fn test_growth_rating_boundary() {
        let mut p = Prospect {
            google_rating: Some(4.5),
            ..Default::default()
        };
        assert_eq!(factors(&p).growth_potential, 10.0);
        p.google_rating = Some(4.49);
        assert_eq!(factors(&p).growth_potential, 5.0);
        p.google_rating = Some(4.0);
        assert_eq!(factors(&p).growth_potential, 5.0);
        p.google_rating = Some(3.9);
        assert_eq!(factors(&p).growth_potential, 0.0);
    }

    #[test]
    fn test_growth_full() {
        let p = Prospect {
            business_type: Some("Septic Tank Service".to_string()),
            google_rating: Some(4.9),
            review_count: Some(50),
            ..Default::default()
        };
        assert_eq!(factors(&p).growth_potential, 20.0);
    }
}
