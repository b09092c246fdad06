use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::features::Features;
use super::keywords::{matches_any, ESSENTIAL_SERVICES};
use crate::prospect::Prospect;

pub const HIGH_TICKET_THRESHOLD: f64 = 60.0;
pub const LEADGEN_THRESHOLD: f64 = 65.0;
pub const GOLDMINE_MIN_REVIEWS: u64 = 30;
pub const GOLDMINE_MIN_OPPORTUNITY: f64 = 50.0;
pub const QUICK_WIN_MIN_OPPORTUNITY: f64 = 70.0;
pub const QUICK_WIN_MIN_RATING: f64 = 4.5;

/// Categorical label used to segment prospects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityTag {
    HighTicket,
    BoringGoldmine,
    LeadgenOpportunity,
    QuickWin,
    NeedsWebsite,
    NeedsSocial,
}

impl OpportunityTag {
    /// Every tag, in classification order
    pub const ALL: [OpportunityTag; 6] = [
        OpportunityTag::HighTicket,
        OpportunityTag::BoringGoldmine,
        OpportunityTag::LeadgenOpportunity,
        OpportunityTag::QuickWin,
        OpportunityTag::NeedsWebsite,
        OpportunityTag::NeedsSocial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityTag::HighTicket => "high_ticket",
            OpportunityTag::BoringGoldmine => "boring_goldmine",
            OpportunityTag::LeadgenOpportunity => "leadgen_opportunity",
            OpportunityTag::QuickWin => "quick_win",
            OpportunityTag::NeedsWebsite => "needs_website",
            OpportunityTag::NeedsSocial => "needs_social",
        }
    }
}

impl fmt::Display for OpportunityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpportunityTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match OpportunityTag::ALL
            .iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
        {
            Some(tag) => Ok(*tag),
            None => bail!("Unknown tag: {}", s),
        }
    }
}

/// Derive tags from the already-clamped totals plus raw field checks.
///
/// Checks are independent; a prospect can carry several tags at once.
pub fn classify_tags(
    prospect: &Prospect,
    features: &Features,
    high_ticket_score: f64,
    opportunity_score: f64,
    lead_gen_score: f64,
) -> Vec<OpportunityTag> {
    let mut tags = Vec::new();

    if high_ticket_score >= HIGH_TICKET_THRESHOLD {
        tags.push(OpportunityTag::HighTicket);
    }

    if matches_any(&features.business_type, ESSENTIAL_SERVICES)
        && prospect.reviews() >= GOLDMINE_MIN_REVIEWS
        && opportunity_score >= GOLDMINE_MIN_OPPORTUNITY
    {
        tags.push(OpportunityTag::BoringGoldmine);
    }

    if lead_gen_score >= LEADGEN_THRESHOLD {
        tags.push(OpportunityTag::LeadgenOpportunity);
    }

    if opportunity_score >= QUICK_WIN_MIN_OPPORTUNITY && prospect.rating() >= QUICK_WIN_MIN_RATING
    {
        tags.push(OpportunityTag::QuickWin);
    }

    if !prospect.has_website() {
        tags.push(OpportunityTag::NeedsWebsite);
    }

    if !prospect.has_facebook() && !prospect.has_instagram() {
        tags.push(OpportunityTag::NeedsSocial);
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(p: &Prospect, ht: f64, opp: f64, lg: f64) -> Vec<OpportunityTag> {
        classify_tags(p, &Features::extract(p), ht, opp, lg)
    }

    fn online() -> Prospect {
        Prospect {
            website: Some("https://acme.com".to_string()),
            facebook: Some("fb".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_tags_for_covered_low_scores() {
        assert!(classify(&online(), 10.0, 10.0, 10.0).is_empty());
    }

    #[test]
    fn test_score_thresholds_inclusive() {
        let p = online();
        assert_eq!(classify(&p, 60.0, 0.0, 0.0), vec![OpportunityTag::HighTicket]);
        assert!(classify(&p, 59.9, 0.0, 0.0).is_empty());
        assert_eq!(
            classify(&p, 0.0, 0.0, 65.0),
            vec![OpportunityTag::LeadgenOpportunity]
        );
        assert!(classify(&p, 0.0, 0.0, 64.0).is_empty());
    }

    #[test]
    fn test_boring_goldmine_requires_all_three() {
        let mut p = online();
        p.business_type = Some("Gutter Cleaning".to_string());
        p.review_count = Some(30);
        assert_eq!(classify(&p, 0.0, 50.0, 0.0), vec![OpportunityTag::BoringGoldmine]);

        p.review_count = Some(29);
        assert!(classify(&p, 0.0, 50.0, 0.0).is_empty());

        p.review_count = Some(30);
        assert!(classify(&p, 0.0, 49.0, 0.0).is_empty());

        p.business_type = Some("Bakery".to_string());
        assert!(classify(&p, 0.0, 50.0, 0.0).is_empty());
    }

    #[test]
    fn test_quick_win_rating_boundary() {
        let mut p = online();
        p.google_rating = Some(4.5);
        assert_eq!(classify(&p, 0.0, 70.0, 0.0), vec![OpportunityTag::QuickWin]);
        p.google_rating = Some(4.4);
        assert!(classify(&p, 0.0, 70.0, 0.0).is_empty());
        p.google_rating = Some(4.5);
        assert!(classify(&p, 0.0, 69.0, 0.0).is_empty());
    }

    #[test]
    fn test_multiple_tags_in_order() {
        let p = Prospect::default();
        assert_eq!(
            classify(&p, 75.0, 0.0, 0.0),
            vec![
                OpportunityTag::HighTicket,
                OpportunityTag::NeedsWebsite,
                OpportunityTag::NeedsSocial
            ]
        );
    }

    #[test]
    fn test_needs_social_ignores_linkedin() {
        let mut p = online();
        p.facebook = None;
        p.linkedin = Some("li".to_string());
        assert_eq!(classify(&p, 0.0, 0.0, 0.0), vec![OpportunityTag::NeedsSocial]);

        p.company_instagram = Some("ig".to_string());
        assert!(classify(&p, 0.0, 0.0, 0.0).is_empty());
    }

    #[test]
    fn test_tag_parse_and_display() {
        for tag in OpportunityTag::ALL {
            assert_eq!(tag.to_string().parse::<OpportunityTag>().unwrap(), tag);
        }
        assert_eq!(
            "Boring_Goldmine".parse::<OpportunityTag>().unwrap(),
            OpportunityTag::BoringGoldmine
        );
        assert!("gold".parse::<OpportunityTag>().is_err());
    }

    #[test]
    fn test_tag_serializes_snake_case() {
        let json = serde_json::to_string(&OpportunityTag::LeadgenOpportunity).unwrap();
        assert_eq!(json, "\"leadgen_opportunity\"");
    }
}
