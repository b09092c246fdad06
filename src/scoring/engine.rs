use serde::Serialize;

use super::features::Features;
use super::high_ticket::HighTicketFactors;
use super::lead_gen::LeadGenFactors;
use super::opportunity::OpportunityFactors;
use super::tags::{classify_tags, OpportunityTag};
use crate::prospect::Prospect;

/// Per-score sub-factor breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringFactors {
    pub high_ticket: HighTicketFactors,
    pub opportunity: OpportunityFactors,
    pub lead_gen: LeadGenFactors,
}

/// Scores and tags for one prospect. Serializes to the host's column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedScores {
    pub high_ticket_score: f64,
    pub opportunity_score: f64,
    pub lead_gen_score: f64,
    pub opportunity_tags: Vec<OpportunityTag>,
    pub scoring_factors: ScoringFactors,
}

impl EnhancedScores {
    pub fn has_tag(&self, tag: OpportunityTag) -> bool {
        self.opportunity_tags.contains(&tag)
    }

    /// Mean of the three scores, used for combined ranking
    pub fn combined(&self) -> f64 {
        (self.high_ticket_score + self.opportunity_score + self.lead_gen_score) / 3.0
    }
}

/// Score a prospect. Pure and infallible: identical input gives identical output.
pub fn calculate_enhanced_scores(prospect: &Prospect) -> EnhancedScores {
    let features = Features::extract(prospect);

    let high_ticket = HighTicketFactors::calculate(prospect, &features);
    let opportunity = OpportunityFactors::calculate(prospect, &features);
    let lead_gen = LeadGenFactors::calculate(&features);

    let high_ticket_score = high_ticket.total();
    let opportunity_score = opportunity.total();
    let lead_gen_score = lead_gen.total();

    let opportunity_tags = classify_tags(
        prospect,
        &features,
        high_ticket_score,
        opportunity_score,
        lead_gen_score,
    );

    EnhancedScores {
        high_ticket_score,
        opportunity_score,
        lead_gen_score,
        opportunity_tags,
        scoring_factors: ScoringFactors {
            high_ticket,
            opportunity,
            lead_gen,
        },
    }
}
