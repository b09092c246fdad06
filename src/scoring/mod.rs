pub mod engine;
pub mod factors;
pub mod features;
pub mod high_ticket;
pub mod keywords;
pub mod lead_gen;
pub mod opportunity;
pub mod tags;

pub use engine::{calculate_enhanced_scores, EnhancedScores, ScoringFactors};
pub use factors::{FactorContribution, MAX_SCORE};
pub use features::Features;
pub use high_ticket::HighTicketFactors;
pub use lead_gen::LeadGenFactors;
pub use opportunity::OpportunityFactors;
pub use tags::{classify_tags, OpportunityTag};
