pub mod browser;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod prospect;
pub mod scoring;

pub use pipeline::{ScoredProspect, SortKey};
pub use prospect::Prospect;
pub use scoring::{calculate_enhanced_scores, EnhancedScores, OpportunityTag};
