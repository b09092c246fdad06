pub mod dedup;
pub mod loader;
pub mod types;

pub use dedup::dedupe_prospects;
pub use loader::{load_file, load_prospects, LoadedProspects, RecordFailure};
pub use types::Prospect;
