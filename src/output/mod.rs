pub mod formatter;

pub use formatter::{
    format_json, format_prospect_detail, format_score, format_scored_table, format_tags,
    format_tsv, should_use_colors,
};
