use crate::prospect::types::present;
use crate::prospect::Prospect;

/// Normalized lookups shared by the three score calculators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Features {
    /// Lowercase name, type, categories, reviews and qualification notes
    pub search_text: String,
    /// Lowercase business type, falling back to categories
    pub business_type: String,
    pub city: String,
}

impl Features {
    pub fn extract(prospect: &Prospect) -> Self {
        let search_text = [
            &prospect.company_name,
            &prospect.business_type,
            &prospect.categories,
            &prospect.recent_reviews,
            &prospect.qualification_signals,
        ]
        .into_iter()
        .filter_map(present)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

        let business_type = present(&prospect.business_type)
            .or_else(|| present(&prospect.categories))
            .unwrap_or_default()
            .to_lowercase();

        let city = present(&prospect.city).unwrap_or_default().to_lowercase();

        Self {
            search_text,
            business_type,
            city,
        }
    }
}
