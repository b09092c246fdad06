//! Static keyword, city and value tables shared by the score calculators.
//!
//! Matching is plain substring containment on lowercase text, so
//! "commercially" matches "commercial" and "contractor" matches "contract".

/// Commercial-focus keywords (High-Ticket).
pub const COMMERCIAL_KEYWORDS: &[&str] = &[
    "commercial",
    "industrial",
    "business",
    "corporate",
    "enterprise",
    "fleet",
    "contract",
    "b2b",
];

/// Premium pricing keywords (High-Ticket).
pub const PREMIUM_KEYWORDS: &[&str] = &[
    "premium",
    "luxury",
    "custom",
    "high-end",
    "professional",
    "certified",
    "licensed",
    "insured",
];

/// Operational scale keywords (High-Ticket).
pub const SCALE_KEYWORDS: &[&str] = &[
    "24/7",
    "24 hour",
    "emergency",
    "same day",
    "fleet",
    "multiple locations",
    "serving",
    "franchise",
];

/// Industries that typically carry large tickets.
pub const HIGH_VALUE_INDUSTRIES: &[&str] = &[
    "roofing",
    "hvac",
    "foundation",
    "restoration",
    "commercial",
    "industrial",
    "remodel",
    "construction",
];

pub const MEDIUM_VALUE_INDUSTRIES: &[&str] =
    &["plumbing", "electrical", "concrete", "paving", "excavation"];

/// "Boring" essential home services with steady demand.
pub const ESSENTIAL_SERVICES: &[&str] = &[
    "plumbing",
    "hvac",
    "electrical",
    "roofing",
    "garage door",
    "pest control",
    "locksmith",
    "septic",
    "foundation",
    "water damage",
    "restoration",
    "tree service",
    "concrete",
    "excavation",
    "paving",
    "fence",
    "gutter",
    "insulation",
    "waterproofing",
];

/// Smaller suburbs with thinner lead-gen competition.
pub const LOW_COMPETITION_CITIES: &[&str] = &[
    "burnsville",
    "lakeville",
    "shakopee",
    "brooklyn park",
    "maple grove",
    "woodbury",
    "eden prairie",
    "plymouth",
    "coon rapids",
    "blaine",
];

/// Minneapolis-St. Paul metro cities.
pub const METRO_CITIES: &[&str] = &[
    "minneapolis",
    "st. paul",
    "st paul",
    "saint paul",
    "bloomington",
    "brooklyn park",
    "plymouth",
    "maple grove",
    "woodbury",
    "eagan",
    "eden prairie",
    "burnsville",
    "lakeville",
    "minnetonka",
    "edina",
    "st. louis park",
    "st louis park",
    "apple valley",
    "coon rapids",
    "blaine",
    "shakopee",
    "richfield",
    "roseville",
];

/// State markers that earn the in-state geographic tier.
pub const STATE_MARKERS: &[&str] = &["mn", "minnesota"];

/// Typical dollar value of one lead, by service category.
pub const LEAD_VALUE_BY_CATEGORY: &[(&str, u32)] = &[
    ("roofing", 150),
    ("hvac", 100),
    ("plumbing", 80),
    ("electrical", 75),
    ("foundation", 200),
    ("water damage", 175),
    ("restoration", 150),
    ("garage door", 60),
    ("pest control", 40),
    ("tree service", 70),
    ("concrete", 100),
    ("paving", 120),
    ("fence", 50),
    ("gutter", 45),
    ("insulation", 80),
    ("waterproofing", 90),
    ("septic", 100),
    ("excavation", 150),
    ("locksmith", 35),
];

/// Lead value when no category in the table matches.
pub const DEFAULT_LEAD_VALUE: u32 = 50;

/// Number of distinct keywords contained in `text`.
pub fn count_hits(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text.contains(*kw)).count()
}

pub fn matches_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

/// Highest lead value among matching categories, or the default.
pub fn lead_value(business_type: &str) -> u32 {
    LEAD_VALUE_BY_CATEGORY
        .iter()
        .filter(|(category, _)| business_type.contains(category))
        .map(|(_, value)| *value)
        .max()
        .unwrap_or(DEFAULT_LEAD_VALUE)
}
