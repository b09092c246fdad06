use serde::Serialize;

/// Upper bound of every top-level score.
pub const MAX_SCORE: f64 = 100.0;

/// One sub-factor's share of a score, for breakdown display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorContribution {
    pub label: &'static str, // e.g. "Commercial Focus"
    pub points: f64,
    pub cap: f64,
}

impl FactorContribution {
    pub fn new(label: &'static str, points: f64, cap: f64) -> Self {
        Self { label, points, cap }
    }
}

/// Clamp a sub-factor into `[0, cap]`.
pub fn capped(points: f64, cap: f64) -> f64 {
    points.clamp(0.0, cap)
}

/// Sum already-capped sub-factors and clamp the total into `[0, 100]`.
pub fn total(parts: &[f64]) -> f64 {
    parts.iter().sum::<f64>().clamp(0.0, MAX_SCORE)
}

/// First tier whose threshold `value` reaches; thresholds are checked in order.
pub fn tier(value: f64, tiers: &[(f64, f64)], fallback: f64) -> f64 {
    tiers
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(_, points)| *points)
        .unwrap_or(fallback)
}
