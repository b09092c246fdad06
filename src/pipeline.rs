use anyhow::{bail, Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::prospect::{dedupe_prospects, load_prospects, Prospect, RecordFailure};
use crate::scoring::{calculate_enhanced_scores, EnhancedScores, OpportunityTag};

/// Score used to rank prospects.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum SortKey {
    HighTicket,
    #[default]
    Opportunity,
    LeadGen,
    /// Mean of the three scores
    Combined,
}

impl SortKey {
    const ALL: [SortKey; 4] = [
        SortKey::HighTicket,
        SortKey::Opportunity,
        SortKey::LeadGen,
        SortKey::Combined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::HighTicket => "high_ticket",
            SortKey::Opportunity => "opportunity",
            SortKey::LeadGen => "lead_gen",
            SortKey::Combined => "combined",
        }
    }

    pub fn score(&self, scores: &EnhancedScores) -> f64 {
        match self {
            SortKey::HighTicket => scores.high_ticket_score,
            SortKey::Opportunity => scores.opportunity_score,
            SortKey::LeadGen => scores.lead_gen_score,
            SortKey::Combined => scores.combined(),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match SortKey::ALL.iter().find(|k| k.as_str().eq_ignore_ascii_case(s)) {
            Some(key) => Ok(*key),
            None => bail!(
                "Unknown sort key '{}' (expected high_ticket, opportunity, lead_gen or combined)",
                s
            ),
        }
    }
}

/// A prospect together with its freshly computed scores.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredProspect {
    #[serde(flatten)]
    pub prospect: Prospect,
    #[serde(flatten)]
    pub scores: EnhancedScores,
    pub scored_at: DateTime<Utc>,
}

/// A scoring batch whose task failed; only its own records are affected.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    /// 1-based position of the batch's first record
    pub first_record: usize,
    pub records: usize,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct ScoreReport {
    pub scored: Vec<ScoredProspect>,
    pub failures: Vec<BatchFailure>,
}

fn score_batch<F>(batch: Vec<Prospect>, scored_at: DateTime<Utc>, scorer: &F) -> Vec<ScoredProspect>
where
    F: Fn(&Prospect) -> EnhancedScores,
{
    batch
        .into_iter()
        .map(|prospect| {
            let scores = scorer(&prospect);
            ScoredProspect {
                prospect,
                scores,
                scored_at,
            }
        })
        .collect()
}

/// Score prospects in parallel batches on the blocking pool.
///
/// Output keeps input order. Every record of one run shares a `scored_at`.
pub async fn score_all(prospects: Vec<Prospect>, batch_size: usize) -> ScoreReport {
    score_all_with(prospects, batch_size, calculate_enhanced_scores).await
}

/// [`score_all`] with a custom per-record scorer.
///
/// A batch whose task panics becomes a [`BatchFailure`]; the other batches
/// are still returned in input order.
pub async fn score_all_with<F>(prospects: Vec<Prospect>, batch_size: usize, scorer: F) -> ScoreReport
where
    F: Fn(&Prospect) -> EnhancedScores + Send + Sync + 'static,
{
    let scored_at = Utc::now();
    let batch_size = batch_size.max(1);
    let scorer = Arc::new(scorer);

    let mut futures = FuturesUnordered::new();
    let mut remaining = prospects.into_iter().peekable();
    let mut start = 0;
    while remaining.peek().is_some() {
        let batch: Vec<Prospect> = remaining.by_ref().take(batch_size).collect();
        let len = batch.len();
        let batch_start = start;
        start += len;
        let scorer = Arc::clone(&scorer);
        futures.push(async move {
            let result = tokio::task::spawn_blocking(move || {
                score_batch(batch, scored_at, &*scorer)
            })
            .await;
            (batch_start, len, result)
        });
    }

    let mut completed = Vec::new();
    let mut failures = Vec::new();
    while let Some((batch_start, len, result)) = futures.next().await {
        match result {
            Ok(scored) => completed.push((batch_start, scored)),
            Err(e) => {
                warn!(
                    "Scoring batch of {} records starting at {} failed: {}",
                    len,
                    batch_start + 1,
                    e
                );
                failures.push(BatchFailure {
                    first_record: batch_start + 1,
                    records: len,
                    error: e.to_string(),
                });
            }
        }
    }

    completed.sort_by_key(|(batch_start, _)| *batch_start);
    failures.sort_by_key(|f| f.first_record);
    ScoreReport {
        scored: completed.into_iter().flat_map(|(_, scored)| scored).collect(),
        failures,
    }
}

/// Everything produced by loading, deduplicating and scoring a set of inputs.
#[derive(Debug, Default)]
pub struct ScoredRun {
    pub scored: Vec<ScoredProspect>,
    pub record_failures: Vec<RecordFailure>,
    pub batch_failures: Vec<BatchFailure>,
    pub duplicates: usize,
}

impl ScoredRun {
    pub fn skipped(&self) -> usize {
        self.record_failures.len() + self.batch_failures.iter().map(|b| b.records).sum::<usize>()
    }
}

/// Load prospects from all inputs, deduplicate them, and score them.
pub async fn load_and_score(inputs: &[String], batch_size: usize) -> Result<ScoredRun> {
    if inputs.is_empty() {
        bail!("No inputs given. Pass --input or add 'inputs' to the config file.");
    }

    let loaded = load_prospects(inputs)?;
    let loaded_count = loaded.prospects.len();
    let unique = dedupe_prospects(loaded.prospects);
    let duplicates = loaded_count - unique.len();

    debug!(
        "Loaded {} prospects, {} duplicates merged, {} records skipped",
        loaded_count,
        duplicates,
        loaded.failures.len()
    );

    let report = score_all(unique, batch_size).await;
    debug!("Scored {} prospects", report.scored.len());

    Ok(ScoredRun {
        scored: report.scored,
        record_failures: loaded.failures,
        batch_failures: report.failures,
        duplicates,
    })
}

/// Filtering and ranking options for listing.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub sort_by: SortKey,
    /// Minimum sort-key score
    pub min_score: Option<f64>,
    /// Keep prospects carrying any of these tags (empty keeps all)
    pub tags: Vec<OpportunityTag>,
    pub limit: Option<usize>,
}

/// Filter, rank (score descending, then name ascending) and truncate.
pub fn select(scored: Vec<ScoredProspect>, selection: &Selection) -> Vec<ScoredProspect> {
    let key = selection.sort_by;

    let mut selected: Vec<_> = scored
        .into_iter()
        .filter(|s| {
            selection
                .min_score
                .map_or(true, |min| key.score(&s.scores) >= min)
        })
        .filter(|s| {
            selection.tags.is_empty() || selection.tags.iter().any(|t| s.scores.has_tag(*t))
        })
        .collect();

    selected.sort_by(|a, b| {
        let score_cmp = key
            .score(&b.scores)
            .partial_cmp(&key.score(&a.scores))
            .unwrap_or(Ordering::Equal);
        if score_cmp != Ordering::Equal {
            return score_cmp;
        }
        a.prospect
            .display_name()
            .to_lowercase()
            .cmp(&b.prospect.display_name().to_lowercase())
    });

    if let Some(limit) = selection.limit {
        selected.truncate(limit);
    }
    selected
}

/// Counts reported after a rescore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RescoreSummary {
    pub scored: usize,
    pub duplicates: usize,
    pub skipped: usize,
}

/// Write scored prospects as a pretty JSON array, atomically.
pub fn write_scored(path: &Path, scored: &[ScoredProspect]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, scored).context("Failed to serialize scores")?;

    file.commit()
        .with_context(|| format!("Failed to save scores to {}", path.display()))?;

    Ok(())
}

/// Why a rescore stopped: the inputs could not be loaded, or the result
/// could not be written.
#[derive(Debug)]
pub enum RescoreError {
    Input(anyhow::Error),
    Output(anyhow::Error),
}

impl fmt::Display for RescoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RescoreError::Input(e) => write!(f, "input error: {:#}", e),
            RescoreError::Output(e) => write!(f, "output error: {:#}", e),
        }
    }
}

impl std::error::Error for RescoreError {}

/// Re-score every prospect in `inputs` and write the result to `output`.
pub async fn rescore(
    inputs: &[String],
    output: &Path,
    batch_size: usize,
) -> Result<RescoreSummary, RescoreError> {
    let run = load_and_score(inputs, batch_size)
        .await
        .map_err(RescoreError::Input)?;
    write_scored(output, &run.scored).map_err(RescoreError::Output)?;

    Ok(RescoreSummary {
        scored: run.scored.len(),
        duplicates: run.duplicates,
        skipped: run.skipped(),
    })
}

/// Resolve a 1-based list index.
pub fn pick(selected: &[ScoredProspect], index: usize) -> Result<&ScoredProspect> {
    match index.checked_sub(1).and_then(|i| selected.get(i)) {
        Some(scored) => Ok(scored),
        None if selected.is_empty() => bail!("Invalid index {}. The list is empty.", index),
        None => bail!(
            "Invalid index {}. Must be between 1 and {}.",
            index,
            selected.len()
        ),
    }
}
