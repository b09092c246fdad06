use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::pipeline::{ScoredProspect, SortKey};
use crate::prospect::types::present;
use crate::scoring::{FactorContribution, OpportunityTag};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a 0-100 score as a whole number
pub fn format_score(score: f64) -> String {
    format!("{:.0}", score)
}

/// Format tags as a comma-separated list, or "-" when there are none
pub fn format_tags(tags: &[OpportunityTag]) -> String {
    if tags.is_empty() {
        return "-".to_string();
    }
    tags.iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Color a padded score cell by band: strong (>=70), fair (>=40), weak
fn color_score(cell: &str, score: f64) -> String {
    if score >= 70.0 {
        cell.green().to_string()
    } else if score >= 40.0 {
        cell.yellow().to_string()
    } else {
        cell.dimmed().to_string()
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format prospects as a ranked table.
/// Columns: Index, High-Ticket, Opportunity, Lead-Gen, Company, City, Tags.
/// The company name is truncated to fit the terminal; the sort-key column is bold.
pub fn format_scored_table(prospects: &[ScoredProspect], sort_by: SortKey, use_colors: bool) -> String {
    if prospects.is_empty() {
        return "No prospects found.".to_string();
    }

    let term_width = get_terminal_width();
    let index_width = 4;
    let score_width = 4;
    let separator = "  ";

    let header = format!(
        "{:>index_width$} {:>score_width$}{sep}{:>score_width$}{sep}{:>score_width$}{sep}{}",
        "#",
        "HT",
        "OPP",
        "LG",
        "COMPANY / CITY / TAGS",
        sep = separator,
    );

    let rows = prospects.iter().enumerate().map(|(idx, scored)| {
        let index_str = format!("{:>width$}.", idx + 1, width = index_width - 1);
        let scores = &scored.scores;
        let city = present(&scored.prospect.city).unwrap_or("-");
        let tags = format_tags(&scores.opportunity_tags);

        let fixed_width = index_width + 1 + (score_width + separator.len()) * 3;
        let tail_len = separator.len() * 2 + city.chars().count() + tags.len();
        let name = scored.prospect.display_name();
        let name = match term_width {
            Some(width) if width > fixed_width + tail_len + 10 => {
                truncate_text(name, width - fixed_width - tail_len)
            }
            Some(_) => truncate_text(name, 20),
            None => name.to_string(),
        };

        let cells: Vec<String> = [
            (SortKey::HighTicket, scores.high_ticket_score),
            (SortKey::Opportunity, scores.opportunity_score),
            (SortKey::LeadGen, scores.lead_gen_score),
        ]
        .iter()
        .map(|(key, score)| {
            let cell = format!("{:>width$}", format_score(*score), width = score_width);
            if !use_colors {
                cell
            } else if *key == sort_by {
                color_score(&cell, *score).bold().to_string()
            } else {
                color_score(&cell, *score)
            }
        })
        .collect();

        if use_colors {
            format!(
                "{} {}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}",
                index_str.dimmed(),
                cells[0],
                cells[1],
                cells[2],
                name.bold(),
                city.cyan(),
                tags.yellow(),
                sep = separator,
            )
        } else {
            format!(
                "{} {}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}",
                index_str,
                cells[0],
                cells[1],
                cells[2],
                name,
                city,
                tags,
                sep = separator,
            )
        }
    });

    let header = if use_colors {
        header.dimmed().to_string()
    } else {
        header
    };

    std::iter::once(header)
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format prospects as tab-separated values for scripting
/// Columns: high_ticket, opportunity, lead_gen, company, city, tags (no headers, no colors)
pub fn format_tsv(prospects: &[ScoredProspect]) -> String {
    prospects
        .iter()
        .map(|scored| {
            let scores = &scored.scores;
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                format_score(scores.high_ticket_score),
                format_score(scores.opportunity_score),
                format_score(scores.lead_gen_score),
                scored.prospect.display_name(),
                present(&scored.prospect.city).unwrap_or(""),
                format_tags(&scores.opportunity_tags),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format prospects as a pretty JSON array
pub fn format_json(prospects: &[ScoredProspect]) -> Result<String> {
    serde_json::to_string_pretty(prospects).context("Failed to serialize prospects")
}

fn format_contribution(c: &FactorContribution) -> String {
    format!("    {:<24}{:>4} / {}", c.label, format_score(c.points), format_score(c.cap))
}

fn format_section(title: &str, total: f64, contributions: &[FactorContribution], use_colors: bool) -> String {
    let heading = format!("  {}: {}", title, format_score(total));
    let heading = if use_colors {
        heading.bold().to_string()
    } else {
        heading
    };
    std::iter::once(heading)
        .chain(contributions.iter().map(format_contribution))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format one prospect with its full scoring breakdown (for `show`)
pub fn format_prospect_detail(scored: &ScoredProspect, use_colors: bool) -> String {
    let prospect = &scored.prospect;
    let scores = &scored.scores;
    let factors = &scores.scoring_factors;

    let name = if use_colors {
        prospect.display_name().bold().to_string()
    } else {
        prospect.display_name().to_string()
    };

    let rating = match prospect.google_rating {
        Some(r) => format!("{:.1} ({} reviews)", r, prospect.reviews()),
        None => format!("- ({} reviews)", prospect.reviews()),
    };

    let mut lines = vec![
        name,
        format!(
            "  Type: {}",
            present(&prospect.business_type)
                .or_else(|| present(&prospect.categories))
                .unwrap_or("-")
        ),
        format!("  City: {}", present(&prospect.city).unwrap_or("-")),
        format!("  Rating: {}", rating),
        format!("  Website: {}", present(&prospect.website).unwrap_or("-")),
        format!("  Tags: {}", format_tags(&scores.opportunity_tags)),
        String::new(),
    ];

    lines.push(format_section(
        "High-Ticket",
        scores.high_ticket_score,
        &factors.high_ticket.contributions(),
        use_colors,
    ));
    lines.push(format_section(
        "Opportunity",
        scores.opportunity_score,
        &factors.opportunity.contributions(),
        use_colors,
    ));
    lines.push(format_section(
        "Lead-Gen",
        scores.lead_gen_score,
        &factors.lead_gen.contributions(),
        use_colors,
    ));

    lines.join("\n")
}
