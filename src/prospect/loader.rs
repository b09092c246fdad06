//! Load prospect exports (JSON, JSON Lines, CSV) from files and glob patterns.
//!
//! File-level problems (unreadable file, document that is not JSON at all)
//! are errors. Problems with a single record are collected as
//! [`RecordFailure`]s and never abort the records around them.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::types::Prospect;

/// Columns written by a previous scoring run; recomputed on every run.
pub const SCORE_FIELDS: &[&str] = &[
    "highTicketScore",
    "opportunityScore",
    "leadGenScore",
    "opportunityTags",
    "scoringFactors",
    "scoredAt",
];

/// A record that could not be turned into a [`Prospect`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFailure {
    pub source: String,
    /// 1-based record number within the source
    pub record: usize,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct LoadedProspects {
    pub prospects: Vec<Prospect>,
    pub failures: Vec<RecordFailure>,
}

impl LoadedProspects {
    fn extend(&mut self, other: LoadedProspects) {
        self.prospects.extend(other.prospects);
        self.failures.extend(other.failures);
    }

    fn accept(&mut self, source: &str, record: usize, result: Result<Prospect, String>) {
        match result {
            Ok(mut prospect) => {
                prospect
                    .extra
                    .retain(|key, _| !SCORE_FIELDS.contains(&key.as_str()));
                self.prospects.push(prospect);
            }
            Err(error) => {
                warn!("Skipping record {} in {}: {}", record, source, error);
                self.failures.push(RecordFailure {
                    source: source.to_string(),
                    record,
                    error,
                });
            }
        }
    }
}

/// Expand input paths and glob patterns into a sorted, de-duplicated file list.
///
/// A leading `~/` is resolved against the home directory. Every pattern must
/// match at least one file.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        let expanded = expand_home(pattern);
        let mut matched = 0;
        for entry in glob::glob(&expanded)
            .with_context(|| format!("Invalid input pattern '{}'", pattern))?
        {
            let path = entry.with_context(|| format!("Failed to read a match of '{}'", pattern))?;
            if path.is_file() {
                paths.push(path);
                matched += 1;
            }
        }
        if matched == 0 {
            bail!("No files match input '{}'", pattern);
        }
    }

    paths.sort();
    paths.dedup();
    Ok(paths)
}

fn expand_home(pattern: &str) -> String {
    if let Some(rest) = pattern.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).display().to_string();
        }
    }
    pattern.to_string()
}

/// Load every file matched by `patterns`.
pub fn load_prospects(patterns: &[String]) -> Result<LoadedProspects> {
    let mut loaded = LoadedProspects::default();
    for path in expand_inputs(patterns)? {
        let file_loaded = load_file(&path)?;
        debug!(
            "Loaded {} prospects ({} skipped) from {}",
            file_loaded.prospects.len(),
            file_loaded.failures.len(),
            path.display()
        );
        loaded.extend(file_loaded);
    }
    Ok(loaded)
}

/// Load one export, choosing the format from the file extension.
pub fn load_file(path: &Path) -> Result<LoadedProspects> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open prospect file at {}", path.display()))?;
    let source = path.display().to_string();

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") => parse_csv(file, &source),
        Some("jsonl") | Some("ndjson") => parse_json_lines(BufReader::new(file), &source),
        Some("json") => parse_json(BufReader::new(file), &source),
        _ => bail!(
            "Unsupported prospect file {} (expected .json, .jsonl, .ndjson or .csv)",
            source
        ),
    }
}

/// Parse a JSON array of prospects, or an object with a `prospects` array.
pub fn parse_json<R: Read>(reader: R, source: &str) -> Result<LoadedProspects> {
    let document: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse JSON in {}", source))?;

    let records = match document {
        serde_json::Value::Array(records) => records,
        serde_json::Value::Object(mut map) => match map.remove("prospects") {
            Some(serde_json::Value::Array(records)) => records,
            _ => bail!("Expected an array of prospects or a 'prospects' array in {}", source),
        },
        _ => bail!("Expected an array of prospects in {}", source),
    };

    let mut loaded = LoadedProspects::default();
    for (i, record) in records.into_iter().enumerate() {
        let result = serde_json::from_value::<Prospect>(record).map_err(|e| e.to_string());
        loaded.accept(source, i + 1, result);
    }
    Ok(loaded)
}

/// Parse one JSON object per line; blank lines are ignored.
pub fn parse_json_lines<R: BufRead>(reader: R, source: &str) -> Result<LoadedProspects> {
    let mut loaded = LoadedProspects::default();
    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {} of {}", i + 1, source))?;
        if line.trim().is_empty() {
            continue;
        }
        let result = serde_json::from_str::<Prospect>(&line).map_err(|e| e.to_string());
        loaded.accept(source, i + 1, result);
    }
    Ok(loaded)
}

/// Columns mapped onto [`CsvProspectRow`]; any other column is kept in `extra`.
const CSV_COLUMNS: &[&str] = &[
    "id",
    "externalId",
    "companyName",
    "businessType",
    "categories",
    "city",
    "googleRating",
    "reviewCount",
    "yelpRating",
    "angiRating",
    "facebookRating",
    "website",
    "hasCMS",
    "hasAnalytics",
    "hasLiveChat",
    "hasBookingWidget",
    "needsWebsite",
    "email",
    "additionalEmails",
    "phone",
    "facebook",
    "instagram",
    "linkedin",
    "companyFacebook",
    "companyInstagram",
    "companyLinkedin",
    "employeeCount",
    "recentReviews",
    "qualificationSignals",
];

/// A CSV export row. Column names match the JSON field names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvProspectRow {
    id: Option<String>,
    external_id: Option<String>,
    company_name: Option<String>,
    business_type: Option<String>,
    categories: Option<String>,
    city: Option<String>,
    google_rating: Option<f64>,
    review_count: Option<u64>,
    yelp_rating: Option<f64>,
    angi_rating: Option<f64>,
    facebook_rating: Option<f64>,
    website: Option<String>,
    #[serde(rename = "hasCMS", default, deserialize_with = "deserialize_flag")]
    has_cms: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    has_analytics: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    has_live_chat: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    has_booking_widget: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    needs_website: Option<bool>,
    email: Option<String>,
    /// Semicolon-separated
    additional_emails: Option<String>,
    phone: Option<String>,
    facebook: Option<String>,
    instagram: Option<String>,
    linkedin: Option<String>,
    company_facebook: Option<String>,
    company_instagram: Option<String>,
    company_linkedin: Option<String>,
    employee_count: Option<u64>,
    recent_reviews: Option<String>,
    qualification_signals: Option<String>,
}

impl CsvProspectRow {
    fn into_prospect(self) -> Prospect {
        let additional_emails = self.additional_emails.map(|emails| {
            emails
                .split(';')
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(String::from)
                .collect()
        });

        Prospect {
            id: self.id,
            external_id: self.external_id,
            company_name: self.company_name,
            business_type: self.business_type,
            categories: self.categories,
            city: self.city,
            google_rating: self.google_rating,
            review_count: self.review_count,
            yelp_rating: self.yelp_rating,
            angi_rating: self.angi_rating,
            facebook_rating: self.facebook_rating,
            website: self.website,
            has_cms: self.has_cms,
            has_analytics: self.has_analytics,
            has_live_chat: self.has_live_chat,
            has_booking_widget: self.has_booking_widget,
            needs_website: self.needs_website,
            email: self.email,
            additional_emails,
            phone: self.phone,
            facebook: self.facebook,
            instagram: self.instagram,
            linkedin: self.linkedin,
            company_facebook: self.company_facebook,
            company_instagram: self.company_instagram,
            company_linkedin: self.company_linkedin,
            employee_count: self.employee_count,
            recent_reviews: self.recent_reviews,
            qualification_signals: self.qualification_signals,
            extra: serde_json::Map::new(),
        }
    }
}

/// Parse a CSV export with a header row.
///
/// Unknown non-empty columns are kept as string values in `extra`.
pub fn parse_csv<R: Read>(reader: R, source: &str) -> Result<LoadedProspects> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .with_context(|| format!("Failed to read CSV header in {}", source))?
        .clone();

    let mut loaded = LoadedProspects::default();
    for (i, record) in csv_reader.records().enumerate() {
        let result = record
            .and_then(|record| {
                let row = record.deserialize::<CsvProspectRow>(Some(&headers))?;
                let mut prospect = row.into_prospect();
                for (column, value) in headers.iter().zip(record.iter()) {
                    if !value.is_empty() && !CSV_COLUMNS.contains(&column) {
                        prospect
                            .extra
                            .insert(column.to_string(), serde_json::Value::from(value));
                    }
                }
                Ok(prospect)
            })
            .map_err(|e| e.to_string());
        loaded.accept(source, i + 1, result);
    }
    Ok(loaded)
}

/// Flexible bool: "true"/"false", "1"/"0", "yes"/"no"; empty means absent.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(s) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match s.to_lowercase().trim() {
        "true" | "1" | "yes" | "y" => Ok(Some(true)),
        "false" | "0" | "no" | "n" => Ok(Some(false)),
        "" => Ok(None),
        other => Err(serde::de::Error::custom(format!(
            "expected bool value, got '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    const SAMPLE_CSV: &str = "\
companyName,businessType,city,googleRating,reviewCount,website,hasCMS,additionalEmails,facebook
Northside Roofing,Roofing Contractor,Burnsville,4.8,212,https://northside.example,yes,sales@northside.example; ops@northside.example,
Blue Line Plumbing,Plumbing,Minneapolis,,,,,,https://facebook.com/blueline
Bad Row,Plumbing,Minneapolis,not-a-number,3,,,,
";

    #[test]
    fn test_parse_json_array() {
        let json = r#"[
            {"companyName": "A", "reviewCount": 5},
            {"companyName": "B", "googleRating": 4}
        ]"#;
        let loaded = parse_json(json.as_bytes(), "test.json").unwrap();
        assert_eq!(loaded.prospects.len(), 2);
        assert_eq!(loaded.prospects[1].google_rating, Some(4.0));
        assert!(loaded.failures.is_empty());
    }

    #[test]
    fn test_parse_json_wrapped_object() {
        let json = r#"{"prospects": [{"companyName": "A"}], "exportedAt": "2026-01-01"}"#;
        let loaded = parse_json(json.as_bytes(), "test.json").unwrap();
        assert_eq!(loaded.prospects.len(), 1);
    }

    #[test]
    fn test_parse_json_rejects_scalar_document() {
        assert!(parse_json("42".as_bytes(), "test.json").is_err());
        assert!(parse_json("not json".as_bytes(), "test.json").is_err());
    }

    #[test]
    fn test_bad_record_does_not_affect_siblings() {
        let json = r#"[
            {"companyName": "Good One"},
            {"companyName": "Bad", "reviewCount": -4},
            {"companyName": "Good Two"}
        ]"#;
        let loaded = parse_json(json.as_bytes(), "test.json").unwrap();
        assert_eq!(loaded.prospects.len(), 2);
        assert_eq!(loaded.failures.len(), 1);
        assert_eq!(loaded.failures[0].record, 2);
        assert_eq!(loaded.failures[0].source, "test.json");
    }

    #[test]
    fn test_previous_scores_are_stripped() {
        let json = r#"[{"companyName": "A", "highTicketScore": 99, "opportunityTags": ["quick_win"], "status": "new"}]"#;
        let loaded = parse_json(json.as_bytes(), "test.json").unwrap();
        let extra = &loaded.prospects[0].extra;
        assert_eq!(extra.len(), 1);
        assert!(extra.contains_key("status"));
    }

    #[test]
    fn test_parse_json_lines() {
        let jsonl = "{\"companyName\": \"A\"}\n\n{\"companyName\": 7}\n{\"companyName\": \"C\"}\n";
        let loaded = parse_json_lines(jsonl.as_bytes(), "test.jsonl").unwrap();
        assert_eq!(loaded.prospects.len(), 2);
        assert_eq!(loaded.failures.len(), 1);
        assert_eq!(loaded.failures[0].record, 3);
    }

    #[test]
    fn test_parse_csv() {
        let loaded = parse_csv(SAMPLE_CSV.as_bytes(), "test.csv").unwrap();
        assert_eq!(loaded.prospects.len(), 2);
        assert_eq!(loaded.failures.len(), 1);
        assert_eq!(loaded.failures[0].record, 3);

        let northside = &loaded.prospects[0];
        assert_eq!(northside.review_count, Some(212));
        assert_eq!(northside.has_cms, Some(true));
        assert_eq!(
            northside.additional_emails,
            Some(vec![
                "sales@northside.example".to_string(),
                "ops@northside.example".to_string()
            ])
        );
        assert!(!northside.has_facebook());

        let blue_line = &loaded.prospects[1];
        assert_eq!(blue_line.google_rating, None);
        assert_eq!(blue_line.has_cms, None);
        assert!(!blue_line.has_website());
        assert!(blue_line.has_facebook());
    }

    #[test]
    fn test_parse_csv_keeps_unknown_columns() {
        let csv = "companyName,city,status,owner,highTicketScore\nAcme,Blaine,contacted,,88\n";
        let loaded = parse_csv(csv.as_bytes(), "test.csv").unwrap();
        let extra = &loaded.prospects[0].extra;
        assert_eq!(extra.get("status"), Some(&serde_json::Value::from("contacted")));
        assert!(!extra.contains_key("owner"));
        assert!(!extra.contains_key("highTicketScore"));
        assert!(!extra.contains_key("companyName"));
    }

    #[test]
    fn test_load_file_by_extension_and_globs() {
        let dir = env::temp_dir().join("lead_scout_test_loader");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.json"), r#"[{"companyName": "A"}]"#).unwrap();
        fs::write(dir.join("b.csv"), "companyName,city\nB,Blaine\n").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let pattern = dir.join("*.json").display().to_string();
        let csv_path = dir.join("b.csv").display().to_string();
        let loaded = load_prospects(&[pattern, csv_path]).unwrap();
        assert_eq!(loaded.prospects.len(), 2);

        assert!(load_file(&dir.join("notes.txt")).is_err());

        let missing = dir.join("*.ndjson").display().to_string();
        assert!(load_prospects(&[missing]).is_err());

        let _ = fs::remove_dir_all(&dir);
    }
}
