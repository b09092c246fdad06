use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use super::{get_config_path, validate_config, Config, DEFAULT_BATCH_SIZE};
use crate::pipeline::SortKey;
use crate::scoring::OpportunityTag;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Parse a comma-separated tag list ("none" or empty means no filter).
pub fn parse_tag_list(input: &str) -> Result<Option<Vec<String>>> {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let tags = input
        .split(',')
        .map(|t| t.parse::<OpportunityTag>().map(|tag| tag.to_string()))
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(tags))
}

/// Parse a limit ("none" or empty means unlimited).
pub fn parse_limit(input: &str) -> Result<Option<usize>, String> {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match input.parse::<usize>() {
        Ok(0) => Err("must be greater than zero".to_string()),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err("must be a positive number or 'none'".to_string()),
    }
}

/// Serialize and write a config file atomically, creating parent directories.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the suggested config file path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Lead Scout Configuration Wizard");
    println!("===============================");
    println!();

    // 1. Inputs
    println!("Where do your prospect exports live? Paths and glob patterns both work.");
    println!("Supported formats: .json, .jsonl/.ndjson, .csv");
    let mut inputs = Vec::new();
    loop {
        let pattern = prompt("Input path or pattern (empty to finish): ")?;
        if pattern.is_empty() {
            break;
        }
        match glob::Pattern::new(&pattern) {
            Ok(_) => inputs.push(pattern),
            Err(e) => println!("  Invalid pattern: {}. Try again.", e),
        }
    }

    // 2. Ranking
    println!();
    println!("Prospects are ranked by one score: high_ticket, opportunity, lead_gen or combined.");
    let sort_by = loop {
        let input = prompt_with_default("Sort by", SortKey::default().as_str())?;
        match input.parse::<SortKey>() {
            Ok(key) => break key,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    let limit = loop {
        let input = prompt_with_default("Maximum prospects to list", "none")?;
        match parse_limit(&input) {
            Ok(limit) => break limit,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    // 3. Tag filter
    println!();
    let vocabulary = OpportunityTag::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    println!("Available tags: {}", vocabulary);
    let tags = loop {
        let input = prompt_with_default("Only list prospects with these tags (comma-separated)", "none")?;
        match parse_tag_list(&input) {
            Ok(tags) => break tags,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    // 4. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        inputs,
        sort_by: Some(sort_by),
        limit,
        min_score: None,
        tags,
        batch_size: Some(DEFAULT_BATCH_SIZE),
    };

    if let Err(errors) = validate_config(&config) {
        anyhow::bail!("Generated config is invalid: {}", errors.join("; "));
    }

    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `lead-scout` to get started.");

    Ok(())
}
