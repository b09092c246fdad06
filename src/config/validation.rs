use super::schema::Config;
use crate::scoring::{OpportunityTag, MAX_SCORE};

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (i, pattern) in config.inputs.iter().enumerate() {
        if let Err(e) = glob::Pattern::new(pattern) {
            errors.push(format!("inputs[{}]: invalid pattern '{}' - {}", i, pattern, e));
        }
    }

    if config.limit == Some(0) {
        errors.push("limit: must be greater than zero".to_string());
    }

    if config.batch_size == Some(0) {
        errors.push("batch_size: must be greater than zero".to_string());
    }

    if let Some(min) = config.min_score {
        if !(0.0..=MAX_SCORE).contains(&min) {
            errors.push(format!("min_score: must be between 0 and {}", MAX_SCORE));
        }
    }

    if let Some(ref tags) = config.tags {
        for (i, tag) in tags.iter().enumerate() {
            if let Err(e) = tag.parse::<OpportunityTag>() {
                errors.push(format!("tags[{}]: {}", i, e));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_valid_config() {
        let config = Config {
            inputs: vec!["leads/*.json".to_string()],
            limit: Some(10),
            min_score: Some(100.0),
            tags: Some(vec!["quick_win".to_string()]),
            batch_size: Some(1),
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_pattern() {
        let config = Config {
            inputs: vec!["leads/[*.json".to_string()],
            ..Default::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("inputs[0]"));
    }

    #[test]
    fn test_zero_limit_and_batch_size() {
        let config = Config {
            limit: Some(0),
            batch_size: Some(0),
            ..Default::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("limit"));
        assert!(errors[1].contains("batch_size"));
    }

    #[test]
    fn test_min_score_out_of_range() {
        let config = Config {
            min_score: Some(120.0),
            ..Default::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("min_score"));
    }

    #[test]
    fn test_unknown_tag() {
        let config = Config {
            tags: Some(vec!["quick_win".to_string(), "gold".to_string()]),
            ..Default::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("tags[1]"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = Config {
            limit: Some(0),
            min_score: Some(-1.0),
            tags: Some(vec!["nope".to_string()]),
            ..Default::default()
        };
        assert_eq!(validate_config(&config).unwrap_err().len(), 3);
    }
}
