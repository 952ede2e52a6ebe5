use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::filter::DEFAULT_DEBOUNCE;

/// Where the dataset is loaded from. Exactly one must be configured.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetLocation {
    /// Base URL of the resume analysis service (`UPSTREAM_URL`).
    Upstream(String),
    /// JSON export on disk (`DATASET_PATH`).
    File(PathBuf),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub dataset: DatasetLocation,
    pub port: u16,
    pub rust_log: String,
    pub debounce: Duration,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let dataset = match (lookup("UPSTREAM_URL"), lookup("DATASET_PATH")) {
            (Some(url), None) => DatasetLocation::Upstream(url),
            (None, Some(path)) => DatasetLocation::File(PathBuf::from(path)),
            (Some(_), Some(_)) => bail!("Set only one of UPSTREAM_URL and DATASET_PATH"),
            (None, None) => bail!("One of UPSTREAM_URL or DATASET_PATH must be set"),
        };

        Ok(Config {
            dataset,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            debounce: Duration::from_millis(parse_or(
                &lookup,
                "FILTER_DEBOUNCE_MS",
                DEFAULT_DEBOUNCE.as_millis() as u64,
            )?),
            upstream_timeout: Duration::from_secs(parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", 10)?),
        })
    }
}

fn parse_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64> {
    match lookup(key) {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_upstream() {
        let config = load(&[("UPSTREAM_URL", "http://localhost:5000")]).unwrap();
        assert_eq!(
            config.dataset,
            DatasetLocation::Upstream("http://localhost:5000".to_string())
        );
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_file_dataset_and_overrides() {
        let config = load(&[
            ("DATASET_PATH", "/data/resumes.json"),
            ("PORT", "9000"),
            ("FILTER_DEBOUNCE_MS", "50"),
        ])
        .unwrap();
        assert_eq!(
            config.dataset,
            DatasetLocation::File(PathBuf::from("/data/resumes.json"))
        );
        assert_eq!(config.port, 9000);
        assert_eq!(config.debounce, Duration::from_millis(50));
    }

    #[test]
    fn test_dataset_location_is_required_and_exclusive() {
        assert!(load(&[]).is_err());
        assert!(load(&[("UPSTREAM_URL", "http://a"), ("DATASET_PATH", "b.json")]).is_err());
    }

    #[test]
    fn test_bad_numbers_are_rejected() {
        assert!(load(&[("UPSTREAM_URL", "http://a"), ("PORT", "eighty")]).is_err());
        assert!(load(&[("UPSTREAM_URL", "http://a"), ("FILTER_DEBOUNCE_MS", "-5")]).is_err());
    }
}
