//! Layered settings: defaults, then TOML file, then environment, then flags.

use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "inventory.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub low_stock_threshold: i32,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".into(),
            low_stock_threshold: inventory_core::DEFAULT_LOW_STOCK_THRESHOLD,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_url: Option<String>,
    low_stock_threshold: Option<i32>,
    log_filter: Option<String>,
}

/// Load settings from `path`, or from `inventory.toml` when present.
///
/// An explicitly named file must exist; the default one is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let raw = match path {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?,
        ),
        None => fs::read_to_string(DEFAULT_CONFIG_FILE).ok(),
    };
    if let Some(raw) = raw {
        apply_file(&mut settings, &raw)?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file: FileSettings = toml::from_str(raw).context("parsing config file")?;
    if let Some(v) = file.api_url {
        settings.api_url = v;
    }
    if let Some(v) = file.low_stock_threshold {
        settings.low_stock_threshold = v;
    }
    if let Some(v) = file.log_filter {
        settings.log_filter = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("INVENTORY_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = var("INVENTORY_LOW_STOCK_THRESHOLD") {
        if let Ok(parsed) = v.parse::<i32>() {
            settings.low_stock_threshold = parsed;
        }
    }
    if let Some(v) = var("RUST_LOG") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api_url, "http://localhost:8080");
        assert_eq!(settings.low_stock_threshold, 10);
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn file_overrides_only_present_keys() {
        let mut settings = Settings::default();
        apply_file(&mut settings, "api_url = \"http://inventory.lan/api\"\n").unwrap();
        assert_eq!(settings.api_url, "http://inventory.lan/api");
        assert_eq!(settings.low_stock_threshold, 10);
    }

    #[test]
    fn unknown_file_key_is_an_error() {
        let mut settings = Settings::default();
        assert!(apply_file(&mut settings, "base = \"x\"\n").is_err());
    }

    #[test]
    fn env_beats_file_and_ignores_bad_numbers() {
        let mut settings = Settings::default();
        apply_file(&mut settings, "low_stock_threshold = 4\nlog_filter = \"warn\"\n").unwrap();

        let env: HashMap<&str, &str> = [
            ("INVENTORY_API_URL", "http://env.test"),
            ("INVENTORY_LOW_STOCK_THRESHOLD", "lots"),
            ("RUST_LOG", "debug"),
        ]
        .into_iter()
        .collect();
        apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.api_url, "http://env.test");
        assert_eq!(settings.low_stock_threshold, 4);
        assert_eq!(settings.log_filter, "debug");
    }

    #[test]
    fn missing_explicit_file_fails() {
        let err = load_settings(Some(Path::new("/nonexistent/inventory.toml"))).unwrap_err();
        assert!(err.to_string().contains("reading config file"));
    }
}
