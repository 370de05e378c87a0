use crate::scrapers::navigation::UrlPattern;
use crate::scrapers::{RetryPolicy, SiteProfile};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub headless: bool,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub debug_dir: Option<PathBuf>,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub site: SiteProfile,
}

fn default_base_url() -> String {
    "https://www.metrocuadrado.com/".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

fn default_tracing_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cities: Vec::new(),
            headless: false,
            output_dir: default_output_dir(),
            debug_dir: None,
            tracing_level: default_tracing_level(),
            retry: RetryPolicy::default(),
            site: SiteProfile::default(),
        }
    }
}

impl Config {
    /// Read the YAML file if it exists, then apply environment overrides.
    /// Validation happens separately, after CLI flags are applied.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = match fs::read_to_string(path) {
            Ok(contents) => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            Err(_) => Config::default(),
        };
        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(base_url) = var("M2_BASE_URL") {
            self.base_url = base_url;
        }

        if let Some(cities) = var("M2_CITIES") {
            self.cities = split_cities(&cities);
        }

        if let Some(headless) = var("M2_HEADLESS") {
            self.headless = headless
                .parse()
                .context("Failed to parse M2_HEADLESS environment variable")?;
        }

        if let Some(output_dir) = var("M2_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(output_dir);
        }

        if let Some(level) = var("TRACING_LEVEL") {
            self.tracing_level = level;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.cities.is_empty() {
            anyhow::bail!("At least one city is required (set via config.yaml, M2_CITIES or --city)");
        }
        if self.retry.max_attempts == 0 {
            anyhow::bail!("retry.max_attempts must be at least 1");
        }
        UrlPattern::glob(&self.site.selectors.results_url)?;
        Ok(())
    }

    pub fn create_default(path: &Path) -> Result<()> {
        let config = Config {
            cities: ["Bogotá", "Medellín", "Cali", "Barranquilla"]
                .into_iter()
                .map(String::from)
                .collect(),
            ..Config::default()
        };
        let yaml = serde_yaml::to_string(&config)?;
        fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

fn split_cities(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("cities: [Cali]").unwrap();
        assert_eq!(config.cities, vec!["Cali"]);
        assert_eq!(config.base_url, "https://www.metrocuadrado.com/");
        assert_eq!(config.output_dir, PathBuf::from("./output"));
        assert!(!config.headless);
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.site, SiteProfile::default());
        config.validate().unwrap();
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("M2_CITIES", " Bogotá, ,Cali "),
            ("M2_HEADLESS", "true"),
            ("M2_OUTPUT_DIR", "/tmp/m2"),
            ("TRACING_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.cities, vec!["Bogotá", "Cali"]);
        assert!(config.headless);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/m2"));
        assert_eq!(config.tracing_level, "debug");
    }

    #[test]
    fn test_bad_headless_flag() {
        let mut config = Config::default();
        let err = config
            .apply_env(|key| (key == "M2_HEADLESS").then(|| "sometimes".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("M2_HEADLESS"));
    }

    #[test]
    fn test_validate_requires_cities() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.to_string().contains("At least one city"));
    }

    #[test]
    fn test_default_file_round_trips() {
        let path = env::temp_dir().join(format!("m2-scout-config-{}.yaml", std::process::id()));
        Config::create_default(&path).unwrap();

        let loaded: Config = serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.cities.len(), 4);
        assert_eq!(loaded.site, SiteProfile::default());
        loaded.validate().unwrap();
    }
}
