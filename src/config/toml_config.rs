use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::catalog::InMemoryCatalog;
use crate::adapters::random::{LocalRandom, RandomOrgRandom, RANDOM_ORG_ENDPOINT};
use crate::adapters::roster::InMemoryRoster;
use crate::core::cache::DEFAULT_TTL_SECONDS;
use crate::core::{ConfigProvider, RandomSource};
use crate::utils::error::{BoxshelfError, Result};
use crate::utils::validation::{self, Validate};

/// Environment variable consulted when `[cache] ttl_seconds` is not set.
pub const TTL_ENV_VAR: &str = "TTL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub random: RandomConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub books: Vec<BookSeed>,
    #[serde(default)]
    pub boxers: Vec<BoxerSeed>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    pub ttl_seconds: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomSourceKind {
    #[default]
    Local,
    RandomOrg,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RandomConfig {
    #[serde(default)]
    pub source: RandomSourceKind,
    pub seed: Option<u64>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSeed {
    pub author: String,
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub length: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxerSeed {
    pub name: String,
    pub weight: f64,
    pub height: f64,
    pub reach: f64,
    pub age: u32,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BoxshelfError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: TomlConfig =
            toml::from_str(&processed_content).map_err(|e| BoxshelfError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;

        if config.cache.ttl_seconds.is_none() {
            config.cache.ttl_seconds = Self::ttl_from_env()?;
        }
        Ok(config)
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BoxshelfError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn ttl_from_env() -> Result<Option<u64>> {
        match std::env::var(TTL_ENV_VAR) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| BoxshelfError::ConfigError {
                    message: format!("{} must be a non-negative integer, got {:?}", TTL_ENV_VAR, raw),
                }),
            Err(_) => Ok(None),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(endpoint) = &self.random.endpoint {
            validation::validate_url("random.endpoint", endpoint)?;
        }

        if let Some(timeout) = self.random.timeout_seconds {
            validation::validate_positive_number("random.timeout_seconds", timeout, 1)?;
        }

        if self.random.source == RandomSourceKind::RandomOrg && self.random.seed.is_some() {
            return Err(BoxshelfError::validation(
                "random.seed",
                self.random.seed.unwrap_or_default(),
                "A seed only applies to the local random source",
            ));
        }

        for (i, book) in self.books.iter().enumerate() {
            validation::validate_non_empty_string(&format!("books[{}].title", i), &book.title)?;
        }
        for (i, boxer) in self.boxers.iter().enumerate() {
            validation::validate_non_empty_string(&format!("boxers[{}].name", i), &boxer.name)?;
            for (field, value) in [("weight", boxer.weight), ("height", boxer.height), ("reach", boxer.reach)] {
                validation::validate_finite(&format!("boxers[{}].{}", i, field), value)?;
            }
        }

        Ok(())
    }

    pub fn random_endpoint(&self) -> &str {
        self.random.endpoint.as_deref().unwrap_or(RANDOM_ORG_ENDPOINT)
    }

    pub fn random_timeout(&self) -> Duration {
        Duration::from_secs(self.random.timeout_seconds.unwrap_or(5))
    }

    pub fn build_random_source(&self) -> Result<Arc<dyn RandomSource>> {
        let random: Arc<dyn RandomSource> = match self.random.source {
            RandomSourceKind::Local => {
                tracing::debug!("Using local random source (seeded: {})", self.random.seed.is_some());
                match self.random.seed {
                    Some(seed) => Arc::new(LocalRandom::seeded(seed)),
                    None => Arc::new(LocalRandom::from_entropy()),
                }
            }
            RandomSourceKind::RandomOrg => {
                tracing::debug!("Using random.org at {}", self.random_endpoint());
                Arc::new(RandomOrgRandom::new(
                    self.random_endpoint(),
                    self.random_timeout(),
                )?)
            }
        };
        Ok(random)
    }

    pub fn seed_catalog(&self, catalog: &InMemoryCatalog) -> Result<()> {
        for book in &self.books {
            catalog.create_book(&book.author, &book.title, book.year, &book.genre, book.length)?;
        }
        tracing::info!("Seeded catalog with {} books", self.books.len());
        Ok(())
    }

    pub fn seed_roster(&self, roster: &InMemoryRoster) -> Result<()> {
        for boxer in &self.boxers {
            roster.create_boxer(&boxer.name, boxer.weight, boxer.height, boxer.reach, boxer.age)?;
        }
        tracing::info!("Seeded roster with {} boxers", self.boxers.len());
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn cache_ttl_seconds(&self) -> u64 {
        self.cache.ttl_seconds.unwrap_or(DEFAULT_TTL_SECONDS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[cache]
ttl_seconds = 120

[random]
source = "local"
seed = 7

[logging]
format = "json"

[[books]]
author = "George Orwell"
title = "1984"
year = 1949
genre = "Dystopian"
length = 328

[[boxers]]
name = "Alex"
weight = 160.0
height = 180.0
reach = 77.0
age = 23
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.cache_ttl_seconds(), 120);
        assert_eq!(config.random.seed, Some(7));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.books.len(), 1);
        assert_eq!(config.boxers[0].name, "Alex");
        assert!(config.validate().is_ok());

        let catalog = InMemoryCatalog::new();
        config.seed_catalog(&catalog).unwrap();
        assert_eq!(catalog.len(), 1);

        let roster = InMemoryRoster::new();
        config.seed_roster(&roster).unwrap();
        assert_eq!(roster.get_by_name("Alex").unwrap().age, 23);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BOXSHELF_TEST_RANDOM_ENDPOINT", "https://random.example.com");

        let toml_content = r#"
[random]
source = "random_org"
endpoint = "${BOXSHELF_TEST_RANDOM_ENDPOINT}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.random_endpoint(), "https://random.example.com");
        assert_eq!(config.random.source, RandomSourceKind::RandomOrg);

        std::env::remove_var("BOXSHELF_TEST_RANDOM_ENDPOINT");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[random]
endpoint = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[random]
source = "random_org"
seed = 3
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[random]
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seed_roster_rejects_non_finite_values() {
        let config = TomlConfig::from_toml_str(
            r#"
[[boxers]]
name = "Ghost"
weight = inf
height = nan
reach = 70.0
age = 25
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let roster = InMemoryRoster::new();
        let err = config.seed_roster(&roster).unwrap_err();
        assert!(matches!(err, BoxshelfError::ValidationError { .. }));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_malformed_toml() {
        let err = TomlConfig::from_toml_str("[cache\nttl_seconds = 1").unwrap_err();
        assert!(matches!(err, BoxshelfError::ConfigError { .. }));
    }

    #[test]
    fn test_defaults() {
        let config = TomlConfig::from_toml_str("[cache]\nttl_seconds = 60\n").unwrap();
        assert_eq!(config.random.source, RandomSourceKind::Local);
        assert_eq!(config.random_endpoint(), RANDOM_ORG_ENDPOINT);
        assert_eq!(config.random_timeout(), Duration::from_secs(5));
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.books.is_empty());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[cache]
ttl_seconds = 5

[[books]]
author = "Aldous Huxley"
title = "Brave New World"
year = 1932
genre = "Science Fiction"
length = 311
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.cache_ttl_seconds(), 5);
        assert_eq!(config.books[0].length, 311);
    }
}
