//! Configuration types for fixture generation and seeding.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::placeholder::ImageSize;

/// Product and store categories used by the storefront filters.
pub const CATEGORIES: &[&str] = &[
    "Pets",
    "Cars",
    "Books",
    "Electronics",
    "Garden",
    "Toys",
    "Clothing",
    "Groceries",
];

/// Image sizes used for item covers, covering wide, tall and square layouts.
pub const COVER_SIZES: &[ImageSize] = &[
    ImageSize::new(512, 480),
    ImageSize::new(1024, 480),
    ImageSize::new(512, 2048),
    ImageSize::new(1080, 480),
    ImageSize::new(100, 100),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Which scenario the seed binary builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    /// The hand-written rows of the first seeding script.
    #[default]
    Legacy,
    /// A larger randomly generated storefront.
    Demo,
}

impl FromStr for ScenarioKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "demo" => Ok(Self::Demo),
            _ => Err(()),
        }
    }
}

/// Configuration for seeding operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// SQLite connection string.
    pub database_url: String,

    /// Scenario to build.
    pub scenario: ScenarioKind,

    /// Seed for the random number generator.
    pub rng_seed: u64,

    /// Whether to delete existing rows before inserting.
    pub reset: bool,

    /// Size of store and gallery placeholders.
    pub image_size: ImageSize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://marketplace.db".to_string(),
            scenario: ScenarioKind::default(),
            rng_seed: 42,
            reset: true,
            image_size: ImageSize::default(),
        }
    }
}

impl SeedConfig {
    /// Builds the configuration from environment variables, loading `.env` first.
    ///
    /// Recognised variables: `DATABASE_URL`, `SEED_SCENARIO`, `SEED_RNG_SEED`,
    /// `SEED_RESET`, `SEED_IMAGE_WIDTH`, `SEED_IMAGE_HEIGHT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            scenario: parse_var(&lookup, "SEED_SCENARIO")?.unwrap_or(defaults.scenario),
            rng_seed: parse_var(&lookup, "SEED_RNG_SEED")?.unwrap_or(defaults.rng_seed),
            reset: parse_bool(&lookup, "SEED_RESET")?.unwrap_or(defaults.reset),
            image_size: ImageSize::new(
                parse_var(&lookup, "SEED_IMAGE_WIDTH")?.unwrap_or(defaults.image_size.width),
                parse_var(&lookup, "SEED_IMAGE_HEIGHT")?.unwrap_or(defaults.image_size.height),
            ),
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(None),
    }
}

fn parse_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<bool>, ConfigError> {
    match lookup(name) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue { name, value }),
        },
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = SeedConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.database_url, "sqlite://marketplace.db");
        assert_eq!(config.scenario, ScenarioKind::Legacy);
        assert_eq!(config.rng_seed, 42);
        assert!(config.reset);
        assert_eq!(config.image_size, ImageSize::new(100, 100));
    }

    #[test]
    fn test_overrides() {
        let config = SeedConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SEED_SCENARIO", "Demo"),
            ("SEED_RNG_SEED", "7"),
            ("SEED_RESET", "no"),
            ("SEED_IMAGE_WIDTH", "64"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.scenario, ScenarioKind::Demo);
        assert_eq!(config.rng_seed, 7);
        assert!(!config.reset);
        assert_eq!(config.image_size, ImageSize::new(64, 100));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SeedConfig::from_lookup(lookup_from(&[("SEED_RNG_SEED", "abc")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "SEED_RNG_SEED",
                ..
            }
        ));

        assert!(SeedConfig::from_lookup(lookup_from(&[("SEED_SCENARIO", "huge")])).is_err());
        assert!(SeedConfig::from_lookup(lookup_from(&[("SEED_RESET", "maybe")])).is_err());
    }
}
