//! Session configuration.
//!
//! A session file names the variant, says who controls each color, and
//! carries the search parameters:
//!
//! ```json
//! {
//!   "variant": "Masters",
//!   "white": { "type": "local", "strategy": { "kind": "expectimax" } },
//!   "black": { "type": "external" },
//!   "search": { "depth": 4 },
//!   "seed": 7,
//!   "move_time_limit_ms": 2000
//! }
//! ```
//!
//! Every field has a default, so `{}` is a valid file: Finkel rules, a
//! heuristic white seat against an external black seat.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::PathCatalog;
use crate::error::ConfigurationError;
use crate::rules::{RuleVariant, VariantRegistry};
use crate::search::{SearchConfig, StrategyKind};

/// Session file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Who controls a color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeatConfig {
    Local { strategy: StrategyKind },
    External,
}

impl SeatConfig {
    #[must_use]
    pub fn local(strategy: StrategyKind) -> Self {
        SeatConfig::Local { strategy }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Variant name, matched case-insensitively.
    pub variant: String,
    pub white: SeatConfig,
    pub black: SeatConfig,
    pub search: SearchConfig,
    /// Seed for dice and search randomness.
    pub seed: u64,
    /// Cut local searches off after this long. Unlimited when absent.
    pub move_time_limit_ms: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            variant: "Finkel".to_string(),
            white: SeatConfig::local(StrategyKind::Heuristic),
            black: SeatConfig::External,
            search: SearchConfig::default(),
            seed: 42,
            move_time_limit_ms: None,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn with_variant(mut self, name: impl Into<String>) -> Self {
        self.variant = name.into();
        self
    }

    #[must_use]
    pub fn with_seats(mut self, white: SeatConfig, black: SeatConfig) -> Self {
        self.white = white;
        self.black = black;
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_move_time_limit(mut self, limit: Duration) -> Self {
        self.move_time_limit_ms = Some(limit.as_millis() as u64);
        self
    }

    #[must_use]
    pub fn move_time_limit(&self) -> Option<Duration> {
        self.move_time_limit_ms.map(Duration::from_millis)
    }

    /// Look the variant up among the built-in ones.
    pub fn resolve_variant(&self, catalog: &PathCatalog) -> Result<RuleVariant, ConfigError> {
        let registry = VariantRegistry::standard(catalog)?;
        Ok(registry.by_name(&self.variant)?.clone())
    }
}
