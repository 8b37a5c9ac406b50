//! Best-model registry.
//!
//! A models directory holds one subdirectory per ruleset plus an index,
//! `best_models.json`, naming the current model for each:
//!
//! ```json
//! { "Finkel": { "model_file": "model_0042.json", "date": "2025-01-10", "time": "12:30:00" } }
//! ```
//!
//! The model for ruleset `R` lives at `<models_dir>/R/<model_file>`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::Network;
use crate::error::ModelError;

pub const BEST_MODELS_FILE: &str = "best_models.json";

/// One ruleset's entry in the index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestModelEntry {
    pub model_file: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

/// The models directory and its index.
#[derive(Clone, Debug)]
pub struct ModelRegistry {
    root: PathBuf,
    entries: BTreeMap<String, BestModelEntry>,
}

impl ModelRegistry {
    /// Read `<root>/best_models.json`. A missing index is an empty registry.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ModelError> {
        let root = root.into();
        let index = root.join(BEST_MODELS_FILE);
        let entries = if index.exists() {
            serde_json::from_str(&std::fs::read_to_string(&index)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { root, entries })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rulesets with a registered model, sorted.
    pub fn rulesets(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entry for a ruleset, matched case-insensitively.
    #[must_use]
    pub fn entry(&self, ruleset: &str) -> Option<(&str, &BestModelEntry)> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(ruleset))
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Path of the best model for a ruleset.
    #[must_use]
    pub fn model_path(&self, ruleset: &str) -> Option<PathBuf> {
        self.entry(ruleset)
            .map(|(name, entry)| self.root.join(name).join(&entry.model_file))
    }

    /// Load the best model for a ruleset.
    pub fn load(&self, ruleset: &str) -> Result<Network, ModelError> {
        let path = self
            .model_path(ruleset)
            .ok_or_else(|| ModelError::Unavailable(format!("no model registered for {ruleset}")))?;
        debug!(ruleset, path = %path.display(), "loading model");
        Network::load(&path)
    }

    /// Record `model_file` as the best model for `ruleset`.
    pub fn set_best(&mut self, ruleset: &str, entry: BestModelEntry) {
        let key = self
            .entry(ruleset)
            .map_or_else(|| ruleset.to_string(), |(name, _)| name.to_string());
        self.entries.insert(key, entry);
    }

    /// Write the index back, replacing it atomically.
    pub fn save(&self) -> Result<(), ModelError> {
        std::fs::create_dir_all(&self.root)?;
        let index = self.root.join(BEST_MODELS_FILE);
        let tmp = index.with_extension("json.tmp");
        let mut text = serde_json::to_string_pretty(&self.entries)?;
        text.push('\n');
        std::fs::write(&tmp, text)?;
        std::fs::rename(&tmp, &index)?;
        Ok(())
    }
}
