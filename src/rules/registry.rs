//! Variant registry.
//!
//! An explicit value built by the composition root. Every variant is
//! validated on insertion, so a registry only ever holds playable rules.

use rustc_hash::FxHashMap;

use super::variant::{RuleVariant, VariantId};
use crate::board::PathCatalog;
use crate::error::ConfigurationError;

/// Validated rule variants by id.
#[derive(Clone, Debug, Default)]
pub struct VariantRegistry {
    variants: FxHashMap<VariantId, RuleVariant>,
}

impl VariantRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in variant.
    pub fn standard(catalog: &PathCatalog) -> Result<Self, ConfigurationError> {
        let mut registry = Self::new();
        for id in VariantId::ALL {
            registry.register(RuleVariant::builtin(id), catalog)?;
        }
        Ok(registry)
    }

    /// Validate and insert a variant. Ids must be unique.
    pub fn register(
        &mut self,
        variant: RuleVariant,
        catalog: &PathCatalog,
    ) -> Result<(), ConfigurationError> {
        if self.variants.contains_key(&variant.id) {
            return Err(ConfigurationError::DuplicateVariant(variant.id));
        }
        variant.validate(catalog)?;
        self.variants.insert(variant.id, variant);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: VariantId) -> Option<&RuleVariant> {
        self.variants.get(&id)
    }

    /// Look up by display name, case-insensitively.
    pub fn by_name(&self, name: &str) -> Result<&RuleVariant, ConfigurationError> {
        VariantId::from_name(name)
            .and_then(|id| self.get(id))
            .ok_or_else(|| ConfigurationError::UnknownVariant(name.to_string()))
    }

    /// Registered ids in declaration order.
    #[must_use]
    pub fn ids(&self) -> Vec<VariantId> {
        VariantId::ALL
            .into_iter()
            .filter(|id| self.variants.contains_key(id))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}
