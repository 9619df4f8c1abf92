//! Fixture loading
//!
//! A fixture bundles a catalog, a rule book and stored scope fields so
//! rules can be evaluated without a host store.

use rules_common::{CatalogItem, InMemoryCatalog, RuleId};
use rules_engine::{
    ConfigStore, Dimension, EngineSettings, InMemoryConfigStore, Rule, RuleEngine,
};
use serde::Deserialize;
use std::fs;
use std::sync::Arc;

/// One stored scope field
#[derive(Debug, Deserialize)]
pub struct ScopeField {
    pub rule: RuleId,
    pub dimension: Dimension,
    pub field: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub scopes: Vec<ScopeField>,
}

impl Fixture {
    /// Load a JSON fixture, or YAML when the extension says so
    pub fn load(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
        Self::parse(&content, path.ends_with(".yaml") || path.ends_with(".yml"))
    }

    pub fn parse(content: &str, yaml: bool) -> Result<Self, String> {
        if yaml {
            serde_yaml::from_str(content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(content).map_err(|e| e.to_string())
        }
    }

    /// Build an engine over the fixture's catalog, rules and scope fields
    pub fn into_engine(self, settings: EngineSettings) -> Result<RuleEngine, String> {
        let config = Arc::new(InMemoryConfigStore::new());
        for scope in self.scopes {
            config
                .write(scope.dimension, scope.rule, &scope.field, scope.value)
                .map_err(|e| format!("rule {}: {}", scope.rule, e))?;
        }

        tracing::debug!(items = self.items.len(), fields = config.len(), "Fixture loaded");
        let catalog = Arc::new(InMemoryCatalog::with_items(self.items));
        let engine = RuleEngine::with_settings(catalog, config, settings);
        engine.load_rules(self.rules).map_err(|e| e.to_string())?;
        Ok(engine)
    }
}
