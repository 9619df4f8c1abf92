//! Rule evaluator

use crate::actions::ItemView;
use crate::cache::ConfigCache;
use crate::config::ConfigStore;
use crate::scope::{Dimension, MatchContext, ScopeRegistry};
use crate::store::RuleBook;
use crate::Rule;
use chrono::{DateTime, Utc};
use rules_common::{AtomicCounter, Catalog, CatalogItem, ItemId, RuleId, RulesResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Currency decimal precision
    pub decimals: u32,
    /// Dimensions consulted by the evaluator, in order
    pub dimensions: ScopeRegistry,
    /// Maximum cached scope configurations
    pub cache_capacity: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            decimals: 2,
            dimensions: ScopeRegistry::standard(),
            cache_capacity: 65536,
        }
    }
}

/// Content rule engine
///
/// Owns the config cache; every configuration write must go through
/// [`RuleEngine::write_scope_field`] (or be followed by
/// [`RuleEngine::invalidate`]) so cached entries never go stale.
pub struct RuleEngine {
    catalog: Arc<dyn Catalog>,
    config: Arc<dyn ConfigStore>,
    cache: ConfigCache,
    rules: RuleBook,
    registry: ScopeRegistry,
    context: MatchContext,

    // Metrics
    evaluations: AtomicCounter,
    matches: AtomicCounter,
}

impl RuleEngine {
    /// Create engine with default settings
    pub fn new(catalog: Arc<dyn Catalog>, config: Arc<dyn ConfigStore>) -> Self {
        Self::with_settings(catalog, config, EngineSettings::default())
    }

    /// Create engine with custom settings
    pub fn with_settings(
        catalog: Arc<dyn Catalog>,
        config: Arc<dyn ConfigStore>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            catalog,
            config,
            cache: ConfigCache::new(settings.cache_capacity),
            rules: RuleBook::new(),
            registry: settings.dimensions,
            context: MatchContext::new(settings.decimals),
            evaluations: AtomicCounter::new(0),
            matches: AtomicCounter::new(0),
        }
    }

    /// Does `rule` apply to `item`?
    ///
    /// A vanished item matches nothing. A rule with no configured scope
    /// matches everything.
    pub fn rule_matches(&self, item: ItemId, rule: RuleId) -> bool {
        let Some(item) = self.lookup(item) else {
            return false;
        };
        self.item_matches(&item, rule)
    }

    /// Ids of rules live at `now` that apply to `item`, in priority order
    pub fn matching_rules(&self, item: ItemId, now: DateTime<Utc>) -> Vec<RuleId> {
        let Some(item) = self.lookup(item) else {
            return Vec::new();
        };
        self.matching(&item, now).map(|rule| rule.id).collect()
    }

    /// Item with the actions of every applicable rule folded in
    pub fn render(&self, item: ItemId, now: DateTime<Utc>) -> Option<ItemView> {
        let item = self.lookup(item)?;
        let mut view = ItemView::from_item(&item);
        for rule in self.matching(&item, now) {
            view.apply_rule(rule.id, &rule.actions, self.context.decimals);
        }
        Some(view)
    }

    /// Evaluate every registered dimension against an already loaded item
    #[inline]
    pub fn item_matches(&self, item: &CatalogItem, rule: RuleId) -> bool {
        self.evaluations.inc();
        let matched = self.registry.iter().all(|dimension| {
            self.cache
                .get(dimension, rule, &*self.config)
                .matches(item, &self.context)
        });
        if matched {
            self.matches.inc();
        }
        matched
    }

    fn matching<'a>(
        &'a self,
        item: &'a CatalogItem,
        now: DateTime<Utc>,
    ) -> impl Iterator<Item = Rule> + 'a {
        self.rules
            .active_at(now)
            .into_iter()
            .filter(move |rule| self.item_matches(item, rule.id))
    }

    fn lookup(&self, item: ItemId) -> Option<Arc<CatalogItem>> {
        let found = self.catalog.item(item);
        if found.is_none() {
            tracing::debug!(%item, "Item not found, no rule can match");
        }
        found
    }

    /// Store one scope field and drop the cached configuration
    pub fn write_scope_field(
        &self,
        dimension: Dimension,
        rule: RuleId,
        field: &str,
        value: Value,
    ) -> RulesResult<()> {
        self.config.write(dimension, rule, field, value)?;
        self.cache.invalidate(dimension, rule);
        Ok(())
    }

    /// Remove a rule's configuration for one dimension
    pub fn clear_scope(&self, dimension: Dimension, rule: RuleId) -> RulesResult<()> {
        self.config.delete_scope(dimension, rule)?;
        self.cache.invalidate(dimension, rule);
        Ok(())
    }

    /// Drop the cached configuration after an out-of-band write
    pub fn invalidate(&self, dimension: Dimension, rule: RuleId) {
        self.cache.invalidate(dimension, rule);
    }

    /// Start a fresh evaluation pass with an empty cache
    pub fn reset_cache(&self) {
        self.cache.clear();
    }

    /// Replace the rule book contents
    pub fn load_rules(&self, rules: Vec<Rule>) -> RulesResult<()> {
        tracing::info!(count = rules.len(), "Loading content rules");
        if let Err(e) = self.rules.load(rules) {
            tracing::warn!(error = %e, "Rejected content rules");
            return Err(e);
        }
        Ok(())
    }

    /// Insert or replace one rule
    pub fn upsert_rule(&self, rule: Rule) -> RulesResult<()> {
        self.rules.upsert(rule)
    }

    /// Move a rule to the trash
    pub fn trash_rule(&self, rule: RuleId) -> RulesResult<()> {
        self.rules.trash(rule)
    }

    /// Delete a rule and all of its stored scope configuration
    pub fn remove_rule(&self, rule: RuleId) -> RulesResult<Rule> {
        let removed = self.rules.remove(rule)?;
        self.config.delete_rule(rule)?;
        self.cache.invalidate_rule(rule);
        Ok(removed)
    }

    /// Get engine statistics
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            evaluations: self.evaluations.get(),
            matches: self.matches.get(),
            cache_hits: self.cache.hits(),
            cache_misses: self.cache.misses(),
            rules_loaded: self.rules.len(),
            version: self.rules.version(),
        }
    }

    /// Get rule book reference
    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Match context in use
    pub fn context(&self) -> &MatchContext {
        &self.context
    }
}

/// Engine statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct EngineStats {
    /// Rule-against-item evaluations
    pub evaluations: u64,
    /// Evaluations where every dimension matched
    pub matches: u64,
    /// Config cache hits
    pub cache_hits: u64,
    /// Config cache misses (storage reads)
    pub cache_misses: u64,
    /// Rules in the rule book
    pub rules_loaded: usize,
    /// Rule book version
    pub version: u64,
}
