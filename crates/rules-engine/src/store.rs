//! Versioned rule book with hot-swapping

use crate::{Rule, RuleStatus};
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use rules_common::{RuleId, RulesError, RulesResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Ordered rule set with atomic updates
///
/// Rules are kept sorted by priority, then id. Readers get a consistent
/// snapshot. Mutations go through read-copy-update, so concurrent writers
/// never drop each other's changes, and each one bumps the version once.
pub struct RuleBook {
    /// Current rule set (atomically swappable)
    rules: ArcSwap<Vec<Rule>>,
    /// Version, bumped on every mutation
    version: AtomicU64,
}

impl RuleBook {
    /// Create empty rule book
    pub fn new() -> Self {
        Self {
            rules: ArcSwap::from_pointee(Vec::new()),
            version: AtomicU64::new(0),
        }
    }

    /// Get current version
    #[inline(always)]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Get number of rules
    pub fn len(&self) -> usize {
        self.rules.load().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.rules.load().is_empty()
    }

    /// Replace every rule
    ///
    /// Nothing is stored unless every rule validates.
    pub fn load(&self, rules: Vec<Rule>) -> RulesResult<()> {
        rules.iter().try_for_each(Rule::validate)?;
        self.rules.store(Arc::new(sorted(rules)));
        self.bump();
        Ok(())
    }

    /// Insert or replace one rule
    pub fn upsert(&self, rule: Rule) -> RulesResult<()> {
        rule.validate()?;
        self.rules.rcu(|current| {
            let mut rules: Vec<Rule> = current.iter().filter(|r| r.id != rule.id).cloned().collect();
            rules.push(rule.clone());
            sorted(rules)
        });
        self.bump();
        Ok(())
    }

    /// Remove one rule
    pub fn remove(&self, id: RuleId) -> RulesResult<Rule> {
        let previous = self
            .rules
            .rcu(|current| current.iter().filter(|r| r.id != id).cloned().collect::<Vec<_>>());
        let removed = previous
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(RulesError::RuleNotFound(id))?;
        self.bump();
        Ok(removed)
    }

    /// Move a rule to the trash
    pub fn trash(&self, id: RuleId) -> RulesResult<()> {
        let previous = self.rules.rcu(|current| {
            current
                .iter()
                .cloned()
                .map(|mut r| {
                    if r.id == id {
                        r.status = RuleStatus::Trashed;
                    }
                    r
                })
                .collect::<Vec<_>>()
        });
        if !previous.iter().any(|r| r.id == id) {
            return Err(RulesError::RuleNotFound(id));
        }
        self.bump();
        Ok(())
    }

    /// Look up one rule
    pub fn get(&self, id: RuleId) -> Option<Rule> {
        self.rules.load().iter().find(|r| r.id == id).cloned()
    }

    /// Rules live at `now`, in priority order
    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<Rule> {
        self.rules
            .load()
            .iter()
            .filter(|r| r.is_active_at(now))
            .cloned()
            .collect()
    }

    /// Get current rules (for inspection)
    pub fn get_rules(&self) -> Arc<Vec<Rule>> {
        self.rules.load_full()
    }

    fn bump(&self) {
        self.version.fetch_add(1, Ordering::Release);
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted(mut rules: Vec<Rule>) -> Vec<Rule> {
    rules.sort_by_key(Rule::sort_key);
    rules
}
