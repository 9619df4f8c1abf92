//! Content Rule Engine
//!
//! Decides which administrator-defined content rules apply to a catalog
//! item, and folds the matching rules' actions into an item view.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     rule_matches(item, rule)                  │
//! │                                                               │
//! │  ┌──────────┐  each dim  ┌─────────────┐  miss  ┌──────────┐ │
//! │  │ Registry │──────────►│ ConfigCache │──────►│  Config  │ │
//! │  │ (dims)   │           │ (dim, rule) │       │  Reader  │ │
//! │  └──────────┘           └──────┬──────┘       └──────────┘ │
//! │                                │ ScopeConfig                 │
//! │                                ▼                             │
//! │                     ScopeConfig::matches(item)               │
//! │                     AND, short-circuit on false              │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod actions;
pub mod cache;
pub mod config;
pub mod engine;
pub mod scope;
pub mod store;

pub use actions::{ItemView, PriceAdjustment, RuleAction};
pub use cache::ConfigCache;
pub use config::{ConfigReader, ConfigStore, InMemoryConfigStore};
pub use engine::{EngineSettings, EngineStats, RuleEngine};
pub use scope::{Dimension, MatchContext, ScopeConfig, ScopeRegistry};
pub use store::RuleBook;

use chrono::{DateTime, Utc};
use rules_common::{RuleId, RulesError, RulesResult};
use serde::{Deserialize, Serialize};

/// Publication status of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    /// Live
    Published,
    /// Saved but not live
    Draft,
    /// Soft-deleted
    Trashed,
}

impl Default for RuleStatus {
    fn default() -> Self {
        Self::Published
    }
}

/// Content rule definition
///
/// Scope filters live in the config store under the rule's id; the rule
/// itself carries ordering, activation and actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule ID
    pub id: RuleId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Priority (lower sorts first)
    #[serde(default)]
    pub priority: i32,
    /// Publication status
    #[serde(default)]
    pub status: RuleStatus,
    /// Enablement switch
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    /// Activation start (inclusive)
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    /// Activation end (exclusive)
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    /// Actions applied when the rule matches
    #[serde(default)]
    pub actions: Vec<RuleAction>,
}

fn enabled_default() -> bool {
    true
}

impl Rule {
    /// Create published, enabled rule with priority 0 and no actions
    pub fn new(id: impl Into<RuleId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            priority: 0,
            status: RuleStatus::Published,
            enabled: true,
            starts_at: None,
            ends_at: None,
            actions: Vec::new(),
        }
    }

    /// Set priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set activation window
    pub fn active_between(
        mut self,
        starts_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        self
    }

    /// Add action
    pub fn with_action(mut self, action: RuleAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Disable rule
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether the rule is live at `now`
    #[inline]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if self.status != RuleStatus::Published || !self.enabled {
            return false;
        }
        if self.starts_at.is_some_and(|start| now < start) {
            return false;
        }
        if self.ends_at.is_some_and(|end| now >= end) {
            return false;
        }
        true
    }

    /// Check the rule can be stored
    ///
    /// A rule needs at least one action, and a bounded window must end
    /// after it starts.
    pub fn validate(&self) -> RulesResult<()> {
        if self.actions.is_empty() {
            return Err(RulesError::InvalidConfig(format!(
                "rule {} has no actions",
                self.id
            )));
        }
        if let (Some(start), Some(end)) = (self.starts_at, self.ends_at) {
            if start >= end {
                return Err(RulesError::InvalidConfig(format!(
                    "rule {} ends at {} before it starts at {}",
                    self.id, end, start
                )));
            }
        }
        Ok(())
    }

    /// Ordering key: priority, then id
    #[inline]
    pub fn sort_key(&self) -> (i32, RuleId) {
        (self.priority, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_rule_activation_window() {
        let rule = Rule::new(1, "Spring sale").active_between(Some(at(10)), Some(at(20)));

        assert!(!rule.is_active_at(at(9)));
        assert!(rule.is_active_at(at(10)));
        assert!(rule.is_active_at(at(19)));
        assert!(!rule.is_active_at(at(20)));
    }

    #[test]
    fn test_rule_status_and_enablement() {
        assert!(Rule::new(1, "Open").is_active_at(at(1)));
        assert!(!Rule::new(2, "Off").disabled().is_active_at(at(1)));

        let mut draft = Rule::new(3, "Draft");
        draft.status = RuleStatus::Draft;
        assert!(!draft.is_active_at(at(1)));
    }

    #[test]
    fn test_rule_deserializes_with_defaults() {
        let rule: Rule = serde_json::from_str(r#"{"id": 5, "name": "Global"}"#).unwrap();
        assert!(rule.enabled);
        assert_eq!(rule.status, RuleStatus::Published);
        assert_eq!(rule.priority, 0);
        assert!(rule.actions.is_empty());
    }

    #[test]
    fn test_rule_validation() {
        let featured = RuleAction::Featured { featured: true };

        let err = Rule::new(1, "Empty").validate().unwrap_err();
        assert!(matches!(err, RulesError::InvalidConfig(_)));
        assert!(err.to_string().contains("no actions"));

        let inverted = Rule::new(2, "Inverted")
            .with_action(featured.clone())
            .active_between(Some(at(20)), Some(at(10)));
        assert!(matches!(inverted.validate(), Err(RulesError::InvalidConfig(_))));

        let instant = Rule::new(3, "Instant")
            .with_action(featured.clone())
            .active_between(Some(at(10)), Some(at(10)));
        assert!(instant.validate().is_err());

        let open_ended = Rule::new(4, "Open").with_action(featured).active_between(Some(at(10)), None);
        assert!(open_ended.validate().is_ok());
    }
}
