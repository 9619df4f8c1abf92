//! Rule book commands

use crate::fixture::Fixture;
use crate::output::OutputFormat;
use chrono::{DateTime, Utc};
use rules_common::RuleId;
use rules_engine::{EngineSettings, RuleEngine, RuleStatus};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RuleSummary {
    pub id: RuleId,
    pub name: String,
    pub priority: i32,
    pub status: RuleStatus,
    pub active: bool,
    pub actions: usize,
}

pub fn list(fixture: &str, now: DateTime<Utc>, format: OutputFormat) -> Result<(), String> {
    let engine = Fixture::load(fixture)?.into_engine(EngineSettings::default())?;
    format.print(&summaries(&engine, now));
    Ok(())
}

/// Every rule in book order, with whether it is live at `now`
pub fn summaries(engine: &RuleEngine, now: DateTime<Utc>) -> Vec<RuleSummary> {
    engine
        .rules()
        .get_rules()
        .iter()
        .map(|rule| RuleSummary {
            id: rule.id,
            name: rule.name.clone(),
            priority: rule.priority,
            status: rule.status,
            active: rule.is_active_at(now),
            actions: rule.actions.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const STORE: &str = r#"{
        "rules": [
            {"id": 2, "name": "Later", "priority": 9,
             "actions": [{"type": "featured", "featured": true}]},
            {"id": 1, "name": "Draft", "priority": 9, "status": "draft",
             "actions": [{"type": "title", "prefix": "New "}, {"type": "featured", "featured": false}]},
            {"id": 3, "name": "First", "priority": -1, "starts_at": "2030-01-01T00:00:00Z",
             "actions": [{"type": "featured", "featured": true}]}
        ]
    }"#;

    #[test]
    fn test_summaries_follow_book_order() {
        let engine = Fixture::parse(STORE, false)
            .unwrap()
            .into_engine(EngineSettings::default())
            .unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();

        let rules = summaries(&engine, now);
        let ids: Vec<u64> = rules.iter().map(|r| r.id.as_u64()).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        let active: Vec<bool> = rules.iter().map(|r| r.active).collect();
        assert_eq!(active, vec![false, false, true]);
        assert_eq!(rules[1].status, RuleStatus::Draft);
        assert_eq!(rules[1].actions, 2);
    }
}
