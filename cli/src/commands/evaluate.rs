//! Match and render commands

use crate::fixture::Fixture;
use crate::output::OutputFormat;
use chrono::{DateTime, Utc};
use rules_common::{ItemId, RuleId, RulesError};
use rules_engine::{EngineSettings, ItemView, RuleEngine};
use serde::Serialize;

#[derive(Debug, PartialEq, Serialize)]
pub struct RuleMatch {
    pub item: ItemId,
    pub rule: RuleId,
    pub matches: bool,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct MatchingRules {
    pub item: ItemId,
    pub at: DateTime<Utc>,
    pub rules: Vec<RuleId>,
}

/// Output of `match`: one rule when `--rule` is given, else every live rule
#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MatchReport {
    Rule(RuleMatch),
    Listing(MatchingRules),
}

pub fn matching(
    fixture: &str,
    settings: EngineSettings,
    item: u64,
    rule: Option<u64>,
    now: DateTime<Utc>,
    format: OutputFormat,
) -> Result<(), String> {
    let engine = Fixture::load(fixture)?.into_engine(settings)?;
    format.print(&match_report(&engine, item, rule, now));
    Ok(())
}

pub fn match_report(
    engine: &RuleEngine,
    item: u64,
    rule: Option<u64>,
    now: DateTime<Utc>,
) -> MatchReport {
    let item = ItemId::new(item);
    match rule {
        Some(rule) => {
            let rule = RuleId::new(rule);
            MatchReport::Rule(RuleMatch {
                item,
                rule,
                matches: engine.rule_matches(item, rule),
            })
        }
        None => MatchReport::Listing(MatchingRules {
            item,
            at: now,
            rules: engine.matching_rules(item, now),
        }),
    }
}

pub fn render(
    fixture: &str,
    settings: EngineSettings,
    item: u64,
    now: DateTime<Utc>,
    format: OutputFormat,
) -> Result<(), String> {
    let engine = Fixture::load(fixture)?.into_engine(settings)?;
    format.print(&render_view(&engine, item, now)?);
    Ok(())
}

pub fn render_view(engine: &RuleEngine, item: u64, now: DateTime<Utc>) -> Result<ItemView, String> {
    let item = ItemId::new(item);
    engine
        .render(item, now)
        .ok_or_else(|| RulesError::ItemNotFound(item).to_string())
}
