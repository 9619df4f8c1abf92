//! Scope configuration storage and resolution
//!
//! Configuration is persisted as loose key/value fields keyed by
//! `(dimension, rule, field)`. [`resolve`] turns those fields into a typed
//! [`ScopeConfig`], falling back to the dimension's defaults for anything
//! missing or malformed. Resolution never fails.

use crate::scope::{
    fields, Dimension, PriceOperator, PriceScope, ProductScope, ScopeConfig, StockScope,
    TermScope, TitleOperator, TitleScope,
};
use parking_lot::RwLock;
use rules_common::{ItemId, RuleId, RulesError, RulesResult, StockStatus, TermId};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

/// Read access to stored scope configuration
pub trait ConfigReader: Send + Sync {
    /// Read one stored field; `None` when absent
    fn read(&self, dimension: Dimension, rule: RuleId, field: &str) -> Option<Value>;
}

/// Read/write access to stored scope configuration
pub trait ConfigStore: ConfigReader {
    /// Store one field
    fn write(&self, dimension: Dimension, rule: RuleId, field: &str, value: Value)
        -> RulesResult<()>;

    /// Delete one field, returning whether it existed
    fn delete_field(&self, dimension: Dimension, rule: RuleId, field: &str) -> RulesResult<bool>;

    /// Delete every field of one dimension of a rule
    fn delete_scope(&self, dimension: Dimension, rule: RuleId) -> RulesResult<usize>;

    /// Delete every field of a rule
    fn delete_rule(&self, rule: RuleId) -> RulesResult<usize>;
}

type FieldKey = (Dimension, RuleId, String);

/// In-memory configuration store (for testing, fixtures and development)
pub struct InMemoryConfigStore {
    fields: RwLock<HashMap<FieldKey, Value>>,
}

impl InMemoryConfigStore {
    /// Create empty store
    pub fn new() -> Self {
        Self {
            fields: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored fields
    pub fn len(&self) -> usize {
        self.fields.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.fields.read().is_empty()
    }
}

impl Default for InMemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigReader for InMemoryConfigStore {
    fn read(&self, dimension: Dimension, rule: RuleId, field: &str) -> Option<Value> {
        self.fields
            .read()
            .get(&(dimension, rule, field.to_string()))
            .cloned()
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn write(
        &self,
        dimension: Dimension,
        rule: RuleId,
        field: &str,
        value: Value,
    ) -> RulesResult<()> {
        if !dimension.has_field(field) {
            return Err(RulesError::UnknownField {
                dimension: dimension.to_string(),
                field: field.to_string(),
            });
        }
        self.fields
            .write()
            .insert((dimension, rule, field.to_string()), value);
        Ok(())
    }

    fn delete_field(&self, dimension: Dimension, rule: RuleId, field: &str) -> RulesResult<bool> {
        Ok(self
            .fields
            .write()
            .remove(&(dimension, rule, field.to_string()))
            .is_some())
    }

    fn delete_scope(&self, dimension: Dimension, rule: RuleId) -> RulesResult<usize> {
        let mut fields = self.fields.write();
        let before = fields.len();
        fields.retain(|(d, r, _), _| !(*d == dimension && *r == rule));
        Ok(before - fields.len())
    }

    fn delete_rule(&self, rule: RuleId) -> RulesResult<usize> {
        let mut fields = self.fields.write();
        let before = fields.len();
        fields.retain(|(_, r, _), _| *r != rule);
        Ok(before - fields.len())
    }
}

/// Resolve the stored configuration of one dimension for one rule
///
/// Reads exactly the fields listed by [`Dimension::fields`]. Title regexes
/// are compiled here, so a cached configuration never compiles again.
pub fn resolve<R>(dimension: Dimension, rule: RuleId, reader: &R) -> ScopeConfig
where
    R: ConfigReader + ?Sized,
{
    let read = |field: &str| reader.read(dimension, rule, field);

    match dimension {
        Dimension::Category => ScopeConfig::Category(term_scope(read(fields::TERMS))),
        Dimension::Tag => ScopeConfig::Tag(term_scope(read(fields::TERMS))),
        Dimension::Attribute => ScopeConfig::Attribute(term_scope(read(fields::TERMS))),
        Dimension::Product => ScopeConfig::Product(ProductScope {
            items: id_list(read(fields::ITEMS)).map(ItemId::new).collect(),
        }),
        Dimension::Stock => ScopeConfig::Stock(StockScope {
            statuses: parsed_list::<StockStatus>(read(fields::STATUSES)),
        }),
        Dimension::Price => ScopeConfig::Price(PriceScope {
            operator: operator_or_default::<PriceOperator>(dimension, rule, read(fields::OPERATOR)),
            min: number(read(fields::MIN)),
            max: number(read(fields::MAX)),
        }),
        Dimension::Title => ScopeConfig::Title(TitleScope::with_options(
            operator_or_default::<TitleOperator>(dimension, rule, read(fields::OPERATOR)),
            text(read(fields::PATTERN)),
            flag(read(fields::CASE_SENSITIVE)),
        )),
    }
}

fn term_scope(value: Option<Value>) -> TermScope {
    TermScope {
        terms: id_list(value).map(TermId::new).collect(),
    }
}

/// Flatten a stored list into string entries
///
/// Accepts JSON arrays, single scalars and comma-separated strings.
fn entries(value: Option<Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values.into_iter().flat_map(|v| entries(Some(v))).collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Number(n)) => vec![n.to_string()],
        Some(other) => {
            tracing::debug!(value = %other, "Ignoring non-list config value");
            Vec::new()
        }
    }
}

fn id_list(value: Option<Value>) -> impl Iterator<Item = u64> {
    entries(value).into_iter().filter_map(|s| s.parse::<u64>().ok())
}

fn parsed_list<T: FromStr + Ord>(value: Option<Value>) -> BTreeSet<T> {
    entries(value)
        .into_iter()
        .filter_map(|s| s.parse::<T>().ok())
        .collect()
}

fn number(value: Option<Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn flag(value: Option<Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => matches!(s.trim(), "1" | "true" | "yes" | "on"),
        _ => false,
    }
}

fn operator_or_default<T>(dimension: Dimension, rule: RuleId, value: Option<Value>) -> T
where
    T: FromStr<Err = String> + Default,
{
    match value {
        Some(Value::String(s)) => s.parse().unwrap_or_else(|e: String| {
            tracing::warn!(%dimension, %rule, error = %e, "Falling back to default operator");
            T::default()
        }),
        _ => T::default(),
    }
}
