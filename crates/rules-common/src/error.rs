//! Error types for content rules

use crate::{ItemId, RuleId};
use thiserror::Error;

/// Content rules error type
///
/// Matching itself never fails; these errors belong to the edges that
/// write configuration, mutate the rule book or look up items by id.
#[derive(Error, Debug)]
pub enum RulesError {
    /// Catalog item not found
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// Rule not found
    #[error("rule not found: {0}")]
    RuleNotFound(RuleId),

    /// Field is not part of the dimension's configuration
    #[error("unknown field `{field}` for {dimension} scope")]
    UnknownField {
        /// Dimension name
        dimension: String,
        /// Offending field name
        field: String,
    },

    /// Invalid rule or configuration
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for content rules
pub type RulesResult<T> = Result<T, RulesError>;
