//! Identifier value objects
//!
//! Numeric ids mirror the host store's post and term ids. They are
//! `Copy` and serialize transparently so fixtures can use plain numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content rule identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(u64);

impl RuleId {
    /// Create rule id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get inner value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for RuleId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog item (product) identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Create item id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get inner value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Taxonomy term identifier (category, tag or attribute term)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(u64);

impl TermId {
    /// Create term id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get inner value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TermId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
