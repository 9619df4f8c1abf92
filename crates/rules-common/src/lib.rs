//! Content Rules Common - Shared types for the rule scope matcher
//!
//! This crate provides the pieces every layer agrees on:
//! - Identifiers for rules, catalog items and taxonomy terms
//! - The read-only catalog item model and its accessor trait
//! - Error handling
//! - Lock-free counters for engine statistics

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod error;
pub mod ids;

pub use catalog::*;
pub use error::*;
pub use ids::*;

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counter for engine statistics
#[derive(Debug, Default)]
pub struct AtomicCounter(AtomicU64);

impl AtomicCounter {
    /// Create new counter
    pub const fn new(value: u64) -> Self {
        Self(AtomicU64::new(value))
    }

    /// Increment and return previous value
    #[inline(always)]
    pub fn inc(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }

    /// Get current value
    #[inline(always)]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}
