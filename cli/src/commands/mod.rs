//! CLI Commands

pub mod config;
pub mod evaluate;
pub mod rules;
