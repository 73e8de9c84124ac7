//! CLI subcommand implementations.

pub mod clear;
pub mod inspect;
pub mod stats;
