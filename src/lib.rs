//! Swarmscore - offline analysis of peer-to-peer transfer logs
//!
//! This library crate exposes the CLI's building blocks for integration testing.

pub mod analysis;
pub mod config;
