//! Raptoreum asset indexer.
//!
//! Mirrors asset creation, minting, transfers and locked outputs from a
//! Raptoreum node into Postgres.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod utils;
