//! raidstat: derives analysis tables from a game static-data dump.
//!
//! One batch pass: load the JSON document, annotate campaign stages and
//! champion skills, write CSV tables.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod data;
pub mod formula;
pub mod report;
