//! Integration test suite for crewplan.
//!
//! These tests drive the public pipeline from raw JSON to a finished plan
//! and check the guarantees callers rely on: ordering, determinism, cost
//! conservation and error reporting.
//!
//! # Test Categories
//!
//! - `pipeline_e2e`: Scenario tests over the full pipeline
//! - `config_files`: Loading planner configuration from disk
//! - `properties`: proptest properties over generated requests

mod fixtures;

mod config_files;
mod pipeline_e2e;
mod properties;
