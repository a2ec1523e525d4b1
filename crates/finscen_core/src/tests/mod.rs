//! Integration tests for the finscen scenario engine
//!
//! Tests are organized by topic:
//! - `expression` - Model compilation and evaluation
//! - `distributions` - Sampling and parameter validation
//! - `scenario` - Resolving scenario assignments against a model
//! - `runner` - Monte Carlo runs, seeding and cancellation
//! - `statistics` - Percentiles, thresholds and tail measures
//! - `comparison` - Ranking scenarios
//! - `analysis` - End-to-end analyses and the lifecycle state machine
//! - `requests` - Request and report data contracts

mod comparison;
mod requests;
mod runner;
mod statistics;
