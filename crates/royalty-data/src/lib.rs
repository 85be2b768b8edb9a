//! CSV ingestion and revenue aggregation for the royalty report.
//!
//! Reads the royalty ledger and views exports into the core data contracts
//! and derives the per-platform / per-track revenue tables consumed by the
//! report layer.

pub mod aggregator;
pub mod ledger;
pub mod views;
