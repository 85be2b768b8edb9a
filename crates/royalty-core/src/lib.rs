//! Core domain types for the royalty report.
//!
//! Data contracts, the error type, the platform allow-list, number
//! formatting and CLI settings shared by the ingestion and attribution
//! crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod platforms;
pub mod settings;
