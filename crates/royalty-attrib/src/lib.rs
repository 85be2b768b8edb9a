//! Channel resolution and view-share revenue attribution.
//!
//! Resolves content identifiers to their owning channels through a batched
//! external catalog lookup, aggregates views per channel, and converts view
//! share into a proportional revenue split for one selected track.

pub mod attribution;
pub mod resolver;
