//! State module for tracking scrape progress
//!
//! This module provides the explicit state machine a single scrape moves through.
//!
//! # Components
//!
//! - `ScrapeState`: The stage a scrape is in (validating, checking policy, delaying, ...)
//! - `FailureKind`: The classification carried by the terminal `Failed` state

mod scrape_state;

// Re-export main types
pub use scrape_state::{FailureKind, ScrapeState};
