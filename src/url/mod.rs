//! URL handling module for Kind-Scraper
//!
//! This module validates scrape targets and derives the robots.txt location and the
//! path that robots rules are matched against.

mod target;

// Re-export main functions
pub use target::{parse_target_url, policy_path, robots_url};
