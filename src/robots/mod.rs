//! Robots.txt handling module
//!
//! This module provides functionality for fetching and evaluating robots.txt files.
//! A policy is resolved fresh for every scrape; nothing is cached between calls.

mod parser;
mod resolver;

pub use parser::{evaluate, RuleSet};
pub use resolver::PolicyResolver;
