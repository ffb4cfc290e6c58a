//! Output module for presenting scrape results
//!
//! This module handles:
//! - Wrapping a result with the URL and time it was scraped
//! - Rendering it as plain text or JSON

mod report;

pub use report::{format_json, format_text, ScrapeReport};

use crate::config::OutputFormat;
use crate::KindError;
use std::io::Write;

/// Writes a report in the requested format
///
/// # Arguments
///
/// * `writer` - Destination (stdout in the command-line tool)
/// * `report` - The report to render
/// * `format` - Text or JSON
///
/// # Returns
///
/// * `Ok(())` - Successfully written
/// * `Err(KindError)` - Serialization or I/O failed
pub fn write_report<W: Write>(
    writer: &mut W,
    report: &ScrapeReport,
    format: OutputFormat,
) -> Result<(), KindError> {
    let rendered = match format {
        OutputFormat::Text => format_text(report),
        OutputFormat::Json => format_json(report)?,
    };

    writeln!(writer, "{}", rendered)?;
    Ok(())
}
