// src/utils.rs
use anyhow::Result;
use chrono::NaiveDate;

/// Placeholder accepted on the command line for "no date"
pub const NO_DATE: &str = "None";

/// Collapse whitespace of scraped text into single spaces
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Convert a 1-based index typed by the user into a 0-based store index
pub fn parse_cli_index(raw: &str) -> Result<i64> {
    let invalid = || anyhow::anyhow!("Invalid index '{}'. Please provide a number.", raw);
    let position: i64 = raw.trim().parse().map_err(|_| invalid())?;
    position.checked_sub(1).ok_or_else(invalid)
}

/// `None` (the literal word) or an empty value means no date was supplied
pub fn parse_optional_date(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_DATE {
        None
    } else {
        Some(trimmed)
    }
}

/// Whether a date string is a `YYYY-MM-DD` calendar date
pub fn is_iso_date(raw: &str) -> bool {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
}

/// Quote a sheet title for A1 notation, e.g. `'My Sheet'`
pub fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}
