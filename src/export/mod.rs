// src/export/mod.rs
//! Tabular export targets for a result store

pub mod csv_sink;
pub mod google_sheets;

pub use csv_sink::CsvSink;
pub use google_sheets::GoogleSheetSink;

use crate::error::Result;

/// Column titles written as the first row of every export
pub const HEADER: [&str; 6] = [
    "Name",
    "Role",
    "Company",
    "Profile URL",
    "Contact Status",
    "Message Date",
];

/// A spreadsheet-like target.
///
/// Implementations create the target when it does not exist and replace any
/// previous contents, so writing the same table twice leaves the same data.
#[allow(async_fn_in_trait)]
pub trait TabularSink {
    /// Human readable name of the target, used in logs and messages
    fn target(&self) -> String;

    async fn write_table(&mut self, header: &[&str], rows: &[Vec<String>]) -> Result<()>;
}

/// In-memory sink keeping the last table written
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub rows: Vec<Vec<String>>,
    pub writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TabularSink for MemorySink {
    fn target(&self) -> String {
        "memory".to_string()
    }

    async fn write_table(&mut self, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
        self.rows.clear();
        self.rows
            .push(header.iter().map(|cell| cell.to_string()).collect());
        self.rows.extend(rows.iter().cloned());
        self.writes += 1;
        Ok(())
    }
}
