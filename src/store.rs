// src/store.rs
//! Caller-owned collection of search results

use chrono::Local;
use tracing::{debug, info, warn};

use crate::error::{ProspectorError, Result};
use crate::export::{TabularSink, HEADER};
use crate::linkedin::SearchProvider;
use crate::types::SearchResult;

/// Ordered search results, addressed by 0-based index.
///
/// Each session owns its own store; nothing is shared between instances.
#[derive(Debug, Default, Clone)]
pub struct ResultStore {
    results: Vec<SearchResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents wholesale
    pub fn populate(&mut self, results: Vec<SearchResult>) {
        info!(
            "Populating store with {} results (discarding {})",
            results.len(),
            self.results.len()
        );
        self.results = results;
    }

    /// Run a search and populate the store with its results.
    ///
    /// The store is left untouched when the provider fails.
    pub async fn search<P: SearchProvider>(
        &mut self,
        provider: &P,
        keywords: &str,
        limit: usize,
    ) -> Result<&[SearchResult]> {
        info!("Searching for: {} (limit {})", keywords, limit);

        let mut results = provider.search(keywords, limit).await?;
        if results.len() > limit {
            warn!(
                "Provider returned {} results for a limit of {}, keeping the first {}",
                results.len(),
                limit,
                limit
            );
            results.truncate(limit);
        }

        self.populate(results);
        Ok(&self.results)
    }

    /// Set the contact status of one record.
    ///
    /// `date` defaults to today's local date when absent.
    pub fn update_status(&mut self, index: i64, status: &str, date: Option<&str>) -> Result<()> {
        let len = self.results.len();
        let slot = usize::try_from(index)
            .ok()
            .filter(|i| *i < len)
            .ok_or(ProspectorError::InvalidIndex { index, len })?;

        let message_date = match date {
            Some(date) => date.to_string(),
            None => Local::now().format("%Y-%m-%d").to_string(),
        };

        let record = &mut self.results[slot];
        if record.is_contacted() {
            debug!(
                "Overwriting earlier status of {}: {} ({})",
                record.name, record.contact_status, record.message_date
            );
        }
        record.contact_status = status.to_string();
        record.message_date = message_date;

        info!("Updated contact status for {} to {}", record.name, status);
        Ok(())
    }

    /// Write the header and every record, in store order, to `sink`.
    ///
    /// Returns the number of rows written, header included.
    pub async fn export<S: TabularSink>(&self, sink: &mut S) -> Result<usize> {
        let rows: Vec<Vec<String>> = self.results.iter().map(SearchResult::to_row).collect();

        sink.write_table(&HEADER, &rows).await?;

        info!("Exported {} results to {}", rows.len(), sink.target());
        Ok(rows.len() + 1)
    }

    /// Export when a sink is configured, report `SinkUnavailable` otherwise
    pub async fn export_to<S: TabularSink>(&self, sink: Option<&mut S>) -> Result<usize> {
        match sink {
            Some(sink) => self.export(sink).await,
            None => Err(ProspectorError::SinkUnavailable(
                "no export target configured".to_string(),
            )),
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SearchResult> {
        self.results.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchResult> {
        self.results.iter()
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }
}
