// src/linkedin/mock.rs
use tracing::info;

use super::{ProviderOptions, SearchProvider};
use crate::error::Result;
use crate::types::SearchResult;

/// Deterministic placeholder results, no network access
pub struct MockProvider {
    options: ProviderOptions,
}

impl MockProvider {
    pub fn new(options: ProviderOptions) -> Self {
        Self { options }
    }

    fn generate(limit: usize) -> Vec<SearchResult> {
        (1..=limit)
            .map(|i| {
                SearchResult::new(
                    &format!("Person {}", i),
                    &format!("AI Engineer at Company {}", i),
                    &format!("Company {}", i),
                    &format!("https://www.linkedin.com/in/person-{}", i),
                )
            })
            .collect()
    }
}

impl SearchProvider for MockProvider {
    async fn search(&self, keywords: &str, limit: usize) -> Result<Vec<SearchResult>> {
        info!(
            "Generating {} mock results for '{}' (headless: {})",
            limit, keywords, self.options.headless
        );
        Ok(Self::generate(limit))
    }
}
