// src/linkedin/mod.rs
//! Sources of contact candidates

pub mod mock;
pub mod people_scraper;

pub use mock::MockProvider;
pub use people_scraper::LinkedInProvider;

use crate::error::Result;
use crate::types::SearchResult;

/// Options shared by every provider
#[derive(Debug, Clone, Default)]
pub struct ProviderOptions {
    /// Run without a visible UI. Providers without a UI only log it.
    pub headless: bool,
}

/// Anything able to turn keywords into contact candidates.
///
/// Implementations return at most `limit` results, all marked as not yet
/// contacted. A source that cannot be reached or authenticated against must
/// fail with `ProviderUnavailable` instead of returning a partial list.
#[allow(async_fn_in_trait)]
pub trait SearchProvider {
    async fn search(&self, keywords: &str, limit: usize) -> Result<Vec<SearchResult>>;
}

/// Provider picked at runtime
pub enum Provider {
    Mock(MockProvider),
    LinkedIn(LinkedInProvider),
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Mock(_) => "mock",
            Provider::LinkedIn(_) => "linkedin",
        }
    }
}

impl SearchProvider for Provider {
    async fn search(&self, keywords: &str, limit: usize) -> Result<Vec<SearchResult>> {
        match self {
            Provider::Mock(provider) => provider.search(keywords, limit).await,
            Provider::LinkedIn(provider) => provider.search(keywords, limit).await,
        }
    }
}
