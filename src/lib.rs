//! Find LinkedIn prospects, track contact status and export the list.
//!
//! A [`SearchProvider`] fills a caller-owned [`ResultStore`]; records are then
//! updated by index and written out through a [`TabularSink`].

pub mod cli;
pub mod core;
pub mod error;
pub mod export;
pub mod linkedin;
pub mod store;
pub mod types;
pub mod utils;

pub use error::{ProspectorError, Result};
pub use export::{CsvSink, GoogleSheetSink, MemorySink, TabularSink, HEADER};
pub use linkedin::{LinkedInProvider, MockProvider, Provider, ProviderOptions, SearchProvider};
pub use store::ResultStore;
pub use types::{SearchResult, CONTACTED, NOT_CONTACTED};
