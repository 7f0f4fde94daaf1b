// src/types/mod.rs
pub mod search_result;

pub use search_result::{SearchResult, CONTACTED, NOT_CONTACTED};
