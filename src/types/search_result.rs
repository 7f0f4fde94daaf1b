// src/types/search_result.rs
//! Contact candidate records produced by a search

use serde::{Deserialize, Serialize};

pub const NOT_CONTACTED: &str = "Not Contacted";
pub const CONTACTED: &str = "Contacted";

/// One discovered contact candidate.
///
/// `contact_status` is free-form: the two constants above are the values the
/// tool writes itself, callers may store anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub role: String,
    pub company: String,
    pub profile_url: String,
    pub contact_status: String,
    pub message_date: String,
}

impl SearchResult {
    /// New, never-contacted candidate
    pub fn new(name: &str, role: &str, company: &str, profile_url: &str) -> Self {
        Self {
            name: name.to_string(),
            role: role.to_string(),
            company: company.to_string(),
            profile_url: profile_url.to_string(),
            contact_status: NOT_CONTACTED.to_string(),
            message_date: String::new(),
        }
    }

    pub fn is_contacted(&self) -> bool {
        !self.message_date.is_empty() || self.contact_status != NOT_CONTACTED
    }

    /// Cells in export column order
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.role.clone(),
            self.company.clone(),
            self.profile_url.clone(),
            self.contact_status.clone(),
            self.message_date.clone(),
        ]
    }
}
