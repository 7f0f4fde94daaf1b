// src/linkedin/people_scraper.rs
use anyhow::{Context, Result};
use reqwest::{header, Client, StatusCode, Url};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{ProviderOptions, SearchProvider};
use crate::core::config_manager::LinkedInConfig;
use crate::error::ProspectorError;
use crate::types::SearchResult;
use crate::utils::clean_text;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const PEOPLE_SEARCH_PATH: &str = "/search/results/people/";
const LOGIN_WALL_MARKERS: [&str; 3] = ["/login", "/authwall", "/checkpoint"];

const RESULT_SELECTORS: [&str; 3] = [
    "li.reusable-search__result-container",
    "div.entity-result",
    "div[data-chameleon-result-urn]",
];

const NAME_SELECTORS: [&str; 3] = [
    ".entity-result__title-text a span[aria-hidden='true']",
    ".entity-result__title-text a",
    "span.entity-result__title-line",
];

const HEADLINE_SELECTORS: [&str; 2] = [
    ".entity-result__primary-subtitle",
    "[class*='primary-subtitle']",
];

const PROFILE_LINK_SELECTORS: [&str; 2] = [
    ".entity-result__title-text a[href*='/in/']",
    "a[href*='/in/']",
];

/// People search against linkedin.com, authenticated with a `li_at` session cookie
pub struct LinkedInProvider {
    client: Client,
    config: LinkedInConfig,
    session_cookie: String,
    options: ProviderOptions,
}

impl LinkedInProvider {
    pub fn new(config: LinkedInConfig, options: ProviderOptions) -> crate::error::Result<Self> {
        let session_cookie = config
            .session_cookie
            .clone()
            .filter(|cookie| !cookie.trim().is_empty())
            .ok_or_else(|| {
                ProspectorError::provider(
                    "LINKEDIN_SESSION_COOKIE is not set; log in with a browser and copy the li_at cookie",
                )
            })?;

        Url::parse(&config.base_url).map_err(|e| {
            ProspectorError::Config(format!("invalid LinkedIn base URL '{}': {}", config.base_url, e))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ProspectorError::provider)?;

        Ok(Self {
            client,
            config,
            session_cookie,
            options,
        })
    }

    async fn fetch_page(&self, keywords: &str, page: usize) -> Result<String> {
        let url = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            PEOPLE_SEARCH_PATH
        );
        let page_param = page.to_string();
        info!("Fetching people search page {} for '{}'", page, keywords);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("keywords", keywords),
                ("origin", "GLOBAL_SEARCH_HEADER"),
                ("page", page_param.as_str()),
            ])
            .header(header::COOKIE, format!("li_at={}", self.session_cookie))
            .send()
            .await
            .context("Failed to fetch people search page")?;

        let final_url = response.url().to_string();
        if LOGIN_WALL_MARKERS
            .iter()
            .any(|marker| final_url.contains(marker))
        {
            anyhow::bail!("Session rejected, redirected to {}", final_url);
        }

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            anyhow::bail!("Session rejected with HTTP {}", status);
        }
        if !status.is_success() {
            anyhow::bail!("HTTP error: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }

    async fn collect(&self, keywords: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let mut results = Vec::new();
        let mut seen = HashSet::new();

        for page in 1..=self.config.max_pages {
            if results.len() >= limit {
                break;
            }
            if page > 1 {
                tokio::time::sleep(Duration::from_millis(self.config.page_delay_ms)).await;
            }

            let html = self.fetch_page(keywords, page).await?;
            let found = parse_people_page(&html, &self.config.base_url);
            debug!("Page {} yielded {} candidates", page, found.len());

            if found.is_empty() {
                break;
            }

            let before = results.len();
            for result in found {
                if results.len() >= limit {
                    break;
                }
                if seen.insert(result.profile_url.clone()) {
                    results.push(result);
                }
            }

            if results.len() == before {
                warn!("Page {} only repeated earlier results, stopping", page);
                break;
            }
        }

        Ok(results)
    }
}

impl SearchProvider for LinkedInProvider {
    async fn search(&self, keywords: &str, limit: usize) -> crate::error::Result<Vec<SearchResult>> {
        if self.options.headless {
            debug!("Headless hint ignored: HTTP provider has no UI");
        }

        let results = self
            .collect(keywords, limit)
            .await
            .map_err(|e| ProspectorError::provider(format!("{:#}", e)))?;

        info!(
            "Successfully extracted {} profiles for '{}'",
            results.len(),
            keywords
        );
        Ok(results)
    }
}

/// Extract every profile card of a people search results page
pub fn parse_people_page(html: &str, base_url: &str) -> Vec<SearchResult> {
    let document = Html::parse_document(html);

    for selector_str in RESULT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };

        let results: Vec<SearchResult> = document
            .select(&selector)
            .filter_map(|card| parse_card(card, base_url))
            .collect();

        if !results.is_empty() {
            return results;
        }
    }

    Vec::new()
}

fn parse_card(card: ElementRef<'_>, base_url: &str) -> Option<SearchResult> {
    let href = find_attr_by_selectors(card, &PROFILE_LINK_SELECTORS, "href")?;
    let profile_url = normalize_profile_url(&href, base_url)?;
    let name = find_text_by_selectors(card, &NAME_SELECTORS)?;
    let role = find_text_by_selectors(card, &HEADLINE_SELECTORS).unwrap_or_default();
    let company = company_from_headline(&role);

    Some(SearchResult::new(&name, &role, &company, &profile_url))
}

fn find_text_by_selectors(element: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(found) = element.select(&selector).next() {
                let text = clean_text(&found.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

fn find_attr_by_selectors(element: ElementRef<'_>, selectors: &[&str], attr: &str) -> Option<String> {
    selectors
        .iter()
        .filter_map(|selector_str| Selector::parse(selector_str).ok())
        .find_map(|selector| {
            element
                .select(&selector)
                .find_map(|found| found.value().attr(attr).map(str::to_string))
        })
}

/// Absolute `/in/<slug>` URL without tracking parameters
pub fn normalize_profile_url(href: &str, base_url: &str) -> Option<String> {
    let without_query = href.split(['?', '#']).next()?.trim_end_matches('/');

    let absolute = if without_query.starts_with("http://") || without_query.starts_with("https://") {
        without_query.to_string()
    } else if without_query.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), without_query)
    } else {
        return None;
    };

    absolute.contains("/in/").then_some(absolute)
}

/// Employer name from a "Title at Company" style headline
pub fn company_from_headline(headline: &str) -> String {
    [" at ", " @ ", " chez "]
        .iter()
        .filter_map(|separator| headline.rfind(separator).map(|pos| pos + separator.len()))
        .max()
        .map(|start| {
            headline[start..]
                .split(['|', ','])
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .unwrap_or_default()
}
