// src/cli.rs
use anyhow::Result;
use clap::{CommandFactory, Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::core::ConfigManager;
use crate::error::ProspectorError;
use crate::export::{CsvSink, GoogleSheetSink, TabularSink};
use crate::linkedin::{LinkedInProvider, MockProvider, Provider, ProviderOptions};
use crate::store::ResultStore;
use crate::types::SearchResult;
use crate::utils::{is_iso_date, parse_cli_index, parse_optional_date};

#[derive(Parser, Debug)]
#[command(name = "linkedin-prospector", version)]
#[command(about = "LinkedIn Search Scraper")]
pub struct Cli {
    /// Search keywords (e.g. 'AI CTO France')
    pub keywords: Option<String>,

    /// Number of results to fetch
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub num_results: u32,

    /// Run browser in headless mode
    #[arg(long)]
    pub headless: bool,

    /// Google Sheet name to save results
    #[arg(long)]
    pub sheet_name: Option<String>,

    /// Path to Google Sheets credentials JSON file
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Update contact status (index, status, date). Index starts at 1, DATE may be None
    #[arg(
        long,
        num_args = 3,
        value_names = ["INDEX", "STATUS", "DATE"],
        allow_hyphen_values = true
    )]
    pub update_status: Option<Vec<String>>,

    /// Where search results come from
    #[arg(long, value_enum, default_value_t = ProviderKind::Mock)]
    pub provider: ProviderKind,

    /// Also save results to a local CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Configuration file (defaults to ./prospector.yaml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    Mock,
    Linkedin,
}

/// A status change requested on the command line, already 0-based
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub index: i64,
    pub status: String,
    pub date: Option<String>,
}

impl StatusUpdate {
    pub fn from_args(args: &[String]) -> Result<Option<Self>> {
        match args {
            [] => Ok(None),
            [index, status, date] => Ok(Some(Self {
                index: parse_cli_index(index)?,
                status: status.clone(),
                date: parse_optional_date(date).map(str::to_string),
            })),
            _ => anyhow::bail!("--update-status expects INDEX STATUS DATE"),
        }
    }

    /// Notice for an explicit date that is not `YYYY-MM-DD`; the date is still stored as given
    pub fn date_notice(&self) -> Option<String> {
        self.date
            .as_deref()
            .filter(|date| !is_iso_date(date))
            .map(|date| format!("Warning: date '{}' is not in YYYY-MM-DD format", date))
    }
}

/// Writes user-facing messages; with `--json` they go to stderr so stdout stays parseable
struct Console {
    json: bool,
}

impl Console {
    fn say(&self, message: impl AsRef<str>) {
        if self.json {
            eprintln!("{}", message.as_ref());
        } else {
            println!("{}", message.as_ref());
        }
    }
}

pub fn build_provider(
    kind: ProviderKind,
    config: &ConfigManager,
    options: ProviderOptions,
) -> crate::error::Result<Provider> {
    match kind {
        ProviderKind::Mock => Ok(Provider::Mock(MockProvider::new(options))),
        ProviderKind::Linkedin => {
            LinkedInProvider::new(config.linkedin.clone(), options).map(Provider::LinkedIn)
        }
    }
}

/// Human readable listing, numbered from 1
pub fn render_results(results: &[SearchResult]) -> String {
    let mut out = String::new();
    for (i, result) in results.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, result.name));
        out.push_str(&format!("   Role: {}\n", result.role));
        out.push_str(&format!("   Company: {}\n", result.company));
        out.push_str(&format!("   Profile: {}\n", result.profile_url));
        out.push_str(&format!("   Status: {}\n", result.contact_status));
        out.push_str(&format!("   Date: {}\n\n", result.message_date));
    }
    out
}

pub async fn handle_command(cli: Cli, config: ConfigManager) -> Result<()> {
    let console = Console { json: cli.json };

    let update = match StatusUpdate::from_args(cli.update_status.as_deref().unwrap_or_default()) {
        Ok(update) => update,
        Err(e) => {
            warn!("Rejected status update: {}", e);
            console.say(e.to_string());
            return Ok(());
        }
    };

    if cli.keywords.is_none() && update.is_none() {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }

    let mut store = ResultStore::new();

    if let Some(keywords) = cli.keywords.as_deref() {
        let options = ProviderOptions {
            headless: cli.headless,
        };
        let searched = match build_provider(cli.provider, &config, options) {
            Ok(provider) => {
                console.say(format!("Searching LinkedIn for: {}", keywords));
                info!("Using {} provider", provider.name());
                store
                    .search(&provider, keywords, cli.num_results as usize)
                    .await
                    .map(|_| ())
            }
            Err(e) => Err(e),
        };

        if let Err(e) = searched {
            if !e.is_recoverable() {
                return Err(e.into());
            }
            error!("Search failed: {}", e);
            console.say(e.to_string());
            return Ok(());
        }
    }

    if let Some(update) = &update {
        if let Some(notice) = update.date_notice() {
            warn!("{}", notice);
            console.say(notice);
        }
        match store.update_status(update.index, &update.status, update.date.as_deref()) {
            Ok(()) => {
                if let Some(record) = store.get(update.index as usize) {
                    console.say(format!(
                        "Updated contact status for {} to {}",
                        record.name, record.contact_status
                    ));
                }
            }
            Err(e) => {
                warn!("Status update skipped: {}", e);
                console.say(e.to_string());
            }
        }
    }

    if cli.keywords.is_some() {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(store.results())?);
        } else {
            println!("\nSearch Results:");
            println!("{}", "-".repeat(50));
            print!("{}", render_results(store.results()));
        }
    }

    match (cli.sheet_name.as_deref(), cli.credentials.clone()) {
        (Some(sheet_name), Some(credentials)) => {
            match GoogleSheetSink::new(sheet_name, credentials, config.sheets.clone()) {
                Ok(mut sink) => {
                    report_export(&console, &store, Some(&mut sink), sheet_name, |target| {
                        format!("Results saved to Google Sheet: {}", target)
                    })
                    .await
                }
                Err(e) => {
                    error!("Google Sheets export unavailable: {}", e);
                    console.say(e.to_string());
                }
            }
        }
        (None, None) => {}
        _ => console.say(
            "Skipping Google Sheets export: both --sheet-name and --credentials are required",
        ),
    }

    if let Some(path) = cli.csv.clone() {
        let mut sink = CsvSink::new(path.clone());
        let target = path.display().to_string();
        report_export(&console, &store, Some(&mut sink), &target, |target| {
            format!("Results saved to CSV file: {}", target)
        })
        .await;
    }

    Ok(())
}

async fn report_export<S, F>(
    console: &Console,
    store: &ResultStore,
    sink: Option<&mut S>,
    target: &str,
    success: F,
) where
    S: TabularSink,
    F: Fn(&str) -> String,
{
    match store.export_to(sink).await {
        Ok(rows) => {
            info!("Wrote {} rows to {}", rows, target);
            console.say(success(target));
        }
        Err(e @ ProspectorError::SinkUnavailable(_)) => {
            error!("Export to {} failed: {}", target, e);
            console.say(e.to_string());
        }
        Err(e) => {
            error!("Unexpected export failure for {}: {}", target, e);
            console.say(format!("Export to {} failed: {}", target, e));
        }
    }
}
