//! # owner-change
//!
//! Queries the event history service for package ownership changes over a
//! lookback window, classifies them per package/branch, and delivers a
//! plain-text change report by email or to standard output.
//!
//! The pipeline is strictly sequential: fetch → classify → aggregate →
//! render → deliver. Any fetch or delivery failure aborts the run without
//! producing a partial report.

#![deny(unsafe_code)]

mod deliver;
mod errors;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use owner_change_client::DatagrepperClient;
use owner_change_core::{classify, render};

use crate::settings::Settings;

/// Package ownership change reporter.
#[derive(Parser, Debug)]
#[command(name = "owner-change", about = "Reports package ownership changes")]
struct Cli {
    /// Print the report instead of sending it by email.
    #[arg(long)]
    print_only: bool,

    /// Output debugging info.
    #[arg(long)]
    verbose: bool,

    /// Path to the settings file (defaults to ~/.owner-change/settings.json).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Override the configured lookback window, in seconds.
    #[arg(long)]
    lookback_seconds: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings_path = args.settings.clone().unwrap_or_else(settings::settings_path);
    let mut settings = settings::load_settings_from_path(&settings_path)
        .context("failed to load settings")?;
    if let Some(seconds) = args.lookback_seconds {
        settings.lookback_seconds = seconds;
    }
    if args.print_only {
        settings.print_only = true;
    }

    run(&settings).await
}

/// One full pipeline run for the given settings.
async fn run(settings: &Settings) -> Result<()> {
    let client = DatagrepperClient::new(
        settings.datagrepper_url.clone(),
        settings.page_size,
        settings.order,
    );
    let events = client
        .fetch_events(settings.lookback_seconds, &settings.topic_list)
        .await
        .context("failed to retrieve ownership events")?;
    info!(count = events.len(), "events retrieved");

    let buckets = classify(&events);
    let changes = buckets.aggregate();
    debug!(
        orphaned = changes.orphaned.slot_count,
        unorphaned = changes.unorphaned.slot_count,
        retired = changes.retired.slot_count,
        unretired = changes.unretired.slot_count,
        changed = changes.changed.slot_count,
        "classification complete"
    );
    let report = render(&changes, settings.lookback_seconds);

    if settings.print_only {
        deliver::print_report(&report);
    } else {
        deliver::send_report(&report, &settings.email)
            .await
            .context("failed to deliver report")?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["owner-change"]);
        assert!(!cli.print_only);
        assert!(!cli.verbose);
        assert_eq!(cli.settings, None);
        assert_eq!(cli.lookback_seconds, None);
    }

    #[test]
    fn cli_print_only_flag() {
        let cli = Cli::parse_from(["owner-change", "--print-only"]);
        assert!(cli.print_only);
    }

    #[test]
    fn cli_verbose_flag() {
        let cli = Cli::parse_from(["owner-change", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn cli_settings_path() {
        let cli = Cli::parse_from(["owner-change", "--settings", "/tmp/s.json"]);
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/s.json")));
    }

    #[test]
    fn cli_lookback_override() {
        let cli = Cli::parse_from(["owner-change", "--lookback-seconds", "3600"]);
        assert_eq!(cli.lookback_seconds, Some(3600));
    }

    #[tokio::test]
    async fn run_aborts_on_unreachable_service() {
        let settings = Settings {
            datagrepper_url: "http://127.0.0.1:1/raw/".to_string(),
            print_only: true,
            ..Settings::default()
        };
        let result = run(&settings).await;
        assert!(result.is_err(), "fetch failure must abort the run");
    }
}
