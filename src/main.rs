//! drive_report CLI - Report on Google Drive file usage.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use drive_report::{report, resolver, Authenticator, DriveClient};

/// Files that are neither folders nor shortcuts.
const DEFAULT_QUERY: &str = "mimeType != 'application/vnd.google-apps.folder' \
     and mimeType != 'application/vnd.google-apps.shortcut'";

/// Report on Drive files matching a filter: a table of the largest
/// matches plus per-MIME-type counts and the total bytes used.
#[derive(Parser)]
#[command(name = "drive_report")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Maximum number of files to fetch.
    limit: u32,

    /// Path to service account JSON credentials file.
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    credentials: PathBuf,

    /// Where to cache the access token between runs.
    #[arg(long, default_value = "token.json")]
    token_cache: PathBuf,

    /// Drive query-language filter for the primary fetch.
    #[arg(long, short = 'q', default_value = DEFAULT_QUERY)]
    query: String,

    /// Ordering for the primary fetch.
    #[arg(long, default_value = "quotaBytesUsed desc,recency")]
    order_by: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let auth = Authenticator::from_file(&cli.credentials)
        .with_context(|| format!("Failed to load credentials from {:?}", cli.credentials))?
        .with_token_cache(&cli.token_cache);

    let client = DriveClient::new(auth);

    // Primary fetch. A failure here is fatal: there is nothing to report.
    let mut files = client
        .list_files(cli.limit, &cli.order_by, &cli.query)
        .await
        .context("Primary fetch failed")?;
    info!("primary fetch returned {} results", files.len());

    // Secondary fetch: resolve parent folder names. Individual lookup
    // failures leave their records partially enriched.
    let outcome = resolver::resolve_parent_names(&client, &mut files).await;
    info!(
        resolved = outcome.resolved,
        failed = outcome.failed,
        "finished resolving parent names"
    );
    if outcome.failed > 0 {
        warn!("{} parent lookup(s) failed; those names are omitted", outcome.failed);
    }

    println!();
    print!("{}", report::render_table(&files));
    println!();
    println!("{}", report::AggregateReport::from_records(&files));

    Ok(())
}
