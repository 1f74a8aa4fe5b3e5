//! drive_report - A single-run Google Drive metadata report.
//!
//! Queries the Drive metadata API for files matching a filter, resolves
//! each file's parent folder names with a bounded concurrent fan-out,
//! and renders a table plus aggregate statistics:
//! - Primary fetch: one filtered, ordered files.list call
//! - Parent resolution: files.get per (file, parent) pair, 3 at a time
//! - Report: fixed-width table, MIME-type histogram, total bytes
//!
//! # Example
//!
//! ```no_run
//! use drive_report::{resolver, report, Authenticator, DriveClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let auth = Authenticator::from_file("service-account.json")?
//!         .with_token_cache("token.json");
//!     let client = DriveClient::new(auth);
//!
//!     let mut files = client
//!         .list_files(10, "quotaBytesUsed desc", "name contains 'report'")
//!         .await?;
//!     resolver::resolve_parent_names(&client, &mut files).await;
//!
//!     print!("{}", report::render_table(&files));
//!     println!("{}", report::AggregateReport::from_records(&files));
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod report;
pub mod resolver;

// Re-exports for convenience
pub use auth::Authenticator;
pub use client::DriveClient;
pub use error::{ReportError, Result};
pub use models::{FileRecord, Owner};
pub use report::{bytes2str, AggregateReport};
