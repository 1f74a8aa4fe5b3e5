//! Parent-name resolution: a bounded fan-out of files.get lookups,
//! one per (file, parent id) pair, joined back onto the records.

use futures::{stream, StreamExt};
use tracing::warn;

use crate::client::DriveClient;
use crate::models::FileRecord;

/// Fixed worker count for parent lookups. Kept small to stay inside
/// the Drive API rate limits while still overlapping network latency.
pub const RESOLVE_CONCURRENCY: usize = 3;

/// One unit of resolve work: look up `parent_id` and append its name
/// to the record at `record_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTask {
    pub record_index: usize,
    pub parent_id: String,
}

/// Counts for the resolve phase, reported to the caller for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOutcome {
    pub resolved: usize,
    pub failed: usize,
}

/// Flatten every record's parent list into tasks, in record order and
/// then parent order. Records without parents contribute nothing.
pub fn build_tasks(records: &[FileRecord]) -> Vec<ResolveTask> {
    records
        .iter()
        .enumerate()
        .flat_map(|(record_index, record)| {
            record.parents.iter().map(move |parent_id| ResolveTask {
                record_index,
                parent_id: parent_id.clone(),
            })
        })
        .collect()
}

/// Resolve parent folder names for every record with parents.
///
/// Lookups run with at most [`RESOLVE_CONCURRENCY`] in flight; each
/// task runs on its own detached client handle sharing the caller's
/// session. Results are joined in task-submission order, so a record's
/// `parent_names` come out in the order its parent ids appeared.
///
/// A failed lookup is logged and dropped; the remaining lookups still
/// run and partially enriched records are kept.
pub async fn resolve_parent_names(
    client: &DriveClient,
    records: &mut [FileRecord],
) -> ResolveOutcome {
    let tasks = build_tasks(records);

    let results: Vec<_> = stream::iter(tasks)
        .map(|task| {
            let worker = client.detached();
            async move {
                let result = worker.get_file(&task.parent_id).await;
                (task, result)
            }
        })
        .buffered(RESOLVE_CONCURRENCY)
        .collect()
        .await;

    let mut outcome = ResolveOutcome::default();
    for (task, result) in results {
        match result {
            Ok(parent) => {
                records[task.record_index].parent_names.push(parent.name);
                outcome.resolved += 1;
            }
            Err(e) => {
                warn!(parent_id = %task.parent_id, error = %e, "parent lookup failed");
                outcome.failed += 1;
            }
        }
    }
    outcome
}
