use std::ffi::OsStr;
use std::sync::Arc;

use crate::models::record::FolderRecord;
use crate::models::report::{DeletionOutcome, ScanError, ScanErrorType};

use super::events::{report_error, Event, EventSender};
use super::progress::ProgressTracker;
use super::scanner::NODE_MODULES;

pub struct Deleter {
    dry_run: bool,
    event_tx: EventSender,
    progress: Arc<ProgressTracker>,
}

impl Deleter {
    pub fn new(dry_run: bool, event_tx: EventSender) -> Self {
        Self::with_progress(dry_run, event_tx, Arc::new(ProgressTracker::new()))
    }

    pub fn with_progress(
        dry_run: bool,
        event_tx: EventSender,
        progress: Arc<ProgressTracker>,
    ) -> Self {
        Self {
            dry_run,
            event_tx,
            progress,
        }
    }

    /// Remove every record's directory tree.
    ///
    /// A failed removal does not stop the remaining ones; all failures are
    /// returned in [`DeletionOutcome::failed`].
    pub async fn delete(&self, records: Vec<FolderRecord>) -> DeletionOutcome {
        let mut outcome = DeletionOutcome {
            dry_run: self.dry_run,
            ..Default::default()
        };

        for record in records {
            if record.path.file_name() != Some(OsStr::new(NODE_MODULES)) {
                let error = ScanError {
                    message: format!(
                        "refusing to delete non-node_modules path {}",
                        record.path.display()
                    ),
                    path: record.path,
                    error_type: ScanErrorType::Other,
                };
                report_error(&self.event_tx, &self.progress, &error);
                outcome.failed.push(error);
                continue;
            }

            if self.dry_run {
                tracing::info!(path = %record.path.display(), "dry run: would delete");
                outcome.deleted.push(record);
                continue;
            }

            match tokio::fs::remove_dir_all(&record.path).await {
                Ok(()) => {
                    tracing::info!(path = %record.path.display(), size = record.size, "deleted");
                    let _ = self.event_tx.send(Event::Deleted {
                        path: record.path.clone(),
                        size: record.size,
                    });
                    outcome.deleted.push(record);
                }
                Err(e) => {
                    let error = ScanError::from_io(record.path, &e);
                    report_error(&self.event_tx, &self.progress, &error);
                    outcome.failed.push(error);
                }
            }
        }

        outcome
    }
}
