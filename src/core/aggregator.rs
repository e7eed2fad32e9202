use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;

use crate::config::settings::Settings;
use crate::models::record::FolderRecord;
use crate::models::report::{ScanError, ScanErrorType, ScanReport};

use super::events::{report_error, Event, EventSender};
use super::progress::ProgressTracker;
use super::size_probe;

pub struct Aggregator {
    semaphore: Arc<Semaphore>,
    event_tx: EventSender,
    progress: Arc<ProgressTracker>,
    settings: Arc<Settings>,
}

/// What a single probe task hands back.
struct ProbeResult {
    record: Option<FolderRecord>,
    errors: Vec<ScanError>,
}

impl Aggregator {
    pub fn new(settings: Settings, event_tx: EventSender) -> Self {
        Self::with_progress(settings, event_tx, Arc::new(ProgressTracker::new()))
    }

    pub fn with_progress(
        settings: Settings,
        event_tx: EventSender,
        progress: Arc<ProgressTracker>,
    ) -> Self {
        let max_probes = settings.max_concurrent_probes.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_probes)),
            event_tx,
            progress,
            settings: Arc::new(settings),
        }
    }

    pub fn progress(&self) -> &Arc<ProgressTracker> {
        &self.progress
    }

    /// Attach size and project age to every module path.
    ///
    /// Probes run concurrently but the report keeps the input order. A probe
    /// that fails only loses its own record.
    pub async fn aggregate(&self, paths: Vec<PathBuf>) -> ScanReport {
        let mut handles = Vec::with_capacity(paths.len());

        for path in paths {
            let semaphore = Arc::clone(&self.semaphore);
            let settings = Arc::clone(&self.settings);
            let progress = Arc::clone(&self.progress);
            let task_path = path.clone();
            let handle = tokio::spawn(async move {
                // Permit is held for the whole blocking probe
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return Err(other_error(task_path, e.to_string())),
                };
                let probe_path = task_path.clone();
                tokio::task::spawn_blocking(move || {
                    build_record(probe_path, &settings, &progress)
                })
                .await
                .map_err(|e| other_error(task_path, format!("Task join error: {}", e)))
            });
            handles.push((path, handle));
        }

        let mut records = Vec::with_capacity(handles.len());
        let mut errors = Vec::new();

        // Awaiting in spawn order keeps discovery order
        for (path, handle) in handles {
            let result = match handle.await {
                Ok(Ok(result)) => result,
                Ok(Err(error)) => ProbeResult {
                    record: None,
                    errors: vec![error],
                },
                Err(e) => ProbeResult {
                    record: None,
                    errors: vec![other_error(path, format!("Task join error: {}", e))],
                },
            };

            for error in &result.errors {
                report_error(&self.event_tx, &self.progress, error);
            }
            errors.extend(result.errors);

            if let Some(record) = result.record {
                let _ = self.event_tx.send(Event::ProbeCompleted {
                    path: record.path.clone(),
                    size: record.size,
                });
                records.push(record);
            }
        }

        let report = ScanReport::new(records, errors);
        tracing::info!(
            modules = report.len(),
            total_size = report.total_size,
            errors = report.errors.len(),
            "aggregation finished"
        );
        report
    }
}

fn build_record(path: PathBuf, settings: &Settings, progress: &ProgressTracker) -> ProbeResult {
    let outcome = size_probe::probe(&path, settings.size_mode, settings.follow_symlinks);
    progress.record_probe(outcome.files, outcome.size);
    let mut errors = outcome.errors;

    let record = match project_modified(&path) {
        Ok(last_modified) => Some(FolderRecord::new(path, outcome.size, last_modified)),
        Err(error) => {
            errors.push(error);
            None
        }
    };

    tracing::debug!(files = outcome.files, size = outcome.size, "probe finished");
    ProbeResult { record, errors }
}

/// Modification time of the directory that contains `module`.
fn project_modified(module: &std::path::Path) -> Result<DateTime<Utc>, ScanError> {
    let parent = module
        .parent()
        .ok_or_else(|| other_error(module.to_path_buf(), "node_modules has no parent".into()))?;

    std::fs::metadata(parent)
        .and_then(|meta| meta.modified())
        .map(DateTime::<Utc>::from)
        .map_err(|e| ScanError::from_io(parent.to_path_buf(), &e))
}

fn other_error(path: PathBuf, message: String) -> ScanError {
    ScanError {
        path,
        error_type: ScanErrorType::Other,
        message,
    }
}
