use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum Event {
    // Walk progress
    Progress { dirs_scanned: usize, modules_found: usize, current_path: PathBuf },
    ModuleFound { path: PathBuf },

    // Size probes
    ProbeCompleted { path: PathBuf, size: u64 },

    // Deletion
    Deleted { path: PathBuf, size: u64 },

    // Scan state
    ScanStarted { path: PathBuf },
    ScanCompleted { modules_found: usize, dirs_scanned: usize, duration_ms: u64 },
    ScanError { path: PathBuf, error: String },
}

pub type EventSender = mpsc::UnboundedSender<Event>;
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

pub fn create_event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Log a non-fatal error, count it and forward it to listeners.
pub(crate) fn report_error(
    event_tx: &EventSender,
    progress: &super::progress::ProgressTracker,
    error: &crate::models::report::ScanError,
) {
    tracing::warn!(path = %error.path.display(), kind = ?error.error_type, "{}", error.message);
    progress.add_errors(1);
    let _ = event_tx.send(Event::ScanError {
        path: error.path.clone(),
        error: error.message.clone(),
    });
}
