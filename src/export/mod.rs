pub mod json;
pub mod markdown;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::report::{DeletionOutcome, ScanReport};

/// Everything one invocation produced, in exportable form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub root: PathBuf,
    pub generated_at: DateTime<Utc>,
    pub report: ScanReport,
    pub deletion: Option<DeletionOutcome>,
}
