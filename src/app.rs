use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;

use crate::config::settings::Settings;
use crate::core::aggregator::Aggregator;
use crate::core::deleter::Deleter;
use crate::core::events::{self, EventSender};
use crate::core::progress::ProgressTracker;
use crate::core::scanner::Scanner;
use crate::error::NmscanError;
use crate::export::json::export_json;
use crate::export::markdown::export_markdown;
use crate::export::ExportDocument;
use crate::models::record::FolderRecord;
use crate::models::report::{DeletionOutcome, DeletionPolicy, ScanReport};
use crate::ui::reporter::Reporter;
use crate::ui::status_line;

/// Per-invocation inputs that are not scanner settings.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub root: PathBuf,
    pub policy: DeletionPolicy,
    pub color: bool,
    pub live_progress: bool,
    pub quiet: bool,
    pub export_json: Option<PathBuf>,
    pub export_markdown: Option<PathBuf>,
}

impl RunOptions {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            policy: DeletionPolicy::disabled(),
            color: false,
            live_progress: false,
            quiet: true,
            export_json: None,
            export_markdown: None,
        }
    }
}

/// Everything a run produced. `report` always holds every discovered folder,
/// including the ones selected for deletion.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report: ScanReport,
    pub to_delete: Option<ScanReport>,
    pub deletion: Option<DeletionOutcome>,
}

pub struct App {
    settings: Settings,
    options: RunOptions,
}

impl App {
    pub fn new(settings: Settings, options: RunOptions) -> Self {
        Self { settings, options }
    }

    pub async fn run(&self) -> anyhow::Result<RunSummary> {
        let reporter = Reporter::new(self.options.color);

        let report = self.collect().await?;

        if !self.options.quiet {
            print!("{}", reporter.render_table(&report.records)?);
        }

        let (to_delete, deletion) = if self.options.policy.enabled {
            let (_, to_delete) = self.options.policy.apply(report.clone());
            tracing::info!(
                selected = to_delete.len(),
                threshold_days = self.options.policy.threshold_days,
                "applying deletion policy"
            );
            let outcome = self.delete(to_delete.records.clone()).await;
            (Some(to_delete), Some(outcome))
        } else {
            (None, None)
        };

        if !self.options.quiet {
            print!(
                "{}",
                reporter.render_summary(&report, to_delete.as_ref(), deletion.as_ref())?
            );
        }

        let summary = RunSummary {
            report,
            to_delete,
            deletion,
        };
        self.export(&summary)?;

        Ok(summary)
    }

    /// Scan and size, with live progress on stderr while it runs.
    async fn collect(&self) -> Result<ScanReport, NmscanError> {
        let progress = Arc::new(ProgressTracker::new());
        let (event_tx, event_rx) = events::create_event_channel();
        let status = self.spawn_status(event_rx, Arc::clone(&progress));

        let result = self.scan_and_size(event_tx, progress).await;

        // All senders are dropped by now, so the status task finishes
        let _ = status.await;
        result
    }

    async fn scan_and_size(
        &self,
        event_tx: EventSender,
        progress: Arc<ProgressTracker>,
    ) -> Result<ScanReport, NmscanError> {
        let scanner = Scanner::with_progress(
            self.settings.clone(),
            event_tx.clone(),
            Arc::clone(&progress),
        );
        let discovery = scanner.scan(self.options.root.clone()).await?;
        tracing::info!(
            root = %discovery.root.display(),
            modules = discovery.modules.len(),
            dirs = discovery.dirs_scanned,
            "scan finished"
        );

        let aggregator = Aggregator::with_progress(self.settings.clone(), event_tx, progress);
        let mut report = aggregator.aggregate(discovery.modules).await;

        let mut errors = discovery.errors;
        errors.append(&mut report.errors);
        report.errors = errors;

        Ok(report)
    }

    async fn delete(&self, records: Vec<FolderRecord>) -> DeletionOutcome {
        let progress = Arc::new(ProgressTracker::new());
        let (event_tx, event_rx) = events::create_event_channel();
        let status = self.spawn_status(event_rx, Arc::clone(&progress));

        let outcome = {
            let deleter = Deleter::with_progress(self.settings.dry_run, event_tx, progress);
            deleter.delete(records).await
        };

        let _ = status.await;
        outcome
    }

    fn spawn_status(
        &self,
        event_rx: events::EventReceiver,
        progress: Arc<ProgressTracker>,
    ) -> tokio::task::JoinHandle<()> {
        if self.options.quiet {
            // Nobody is watching; just drain
            let mut event_rx = event_rx;
            tokio::spawn(async move { while event_rx.recv().await.is_some() {} })
        } else {
            tokio::spawn(status_line::drive(
                event_rx,
                progress,
                self.options.live_progress,
            ))
        }
    }

    fn export(&self, summary: &RunSummary) -> anyhow::Result<()> {
        if self.options.export_json.is_none() && self.options.export_markdown.is_none() {
            return Ok(());
        }

        let document = ExportDocument {
            root: self.options.root.clone(),
            generated_at: Utc::now(),
            report: summary.report.clone(),
            deletion: summary.deletion.clone(),
        };

        if let Some(ref path) = self.options.export_json {
            export_json(&document, path)?;
            tracing::info!("Exported to: {}", path.display());
        }
        if let Some(ref path) = self.options.export_markdown {
            export_markdown(&document, path)?;
            tracing::info!("Exported to: {}", path.display());
        }
        Ok(())
    }
}
