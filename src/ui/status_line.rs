use std::io::Write;
use std::sync::Arc;

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};

use crate::core::events::{Event, EventReceiver};
use crate::core::progress::{ProgressSnapshot, ProgressTracker};
use crate::models::record::human_readable_size;

use super::reporter::truncate_middle;

/// A single self-overwriting line on stderr, plus plain log lines above it.
pub struct StatusLine {
    live: bool,
    dirty: bool,
}

impl StatusLine {
    pub fn new(live: bool) -> Self {
        Self { live, dirty: false }
    }

    pub fn update(&mut self, text: &str) {
        if !self.live {
            return;
        }
        let width = terminal::size().map(|(w, _)| w as usize).unwrap_or(80);
        let text = truncate_middle(text, width.saturating_sub(1));
        let mut stderr = std::io::stderr();
        let _ = queue!(stderr, MoveToColumn(0), Clear(ClearType::CurrentLine), Print(text));
        let _ = stderr.flush();
        self.dirty = true;
    }

    pub fn message(&mut self, text: &str) {
        self.clear();
        eprintln!("{}", text);
    }

    pub fn clear(&mut self) {
        if !self.dirty {
            return;
        }
        let mut stderr = std::io::stderr();
        let _ = queue!(stderr, MoveToColumn(0), Clear(ClearType::CurrentLine));
        let _ = stderr.flush();
        self.dirty = false;
    }
}

pub fn format_walk(dirs_scanned: usize, modules_found: usize, current: &str) -> String {
    format!(
        "Scanning: {} dirs, {} node_modules | {}",
        dirs_scanned, modules_found, current
    )
}

pub fn format_probe(snapshot: &ProgressSnapshot) -> String {
    format!(
        "Sizing: {}/{} folders | {} files | {}",
        snapshot.modules_probed,
        snapshot.modules_found,
        snapshot.files_probed,
        human_readable_size(snapshot.bytes_probed)
    )
}

/// Consume events until every sender is gone.
pub async fn drive(mut event_rx: EventReceiver, progress: Arc<ProgressTracker>, live: bool) {
    let mut line = StatusLine::new(live);

    while let Some(event) = event_rx.recv().await {
        match event {
            Event::ScanStarted { path } => {
                line.message(&format!("Scanning {}", path.display()));
            }
            Event::Progress {
                dirs_scanned,
                modules_found,
                current_path,
            } => {
                line.update(&format_walk(
                    dirs_scanned,
                    modules_found,
                    &current_path.display().to_string(),
                ));
            }
            Event::ScanCompleted { modules_found, .. } => {
                line.message(&format!("Found {} node_modules folders", modules_found));
                line.message("Calculating size on disk (this may take some time)");
            }
            Event::ProbeCompleted { .. } => {
                line.update(&format_probe(&progress.snapshot()));
            }
            Event::Deleted { path, size } => {
                line.message(&format!(
                    "Removed {} ({})",
                    path.display(),
                    human_readable_size(size)
                ));
            }
            Event::ModuleFound { .. } | Event::ScanError { .. } => {}
        }
    }

    line.clear();
}
