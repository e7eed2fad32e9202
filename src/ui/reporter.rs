use std::fmt::{self, Write};

use crossterm::style::Stylize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::models::record::{human_readable_size, FolderRecord};
use crate::models::report::{DeletionOutcome, ScanReport};

const PATH_WIDTH: usize = 70;
const MODIFIED_WIDTH: usize = 40;
const SIZE_WIDTH: usize = 30;

/// Renders scan results as a bordered table plus summary lines.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn render_table(&self, records: &[FolderRecord]) -> Result<String, fmt::Error> {
        let widths = [PATH_WIDTH, MODIFIED_WIDTH, SIZE_WIDTH];
        let mut out = String::new();

        out.push_str(&border('┌', '┬', '┐', &widths));
        out.push_str(&self.row(["Path", "Last Modified", "Size"], &widths, false)?);
        out.push_str(&border('├', '┼', '┤', &widths));
        for record in records {
            let path = record.path.display().to_string();
            let modified = record.last_modified_iso();
            let size = record.human_readable_size();
            let cells = [path.as_str(), modified.as_str(), size.as_str()];
            out.push_str(&self.row(cells, &widths, true)?);
        }
        out.push_str(&border('└', '┴', '┘', &widths));
        Ok(out)
    }

    fn row(
        &self,
        cells: [&str; 3],
        widths: &[usize; 3],
        highlight_size: bool,
    ) -> Result<String, fmt::Error> {
        let mut line = String::from("│");
        for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
            let inner = width - 2;
            let text = if i == 0 {
                truncate_middle(cell, inner)
            } else {
                truncate_end(cell, inner)
            };
            let padded = format!("{}{}", text, " ".repeat(inner.saturating_sub(text.width())));
            if i == 2 && highlight_size && self.color {
                write!(line, " {} │", padded.green())?;
            } else {
                write!(line, " {} │", padded)?;
            }
        }
        line.push('\n');
        Ok(line)
    }

    pub fn render_summary(
        &self,
        report: &ScanReport,
        to_delete: Option<&ScanReport>,
        deletion: Option<&DeletionOutcome>,
    ) -> Result<String, fmt::Error> {
        let mut out = String::new();

        writeln!(out, "Total size: {}", human_readable_size(report.total_size))?;

        if let Some(selected) = to_delete {
            writeln!(
                out,
                "Selected for deletion: {} folders ({})",
                selected.len(),
                human_readable_size(selected.total_size)
            )?;
        }

        match deletion {
            Some(outcome) => {
                let label = if outcome.dry_run { "Would clean" } else { "Cleaned size" };
                writeln!(out, "{}: {}", label, human_readable_size(outcome.cleaned_size()))?;
                let verb = if outcome.dry_run { "Would delete" } else { "Deleted" };
                writeln!(out, "{}: {} folders", verb, outcome.deleted_count())?;
                if !outcome.failed.is_empty() {
                    let heading = format!("Failed to delete {} folders:", outcome.failed.len());
                    writeln!(out, "{}", self.warn(&heading))?;
                    for err in &outcome.failed {
                        writeln!(out, "  {}: {}", err.path.display(), err.message)?;
                    }
                }
            }
            None => {
                writeln!(out, "Cleaned size: {}", human_readable_size(0))?;
            }
        }

        if !report.errors.is_empty() {
            writeln!(
                out,
                "{}",
                self.warn(&format!("Skipped {} unreadable entries:", report.errors.len()))
            )?;
            for err in &report.errors {
                writeln!(
                    out,
                    "  [{:?}] {}: {}",
                    err.error_type,
                    err.path.display(),
                    err.message
                )?;
            }
        }

        Ok(out)
    }

    fn warn(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }
}

fn border(left: char, mid: char, right: char, widths: &[usize; 3]) -> String {
    let mut line = String::new();
    line.push(left);
    for (i, width) in widths.iter().enumerate() {
        line.push_str(&"─".repeat(*width));
        line.push(if i + 1 == widths.len() { right } else { mid });
    }
    line.push('\n');
    line
}

/// Cut `text` to `max_width` columns, ending with `…` when shortened.
pub(crate) fn truncate_end(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut w = 0;
    for c in text.chars() {
        let cw = c.width().unwrap_or(0);
        if w + cw > max_width - 1 {
            break;
        }
        w += cw;
        out.push(c);
    }
    out.push('…');
    out
}

/// Keep both ends of a path and elide the middle.
pub(crate) fn truncate_middle(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width < 5 {
        return truncate_end(text, max_width);
    }

    let keep = max_width - 1;
    let tail_len = keep / 2;
    let head_len = keep - tail_len;

    let mut head = String::new();
    let mut w = 0;
    for c in text.chars() {
        let cw = c.width().unwrap_or(0);
        if w + cw > head_len {
            break;
        }
        w += cw;
        head.push(c);
    }

    let mut tail: Vec<char> = Vec::new();
    w = 0;
    for c in text.chars().rev() {
        let cw = c.width().unwrap_or(0);
        if w + cw > tail_len {
            break;
        }
        w += cw;
        tail.push(c);
    }
    tail.reverse();

    format!("{}…{}", head, tail.into_iter().collect::<String>())
}
