use std::fmt::Write;
use std::path::Path;

use crate::models::record::human_readable_size;

use super::ExportDocument;

pub fn export_markdown(document: &ExportDocument, output_path: &Path) -> anyhow::Result<()> {
    std::fs::write(output_path, render_markdown(document)?)?;
    Ok(())
}

pub fn render_markdown(document: &ExportDocument) -> Result<String, std::fmt::Error> {
    let report = &document.report;
    let mut md = String::new();

    writeln!(md, "# nmscan Report")?;
    writeln!(md)?;
    writeln!(md, "- **Path:** {}", document.root.display())?;
    writeln!(md, "- **Generated:** {}", document.generated_at.to_rfc3339())?;
    writeln!(md, "- **node_modules folders:** {}", report.len())?;
    writeln!(md, "- **Total Size:** {}", human_readable_size(report.total_size))?;
    writeln!(md)?;

    writeln!(md, "## Folders")?;
    writeln!(md)?;
    writeln!(md, "| Path | Last Modified | Size |")?;
    writeln!(md, "|------|---------------|------|")?;
    for record in &report.records {
        writeln!(
            md,
            "| {} | {} | {} |",
            escape_cell(&record.path.display().to_string()),
            record.last_modified_iso(),
            record.human_readable_size(),
        )?;
    }

    if let Some(deletion) = &document.deletion {
        writeln!(md)?;
        if deletion.dry_run {
            writeln!(md, "## Deletion (dry run)")?;
        } else {
            writeln!(md, "## Deletion")?;
        }
        writeln!(md)?;
        writeln!(md, "- **Deleted:** {}", deletion.deleted_count())?;
        writeln!(md, "- **Cleaned Size:** {}", human_readable_size(deletion.cleaned_size()))?;
        for record in &deletion.deleted {
            writeln!(md, "- `{}`", record.path.display())?;
        }
        for err in &deletion.failed {
            writeln!(md, "- **failed** `{}`: {}", err.path.display(), err.message)?;
        }
    }

    if !report.errors.is_empty() {
        writeln!(md)?;
        writeln!(md, "## Errors ({} total)", report.errors.len())?;
        writeln!(md)?;
        for err in &report.errors {
            writeln!(md, "- **{:?}**: {}", err.error_type, err.path.display())?;
        }
    }

    Ok(md)
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
