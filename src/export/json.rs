use std::path::Path;

use super::ExportDocument;

pub fn export_json(document: &ExportDocument, output_path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    std::fs::write(output_path, json)?;
    Ok(())
}
