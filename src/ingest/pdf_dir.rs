use std::path::Path;

use crate::core::errors::KbError;
use crate::kb::DocumentRecord;

/// Extract text from every `.pdf` in `dir`, all pages concatenated into one
/// document per file. Unparseable files are skipped with a warning; PDF
/// extraction is lossy enough that one bad file should not sink a build.
pub fn collect(dir: &Path) -> Result<Vec<DocumentRecord>, KbError> {
    let mut records = Vec::new();
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "pdf directory not found, skipping");
        return Ok(records);
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "pdf"))
        .collect();
    entries.sort();

    for path in entries {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match extract_text(&path) {
            Ok(text) if !text.trim().is_empty() => records.push(DocumentRecord {
                source_id: format!("PDF: {name}"),
                text,
            }),
            Ok(_) => {
                tracing::warn!(file = %name, "pdf contained no extractable text, skipping");
            }
            Err(e) => {
                tracing::warn!(file = %name, "skipping unparseable pdf: {e}");
            }
        }
    }

    Ok(records)
}

fn extract_text(path: &Path) -> Result<String, lopdf::Error> {
    let doc = lopdf::Document::load(path)?;
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    doc.extract_text(&pages)
}
