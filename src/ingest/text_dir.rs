use std::fs;
use std::path::Path;

use crate::core::errors::KbError;
use crate::kb::DocumentRecord;

/// Read every `.txt` file in `dir` as one document. A missing directory
/// yields zero documents rather than an error; only this source is empty.
pub fn collect(dir: &Path) -> Result<Vec<DocumentRecord>, KbError> {
    let mut records = Vec::new();
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "docs directory not found, skipping");
        return Ok(records);
    }

    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    entries.sort();

    for path in entries {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match fs::read_to_string(&path) {
            Ok(text) => records.push(DocumentRecord {
                source_id: format!("File: {name}"),
                text,
            }),
            Err(e) => {
                tracing::warn!(file = %name, "skipping unreadable text file: {e}");
            }
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_txt_files_and_ignores_others() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("vpn.txt"), "vpn guide").expect("write");
        std::fs::write(dir.path().join("notes.md"), "ignored").expect("write");

        let records = collect(dir.path()).expect("collect");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_id, "File: vpn.txt");
        assert_eq!(records[0].text, "vpn guide");
    }

    #[test]
    fn missing_directory_yields_zero_documents() {
        let records = collect(Path::new("/nonexistent/docs")).expect("collect");
        assert!(records.is_empty());
    }
}
