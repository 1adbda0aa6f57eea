//! Document metadata, positionally aligned with the vector index.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::KbError;

/// One ingested document. `source_id` is the human-traceable provenance
/// string shown in answers ("PDF: handbook.pdf", "Confluence: VPN Setup").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub source_id: String,
    pub text: String,
}

/// Parallel array keyed by ordinal position; entry N describes vector N.
#[derive(Debug, Default)]
pub struct CorpusStore {
    records: Vec<DocumentRecord>,
}

impl CorpusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: DocumentRecord) {
        self.records.push(record);
    }

    /// Out-of-range positions resolve to `None`; an interrupted persist can
    /// leave the index and store desynced, and queries must survive that.
    pub fn get(&self, position: usize) -> Option<&DocumentRecord> {
        self.records.get(position)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn save(&self, path: &Path) -> Result<(), KbError> {
        let json = serde_json::to_vec(&self.records)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, KbError> {
        let bytes = fs::read(path)?;
        let records: Vec<DocumentRecord> = serde_json::from_slice(&bytes)?;
        Ok(Self { records })
    }
}
