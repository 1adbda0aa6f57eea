//! The knowledge base: one vector index and one corpus store that live and
//! die together.
//!
//! The pair is built once, persisted as two artifacts, and read-only after
//! load. A rebuild produces a whole new `KnowledgeBase` that the owner
//! swaps in; nothing ever mutates a published instance.

mod builder;
mod corpus;
mod vector_index;

pub use builder::IndexBuilder;
pub use corpus::{CorpusStore, DocumentRecord};
pub use vector_index::VectorIndex;

use std::fs;

use crate::core::config::AppPaths;
use crate::core::errors::KbError;

#[derive(Debug)]
pub struct KnowledgeBase {
    index: VectorIndex,
    corpus: CorpusStore,
}

impl KnowledgeBase {
    pub(crate) fn from_parts(index: VectorIndex, corpus: CorpusStore) -> Result<Self, KbError> {
        if index.len() != corpus.len() {
            return Err(KbError::Corruption(format!(
                "index has {} vectors but corpus has {} documents",
                index.len(),
                corpus.len()
            )));
        }
        Ok(Self { index, corpus })
    }

    /// Load the persisted pair. A missing artifact means the build step has
    /// never run here; a length mismatch means the pair is corrupt and the
    /// only fix is a rebuild.
    pub fn load(paths: &AppPaths) -> Result<Self, KbError> {
        if !paths.index_path.exists() || !paths.corpus_path.exists() {
            return Err(KbError::IndexNotFound(paths.data_dir.clone()));
        }

        let index = VectorIndex::load(&paths.index_path)?;
        let corpus = CorpusStore::load(&paths.corpus_path)?;
        Self::from_parts(index, corpus)
    }

    /// Write both artifacts to temporary siblings, then rename into place.
    /// Replaces any previous pair wholesale.
    pub fn persist(&self, paths: &AppPaths) -> Result<(), KbError> {
        let index_tmp = paths.index_path.with_extension("bin.tmp");
        let corpus_tmp = paths.corpus_path.with_extension("json.tmp");

        self.index.save(&index_tmp)?;
        self.corpus.save(&corpus_tmp)?;

        fs::rename(&index_tmp, &paths.index_path)?;
        fs::rename(&corpus_tmp, &paths.corpus_path)?;

        tracing::info!(
            documents = self.corpus.len(),
            dim = self.index.dim(),
            "knowledge base persisted"
        );
        Ok(())
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn corpus(&self) -> &CorpusStore {
        &self.corpus
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }
}

/// Truncate to at most `max_chars` characters without splitting a char.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_kb() -> KnowledgeBase {
        let mut index = VectorIndex::new();
        index
            .add(&[vec![1.0, 0.0], vec![0.0, 1.0]])
            .expect("add");
        let mut corpus = CorpusStore::new();
        corpus.push(DocumentRecord {
            source_id: "File: a.txt".to_string(),
            text: "alpha".to_string(),
        });
        corpus.push(DocumentRecord {
            source_id: "File: b.txt".to_string(),
            text: "beta".to_string(),
        });
        KnowledgeBase::from_parts(index, corpus).expect("aligned")
    }

    #[test]
    fn mismatched_lengths_are_corruption() {
        let mut index = VectorIndex::new();
        index.add(&[vec![1.0, 0.0]]).expect("add");
        let corpus = CorpusStore::new();

        let err = KnowledgeBase::from_parts(index, corpus).unwrap_err();
        assert!(matches!(err, KbError::Corruption(_)));
    }

    #[test]
    fn load_without_artifacts_is_index_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = AppPaths::in_dir(dir.path().join("data"));

        let err = KnowledgeBase::load(&paths).unwrap_err();
        assert!(matches!(err, KbError::IndexNotFound(_)));
    }

    #[test]
    fn persist_then_load_round_trips_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = AppPaths::in_dir(dir.path().join("data"));

        let kb = small_kb();
        let before = kb.index().search(&[0.9, 0.2], 2);
        kb.persist(&paths).expect("persist");

        let leftovers: Vec<_> = std::fs::read_dir(&paths.data_dir)
            .expect("read_dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());

        let loaded = KnowledgeBase::load(&paths).expect("load");
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.index().search(&[0.9, 0.2], 2), before);
        assert_eq!(loaded.corpus().get(0).unwrap().text, "alpha");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
