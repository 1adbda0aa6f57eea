//! Whole-corpus index builder.
//!
//! Ordinal alignment is the load-bearing invariant: document N in the
//! corpus store owns vector N in the index, and the two are appended in
//! lockstep. Any embedding failure aborts the build; a partially embedded
//! corpus is never published.

use super::corpus::{CorpusStore, DocumentRecord};
use super::vector_index::VectorIndex;
use super::{truncate_chars, KnowledgeBase};
use crate::core::errors::KbError;
use crate::llm::provider::EmbeddingProvider;

pub struct IndexBuilder {
    /// Character budget applied to each document before embedding.
    embed_input_chars: usize,
}

impl IndexBuilder {
    pub fn new(embed_input_chars: usize) -> Self {
        Self { embed_input_chars }
    }

    /// Embed every document and produce an aligned (index, corpus) pair.
    /// Zero documents is a fatal build error, not an empty knowledge base.
    pub async fn build(
        &self,
        documents: Vec<DocumentRecord>,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<KnowledgeBase, KbError> {
        if documents.is_empty() {
            return Err(KbError::EmptyCorpus);
        }

        let total = documents.len();
        let mut index = VectorIndex::new();
        let mut corpus = CorpusStore::new();

        for (n, record) in documents.into_iter().enumerate() {
            tracing::info!(
                source = %record.source_id,
                "embedding document {}/{}",
                n + 1,
                total
            );

            let input = truncate_chars(&record.text, self.embed_input_chars);
            let vector = embedder.embed(input).await.map_err(|e| {
                KbError::Provider(format!(
                    "build aborted while embedding {}: {}",
                    record.source_id, e
                ))
            })?;

            index.add(&[vector])?;
            corpus.push(record);
        }

        KnowledgeBase::from_parts(index, corpus)
    }
}
