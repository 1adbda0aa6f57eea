//! Query-time retrieval.

use crate::core::errors::KbError;
use crate::kb::{truncate_chars, DocumentRecord, KnowledgeBase};
use crate::llm::provider::EmbeddingProvider;

pub struct Retriever {
    top_k: usize,
    embed_input_chars: usize,
}

impl Retriever {
    pub fn new(top_k: usize, embed_input_chars: usize) -> Self {
        Self {
            top_k,
            embed_input_chars,
        }
    }

    /// Embed the query, search the index, and resolve hits to documents,
    /// nearest first.
    ///
    /// An embedding failure is returned as an error so callers can tell
    /// "couldn't even search" apart from "no relevant documents". A hit
    /// whose position is missing from the corpus store is skipped, not
    /// fatal; the result may therefore be shorter than `top_k`.
    pub async fn retrieve(
        &self,
        kb: &KnowledgeBase,
        embedder: &dyn EmbeddingProvider,
        query: &str,
    ) -> Result<Vec<DocumentRecord>, KbError> {
        let input = truncate_chars(query, self.embed_input_chars);
        let query_vec = embedder.embed(input).await?;

        let hits = kb.index().search(&query_vec, self.top_k);
        let mut documents = Vec::with_capacity(hits.len());

        for (position, distance) in hits {
            match kb.corpus().get(position) {
                Some(record) => {
                    tracing::debug!(position, distance, source = %record.source_id, "retrieved");
                    documents.push(record.clone());
                }
                None => {
                    tracing::warn!(position, "index position missing from corpus store, skipping");
                }
            }
        }

        Ok(documents)
    }
}
