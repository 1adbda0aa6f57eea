//! The query-serving contract: `answer(question) -> String`, never fails.
//!
//! The chat surface posts whatever comes back verbatim, so every failure
//! mode has to resolve to a user-safe string here.

use std::sync::Arc;

use crate::core::config::Settings;
use crate::kb::KnowledgeBase;
use crate::llm::provider::{CompletionProvider, EmbeddingProvider};

use super::retriever::Retriever;
use super::synthesizer::{Synthesizer, NO_CONTEXT_REPLY};

const SEARCH_DOWN_REPLY: &str =
    "Sorry, I can't search the knowledge base right now. Please try again in a moment.";

pub struct AnswerService {
    retriever: Retriever,
    synthesizer: Synthesizer,
    embedder: Arc<dyn EmbeddingProvider>,
    completion: Arc<dyn CompletionProvider>,
}

impl AnswerService {
    pub fn new(
        settings: &Settings,
        embedder: Arc<dyn EmbeddingProvider>,
        completion: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            retriever: Retriever::new(settings.retrieval.top_k, settings.embedding.input_chars),
            synthesizer: Synthesizer::new(&settings.synthesizer),
            embedder,
            completion,
        }
    }

    /// One embedding call, one index search, one completion call.
    /// The knowledge base is read-only here; concurrent questions each get
    /// their own snapshot from the owner and never contend.
    pub async fn answer(&self, kb: &KnowledgeBase, question: &str) -> String {
        tracing::info!(question, "answering");

        let documents = match self.retriever.retrieve(kb, self.embedder.as_ref(), question).await {
            Ok(documents) => documents,
            Err(e) => {
                tracing::error!("retrieval unavailable: {e}");
                return SEARCH_DOWN_REPLY.to_string();
            }
        };

        if documents.is_empty() {
            return NO_CONTEXT_REPLY.to_string();
        }

        self.synthesizer
            .synthesize(&documents, question, self.completion.as_ref())
            .await
    }
}
