use std::sync::{Arc, RwLock};

use crate::core::config::{AppPaths, Settings};
use crate::core::errors::KbError;
use crate::ingest;
use crate::kb::{IndexBuilder, KnowledgeBase};
use crate::llm::provider::EmbeddingProvider;
use crate::llm::OpenAiClient;
use crate::rag::AnswerService;

/// Process-wide state for serve mode.
///
/// The knowledge base is the only shared mutable resource: queries take a
/// cheap `Arc` snapshot and never hold the lock across I/O, and a rebuild
/// publishes a whole new instance with a single swap, so no in-flight
/// query can observe a torn (index, corpus) pair.
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub settings: Settings,
    pub service: AnswerService,
    embedder: Arc<dyn EmbeddingProvider>,
    kb: RwLock<Arc<KnowledgeBase>>,
}

impl AppState {
    pub fn initialize() -> Result<Arc<Self>, KbError> {
        let paths = Arc::new(AppPaths::new());
        let settings = Settings::load()?;

        // Fail fast when the build step has never run; serving must not
        // trigger a build as a side effect.
        let kb = Arc::new(KnowledgeBase::load(&paths)?);
        tracing::info!(documents = kb.len(), "knowledge base loaded");

        let client = Arc::new(OpenAiClient::new(
            &settings.openai,
            &settings.embedding,
            &settings.completion,
            &settings.synthesizer,
        )?);
        let service = AnswerService::new(&settings, client.clone(), client.clone());

        Ok(Arc::new(AppState {
            paths,
            settings,
            service,
            embedder: client,
            kb: RwLock::new(kb),
        }))
    }

    /// Current knowledge-base snapshot.
    pub fn kb(&self) -> Arc<KnowledgeBase> {
        self.kb
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Rebuild from all configured sources, persist, and swap the new pair
    /// in. A failed build leaves the active pair untouched.
    pub async fn rebuild(&self) -> Result<usize, KbError> {
        let documents = ingest::collect_documents(&self.settings.sources).await?;
        let builder = IndexBuilder::new(self.settings.embedding.input_chars);
        let rebuilt = builder.build(documents, self.embedder.as_ref()).await?;
        rebuilt.persist(&self.paths)?;

        let count = rebuilt.len();
        let mut guard = self
            .kb
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(rebuilt);

        tracing::info!(documents = count, "knowledge base rebuilt and swapped in");
        Ok(count)
    }
}
