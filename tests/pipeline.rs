//! End-to-end pipeline tests with stub providers: build an index, persist
//! it, retrieve against the loaded copy, and synthesize an answer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use answerdesk::core::config::{AppPaths, Settings};
use answerdesk::core::errors::KbError;
use answerdesk::kb::{DocumentRecord, IndexBuilder, KnowledgeBase};
use answerdesk::llm::provider::{CompletionProvider, EmbeddingProvider};
use answerdesk::rag::{AnswerService, Retriever};

/// Returns the same vector for every text, so the one indexed document is
/// always the nearest neighbor of any query.
struct ConstantEmbedder {
    calls: AtomicUsize,
}

impl ConstantEmbedder {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for ConstantEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, KbError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0.25, 0.5, 0.25])
    }
}

struct DownEmbedder;

#[async_trait]
impl EmbeddingProvider for DownEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, KbError> {
        Err(KbError::Provider("embedding service unreachable".to_string()))
    }
}

struct ScriptedCompletion {
    reply: &'static str,
    calls: AtomicUsize,
}

impl ScriptedCompletion {
    fn new(reply: &'static str) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    async fn complete(&self, system: &str, user: &str) -> Result<String, KbError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(system.contains("Reset your VPN"), "context missing from system prompt");
        assert_eq!(user, "how do I fix my VPN");
        Ok(self.reply.to_string())
    }
}

fn vpn_document() -> DocumentRecord {
    DocumentRecord {
        source_id: "PDF: a.pdf".to_string(),
        text: "Reset your VPN by opening settings and clicking reconnect.".to_string(),
    }
}

async fn build_vpn_kb(embedder: &ConstantEmbedder) -> KnowledgeBase {
    IndexBuilder::new(8000)
        .build(vec![vpn_document()], embedder)
        .await
        .expect("build")
}

#[tokio::test]
async fn vpn_question_is_answered_from_the_indexed_document() {
    let embedder = ConstantEmbedder::new();
    let kb = build_vpn_kb(&embedder).await;

    // Persist and reload so the query path runs against the on-disk form.
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = AppPaths::in_dir(dir.path().join("data"));
    kb.persist(&paths).expect("persist");
    let kb = KnowledgeBase::load(&paths).expect("load");
    assert_eq!(kb.len(), 1);

    let retriever = Retriever::new(3, 8000);
    let docs = retriever
        .retrieve(&kb, &embedder, "how do I fix my VPN")
        .await
        .expect("retrieve");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].source_id, "PDF: a.pdf");

    let completion =
        ScriptedCompletion::new("Open settings, click reconnect.\nNeed more help? Just ask!");
    let service = AnswerService::new(
        &Settings::default(),
        Arc::new(ConstantEmbedder::new()),
        Arc::new(completion),
    );

    let answer = service.answer(&kb, "how do I fix my VPN").await;
    assert_eq!(answer, "Open settings, click reconnect.\nNeed more help? Just ask!");
}

#[tokio::test]
async fn retrieval_surfaces_an_error_when_embedding_is_down() {
    let embedder = ConstantEmbedder::new();
    let kb = build_vpn_kb(&embedder).await;

    let retriever = Retriever::new(3, 8000);
    let err = retriever
        .retrieve(&kb, &DownEmbedder, "how do I fix my VPN")
        .await
        .unwrap_err();

    assert!(matches!(err, KbError::Provider(_)));
}

#[tokio::test]
async fn search_ordering_survives_a_save_load_cycle() {
    let embedder = ConstantEmbedder::new();
    let kb = build_vpn_kb(&embedder).await;

    let query = vec![0.2, 0.6, 0.2];
    let before = kb.index().search(&query, 3);

    let dir = tempfile::tempdir().expect("tempdir");
    let paths = AppPaths::in_dir(dir.path().join("data"));
    kb.persist(&paths).expect("persist");
    let loaded = KnowledgeBase::load(&paths).expect("load");

    assert_eq!(loaded.index().search(&query, 3), before);
}
