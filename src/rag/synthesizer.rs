//! Answer synthesis.
//!
//! Builds a bounded context window from the retrieved documents, makes one
//! completion call, and cleans up the output. This component never returns
//! an error: every failure mode resolves to a string the chat surface can
//! post as-is.

use crate::core::config::SynthesizerSettings;
use crate::kb::{truncate_chars, DocumentRecord};
use crate::llm::provider::CompletionProvider;

pub const NO_CONTEXT_REPLY: &str =
    "I couldn't find relevant information in my knowledge base.";

pub struct Synthesizer {
    context_doc_chars: usize,
}

impl Synthesizer {
    pub fn new(settings: &SynthesizerSettings) -> Self {
        Self {
            context_doc_chars: settings.context_doc_chars,
        }
    }

    pub async fn synthesize(
        &self,
        documents: &[DocumentRecord],
        question: &str,
        completion: &dyn CompletionProvider,
    ) -> String {
        if documents.is_empty() {
            return NO_CONTEXT_REPLY.to_string();
        }

        let context = self.build_context(documents);
        let system = system_prompt(&context);

        match completion.complete(&system, question).await {
            Ok(raw) => dedup_lines(&raw),
            Err(e) => {
                tracing::error!("completion failed: {e}");
                format!("Sorry, I encountered an error: {e}")
            }
        }
    }

    /// Concatenate document texts in retrieval order (nearest first), each
    /// capped to the per-document budget, blank-line separated.
    fn build_context(&self, documents: &[DocumentRecord]) -> String {
        documents
            .iter()
            .map(|doc| truncate_chars(&doc.text, self.context_doc_chars))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn system_prompt(context: &str) -> String {
    format!(
        "You are a helpful IT support bot. Use the context below to answer the user's question.\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         IMPORTANT FORMATTING RULES:\n\
         - Keep responses concise and under 200 words\n\
         - Use bullet points for step-by-step instructions\n\
         - Use clear headings when needed\n\
         - Avoid repeating information\n\
         - Be direct and helpful\n\
         - If multiple solutions exist, present the main one first\n\
         - End with \"Need more help? Just ask!\" if appropriate"
    )
}

/// Drop lines whose trimmed content exactly duplicates an earlier line,
/// keeping first occurrences in order. Blank lines are dropped outright;
/// the formatting rules already forbid filler and the chat surface renders
/// the answer as a compact block.
fn dedup_lines(raw: &str) -> String {
    let mut seen = std::collections::HashSet::new();
    raw.lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && seen.insert(trimmed.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::core::errors::KbError;

    struct CountingCompletion {
        reply: String,
        calls: AtomicUsize,
    }

    impl CountingCompletion {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for CountingCompletion {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, KbError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    struct DownCompletion;

    #[async_trait]
    impl CompletionProvider for DownCompletion {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, KbError> {
            Err(KbError::Provider("rate limited".to_string()))
        }
    }

    fn doc(text: &str) -> DocumentRecord {
        DocumentRecord {
            source_id: "File: doc.txt".to_string(),
            text: text.to_string(),
        }
    }

    fn synthesizer() -> Synthesizer {
        Synthesizer::new(&SynthesizerSettings::default())
    }

    #[tokio::test]
    async fn empty_documents_short_circuit_without_a_provider_call() {
        let completion = CountingCompletion::new("unused");
        let answer = synthesizer()
            .synthesize(&[], "any question", &completion)
            .await;

        assert_eq!(answer, NO_CONTEXT_REPLY);
        assert_eq!(completion.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn duplicate_lines_are_dropped_first_occurrence_wins() {
        let completion = CountingCompletion::new("Step 1\nStep 2\nStep 1\nDone");
        let answer = synthesizer()
            .synthesize(&[doc("context")], "question", &completion)
            .await;
        assert_eq!(answer, "Step 1\nStep 2\nDone");
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_an_apology_string() {
        let answer = synthesizer()
            .synthesize(&[doc("context")], "question", &DownCompletion)
            .await;
        assert!(answer.starts_with("Sorry, I encountered an error:"));
        assert!(answer.contains("rate limited"));
    }

    #[tokio::test]
    async fn context_caps_each_document_and_preserves_order() {
        let synthesizer = Synthesizer::new(&SynthesizerSettings {
            context_doc_chars: 5,
            ..SynthesizerSettings::default()
        });

        let context =
            synthesizer.build_context(&[doc("aaaaaaaaaa"), doc("bb")]);
        assert_eq!(context, "aaaaa\n\nbb");
    }

    #[test]
    fn dedup_is_case_sensitive() {
        assert_eq!(dedup_lines("Step\nstep\nStep"), "Step\nstep");
    }

    #[test]
    fn dedup_drops_blank_lines() {
        assert_eq!(dedup_lines("A\n\nB\n\nA"), "A\nB");
        assert_eq!(dedup_lines("A\n  \nB"), "A\nB");
    }
}
