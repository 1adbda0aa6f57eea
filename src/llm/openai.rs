//! OpenAI-backed embedding and completion client.
//!
//! Single `reqwest::Client` with a bounded per-request timeout, so a hung
//! upstream call fails that one query instead of stalling the process.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::provider::{CompletionProvider, EmbeddingProvider};
use crate::core::config::{CompletionSettings, EmbeddingSettings, OpenAiSettings, SynthesizerSettings};
use crate::core::errors::KbError;

#[derive(Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    embedding_model: String,
    completion_model: String,
    temperature: f64,
    max_tokens: u32,
    client: Client,
}

impl OpenAiClient {
    pub fn new(
        openai: &OpenAiSettings,
        embedding: &EmbeddingSettings,
        completion: &CompletionSettings,
        synthesizer: &SynthesizerSettings,
    ) -> Result<Self, KbError> {
        let api_key = openai
            .api_key
            .clone()
            .ok_or_else(|| KbError::Config("OPENAI_API_KEY is not set".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(openai.timeout_secs))
            .build()
            .map_err(KbError::provider)?;

        Ok(Self {
            base_url: openai.base_url.trim_end_matches('/').to_string(),
            api_key,
            embedding_model: embedding.model.clone(),
            completion_model: completion.model.clone(),
            temperature: synthesizer.temperature,
            max_tokens: synthesizer.max_tokens,
            client,
        })
    }
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, KbError> {
        let url = format!("{}/v1/embeddings", self.base_url);
        let body = json!({
            "model": self.embedding_model,
            "input": text,
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(KbError::provider)?;

        if !res.status().is_success() {
            let status = res.status();
            let detail = res.text().await.unwrap_or_default();
            return Err(KbError::Provider(format!(
                "embeddings request failed ({}): {}",
                status, detail
            )));
        }

        let payload: EmbeddingsResponse = res.json().await.map_err(KbError::provider)?;
        let item = payload
            .data
            .into_iter()
            .next()
            .ok_or_else(|| KbError::Provider("embeddings response had no data".to_string()))?;

        if item.embedding.is_empty() {
            return Err(KbError::Provider(
                "embeddings response had an empty vector".to_string(),
            ));
        }

        Ok(item.embedding)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, KbError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = json!({
            "model": self.completion_model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(KbError::provider)?;

        if !res.status().is_success() {
            let status = res.status();
            let detail = res.text().await.unwrap_or_default();
            return Err(KbError::Provider(format!(
                "chat completion failed ({}): {}",
                status, detail
            )));
        }

        let payload: ChatResponse = res.json().await.map_err(KbError::provider)?;
        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| KbError::Provider("completion response had no content".to_string()))?;

        Ok(content.trim().to_string())
    }
}
