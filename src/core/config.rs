//! Paths and settings.
//!
//! `AppPaths` decides where the persisted knowledge base and logs live.
//! `Settings` is the typed view of `config.yml`, with secrets pulled from
//! the environment so they never land in the config file.

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::KbError;

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Binary vector artifact.
    pub index_path: PathBuf,
    /// JSON document-metadata artifact, positionally aligned with the index.
    pub corpus_path: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let data_dir = env::var("ANSWERDESK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        Self::in_dir(data_dir)
    }

    /// Root all artifacts under `data_dir` (tests point this at a tempdir).
    pub fn in_dir(data_dir: PathBuf) -> Self {
        let log_dir = data_dir.join("logs");
        let index_path = data_dir.join("support_index.bin");
        let corpus_path = data_dir.join("support_corpus.json");

        for dir in [&data_dir, &log_dir] {
            let _ = fs::create_dir_all(dir);
        }

        AppPaths {
            data_dir,
            log_dir,
            index_path,
            corpus_path,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub retrieval: RetrievalSettings,
    pub synthesizer: SynthesizerSettings,
    pub embedding: EmbeddingSettings,
    pub completion: CompletionSettings,
    pub sources: SourceSettings,
    pub openai: OpenAiSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            retrieval: RetrievalSettings::default(),
            synthesizer: SynthesizerSettings::default(),
            embedding: EmbeddingSettings::default(),
            completion: CompletionSettings::default(),
            sources: SourceSettings::default(),
            openai: OpenAiSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of nearest documents handed to the synthesizer.
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesizerSettings {
    /// Per-document character cap inside the context window.
    pub context_doc_chars: usize,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for SynthesizerSettings {
    fn default() -> Self {
        Self {
            context_doc_chars: 1000,
            max_tokens: 300,
            temperature: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Caller-side truncation budget before any embed call.
    pub input_chars: usize,
    pub model: String,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            input_chars: 8000,
            model: "text-embedding-3-small".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    pub model: String,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
        }
    }
}

/// Document sources for the index builder. A `None` section disables
/// that source; a build with every source disabled fails as EmptyCorpus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub docs_dir: Option<PathBuf>,
    pub pdf_dir: Option<PathBuf>,
    pub confluence: Option<ConfluenceSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfluenceSettings {
    pub base_url: String,
    pub space_key: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(skip)]
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    pub base_url: String,
    #[serde(skip)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Load `config.yml` (path overridable via `ANSWERDESK_CONFIG_PATH`),
    /// falling back to defaults when the file is absent, then pull secrets
    /// from the environment.
    pub fn load() -> Result<Self, KbError> {
        let path = env::var("ANSWERDESK_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.yml"));

        let mut settings = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_yaml::from_str(&raw)
                .map_err(|e| KbError::Config(format!("{}: {}", path.display(), e)))?
        } else {
            Settings::default()
        };

        settings.openai.api_key = env::var("OPENAI_API_KEY").ok();
        if let Some(confluence) = settings.sources.confluence.as_mut() {
            confluence.api_token = env::var("CONFLUENCE_API_TOKEN").ok();
            if confluence.email.is_none() {
                confluence.email = env::var("CONFLUENCE_EMAIL").ok();
            }
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.retrieval.top_k, 3);
        assert_eq!(settings.synthesizer.context_doc_chars, 1000);
        assert_eq!(settings.embedding.input_chars, 8000);
        assert_eq!(settings.synthesizer.max_tokens, 300);
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let settings: Settings =
            serde_yaml::from_str("retrieval:\n  top_k: 5\n").expect("valid yaml");
        assert_eq!(settings.retrieval.top_k, 5);
        assert_eq!(settings.synthesizer.context_doc_chars, 1000);
    }
}
