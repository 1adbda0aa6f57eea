//! answerdesk: retrieval-augmented support answering.
//!
//! Offline, `build` ingests documents from the configured sources, embeds
//! each one, and persists an aligned (vector index, corpus store) pair. At
//! serve time a question is embedded, matched against the index, and the
//! nearest documents are handed to a completion model to synthesize a
//! grounded answer.

pub mod core;
pub mod ingest;
pub mod kb;
pub mod llm;
pub mod logging;
pub mod rag;
pub mod server;
pub mod state;
