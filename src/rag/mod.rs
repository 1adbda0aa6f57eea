//! Retrieval-augmented answering.
//!
//! - `Retriever`: query embedding + nearest-neighbor search + corpus lookup
//! - `Synthesizer`: context assembly + one completion + post-processing
//! - `AnswerService`: the never-fails `answer(question) -> String` contract

mod retriever;
mod service;
mod synthesizer;

pub use retriever::Retriever;
pub use service::AnswerService;
pub use synthesizer::{Synthesizer, NO_CONTEXT_REPLY};
