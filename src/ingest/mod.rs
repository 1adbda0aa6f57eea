//! Document sources.
//!
//! Each source reduces to "produce (source_id, text) pairs". A source that
//! yields nothing is fine on its own; the builder rejects the case where
//! every source combined yields nothing.

pub mod confluence;
pub mod pdf_dir;
pub mod text_dir;

use crate::core::config::SourceSettings;
use crate::core::errors::KbError;
use crate::kb::DocumentRecord;

/// Gather documents from every configured source, in a stable order:
/// flat text files, then PDFs, then the wiki space.
pub async fn collect_documents(sources: &SourceSettings) -> Result<Vec<DocumentRecord>, KbError> {
    let mut documents = Vec::new();

    if let Some(dir) = &sources.docs_dir {
        documents.extend(text_dir::collect(dir)?);
    }
    if let Some(dir) = &sources.pdf_dir {
        documents.extend(pdf_dir::collect(dir)?);
    }
    if let Some(settings) = &sources.confluence {
        documents.extend(confluence::collect(settings).await?);
    }

    tracing::info!(documents = documents.len(), "collected documents for indexing");
    Ok(documents)
}
