//! Confluence space fetcher.
//!
//! Pulls every page in the configured space through the paginated content
//! API with email + API-token basic auth. A non-success response degrades
//! to zero documents from this source; the other sources still build.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::core::config::ConfluenceSettings;
use crate::core::errors::KbError;
use crate::kb::DocumentRecord;

const PAGE_LIMIT: usize = 100;
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct ContentResponse {
    results: Vec<Page>,
}

#[derive(Deserialize)]
struct Page {
    title: String,
    body: Option<PageBody>,
}

#[derive(Deserialize)]
struct PageBody {
    storage: Option<StorageBody>,
}

#[derive(Deserialize)]
struct StorageBody {
    value: String,
}

pub async fn collect(settings: &ConfluenceSettings) -> Result<Vec<DocumentRecord>, KbError> {
    let (Some(email), Some(token)) = (settings.email.as_deref(), settings.api_token.as_deref())
    else {
        tracing::warn!("confluence credentials not set, skipping source");
        return Ok(Vec::new());
    };

    let client = Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(KbError::provider)?;

    let base = settings.base_url.trim_end_matches('/');
    let url = format!("{base}/wiki/rest/api/content");
    let mut records = Vec::new();
    let mut start = 0usize;

    loop {
        let res = client
            .get(&url)
            .basic_auth(email, Some(token))
            .header("Accept", "application/json")
            .query(&[
                ("spaceKey", settings.space_key.as_str()),
                ("expand", "body.storage"),
                ("limit", &PAGE_LIMIT.to_string()),
                ("start", &start.to_string()),
            ])
            .send()
            .await;

        let res = match res {
            Ok(res) if res.status().is_success() => res,
            Ok(res) => {
                tracing::warn!(status = %res.status(), "confluence fetch failed, skipping source");
                return Ok(Vec::new());
            }
            Err(e) => {
                tracing::warn!("confluence unreachable, skipping source: {e}");
                return Ok(Vec::new());
            }
        };

        let payload: ContentResponse = res.json().await.map_err(KbError::provider)?;
        let batch = payload.results.len();

        for page in payload.results {
            let body = page
                .body
                .and_then(|b| b.storage)
                .map(|s| s.value)
                .unwrap_or_default();
            records.push(DocumentRecord {
                source_id: format!("Confluence: {}", page.title),
                text: body,
            });
        }

        // A short batch means the cursor is exhausted.
        if batch < PAGE_LIMIT {
            break;
        }
        start += PAGE_LIMIT;
    }

    tracing::info!(pages = records.len(), "fetched confluence space");
    Ok(records)
}
