use std::env;

use anyhow::Context;
use tokio::net::TcpListener;

use answerdesk::core::config::{AppPaths, Settings};
use answerdesk::ingest;
use answerdesk::kb::IndexBuilder;
use answerdesk::llm::OpenAiClient;
use answerdesk::logging;
use answerdesk::server::router::router;
use answerdesk::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let paths = AppPaths::new();
    logging::init(&paths);

    match env::args().nth(1).as_deref() {
        Some("build") => build(&paths).await,
        Some(other) => anyhow::bail!("unknown command `{other}`; usage: answerdesk [build]"),
        None => serve().await,
    }
}

/// Ingest all configured sources, embed, and persist the index pair.
async fn build(paths: &AppPaths) -> anyhow::Result<()> {
    let settings = Settings::load()?;
    let client = OpenAiClient::new(
        &settings.openai,
        &settings.embedding,
        &settings.completion,
        &settings.synthesizer,
    )?;

    let documents = ingest::collect_documents(&settings.sources).await?;
    let builder = IndexBuilder::new(settings.embedding.input_chars);
    let kb = builder.build(documents, &client).await?;
    kb.persist(paths)?;

    println!("Indexed {} documents.", kb.len());
    Ok(())
}

async fn serve() -> anyhow::Result<()> {
    let state = AppState::initialize().context("startup failed")?;

    let port = env::var("PORT")
        .ok()
        .and_then(|val| val.parse::<u16>().ok())
        .unwrap_or(8080);
    let bind_addr = format!("127.0.0.1:{port}");

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {bind_addr}"))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let app = router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
