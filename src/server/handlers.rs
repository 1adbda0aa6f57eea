use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::KbError;
use crate::state::AppState;

impl IntoResponse for KbError {
    fn into_response(self) -> Response {
        let status = match &self {
            KbError::Provider(_) => StatusCode::BAD_GATEWAY,
            KbError::EmptyCorpus => StatusCode::UNPROCESSABLE_ENTITY,
            KbError::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "documents": state.kb().len(),
    }))
}

#[derive(Deserialize)]
pub struct AnswerRequest {
    pub question: String,
}

/// The hand-off point for the external chat collaborator: always 200, the
/// body is whatever the answer service resolved the question to.
pub async fn answer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnswerRequest>,
) -> Result<impl IntoResponse, KbError> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(KbError::Config("question must not be blank".to_string()));
    }

    let kb = state.kb();
    let answer = state.service.answer(&kb, question).await;
    Ok(Json(json!({ "answer": answer })))
}

pub async fn rebuild(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, KbError> {
    let documents = state.rebuild().await?;
    Ok(Json(json!({ "status": "rebuilt", "documents": documents })))
}
