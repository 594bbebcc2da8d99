//! Chat handlers: run one utterance (plus caller-supplied history) through the
//! dialogue engine and wrap the classification for the chat widget.
//!
//! The gateway keeps no session state. Clients echo earlier turns back in
//! `conversationHistory`; each turn is decoded on its own so a malformed turn
//! is ignored rather than rejecting the request.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use preadmit_core::ConversationTurn;
use serde::Deserialize;
use tracing::Instrument;

use crate::AppState;

/// Body of `POST /api/chatbot/message` and `POST /api/chat`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MessageRequest {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    session_id: Option<serde_json::Value>,
    #[serde(default)]
    user_id: Option<serde_json::Value>,
    #[serde(default)]
    conversation_history: Option<serde_json::Value>,
}

/// Decodes history turns one by one; anything unreadable becomes an empty turn.
pub(crate) fn lenient_history(raw: Option<serde_json::Value>) -> Vec<ConversationTurn> {
    match raw {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    }
}

fn missing_message() -> Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(serde_json::json!({
            "error": "Message is required",
            "timestamp": super::timestamp(),
        })),
    )
        .into_response()
}

/// Extracts the message or answers 400.
fn accept(payload: Result<Json<MessageRequest>, JsonRejection>) -> Result<(String, MessageRequest), Response> {
    let Json(mut req) = payload.map_err(|rejection| {
        tracing::warn!("Rejected chat body: {}", rejection.body_text());
        missing_message()
    })?;
    let message = req.message.take().ok_or_else(missing_message)?;
    Ok((message, req))
}

/// POST /api/chatbot/message – full classification with passthrough identifiers.
pub(crate) async fn message(
    State(state): State<AppState>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Response {
    let (message, req) = match accept(payload) {
        Ok(accepted) => accepted,
        Err(response) => return response,
    };
    let history = lenient_history(req.conversation_history);
    let span = tracing::info_span!("chat_message", request_id = %uuid::Uuid::new_v4());

    async move {
        tracing::info!("Message received: {} chars, {} history turns", message.len(), history.len());
        let result = state.engine.classify(&message, &history);
        tracing::info!(category = %result.category, confidence = result.confidence, "Message classified");

        axum::Json(serde_json::json!({
            "user_message": message,
            "bot_response": result.response_text,
            "category": result.category,
            "confidence": result.confidence,
            "intent": result.intent,
            "entities": result.entities,
            "state": result.state,
            "session_id": req.session_id,
            "user_id": req.user_id,
            "timestamp": super::timestamp(),
        }))
        .into_response()
    }
    .instrument(span)
    .await
}

/// POST /api/chat – compact variant returning only the reply text.
pub(crate) async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Response {
    let (message, req) = match accept(payload) {
        Ok(accepted) => accepted,
        Err(response) => return response,
    };
    let history = lenient_history(req.conversation_history);
    let result = state.engine.classify(&message, &history);
    tracing::debug!(category = %result.category, "Compact chat answered");
    axum::Json(serde_json::json!({ "response": result.response_text })).into_response()
}
