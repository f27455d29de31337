use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use albumdrop_core::SanitizedConfig;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::metrics::{encode_metrics, EVENTS_RECEIVED};
use crate::onebot::{Event, MessageType};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}

/// Receive an event from the bot host.
///
/// Always answers 204 without waiting for the command: the dispatcher runs
/// on its own task so a slow search or login check never holds the host's
/// request open. Events we cannot interpret are ignored, not rejected.
pub async fn post_event(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> StatusCode {
    let event = match serde_json::from_value::<Event>(body) {
        Ok(event) => event,
        Err(e) => {
            debug!("Ignoring unrecognised event: {}", e);
            EVENTS_RECEIVED.with_label_values(&["ignored"]).inc();
            return StatusCode::NO_CONTENT;
        }
    };

    let Event::Message(message) = event else {
        EVENTS_RECEIVED.with_label_values(&["ignored"]).inc();
        return StatusCode::NO_CONTENT;
    };

    let Some(ctx) = message.context() else {
        warn!(user_id = message.user_id, "Group message without group_id, ignoring");
        EVENTS_RECEIVED.with_label_values(&["ignored"]).inc();
        return StatusCode::NO_CONTENT;
    };

    let kind = match message.message_type {
        MessageType::Private => "private",
        MessageType::Group => "group",
    };
    EVENTS_RECEIVED.with_label_values(&[kind]).inc();

    let dispatcher = state.dispatcher();
    let text = message.raw_message;
    tokio::spawn(async move {
        dispatcher.handle(ctx, &text).await;
    });

    StatusCode::NO_CONTENT
}
