use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use portkv_bridge::Dispatcher;
use portkv_protocol::PortMessage;
use portkv_store::StorageBackend;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ServerError, ServerResult};

pub type SharedDispatcher = Arc<Mutex<Dispatcher<Arc<dyn StorageBackend>>>>;

/// Router state. One lock guards the dispatcher so read-modify-write commands
/// never interleave.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: SharedDispatcher,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher<Arc<dyn StorageBackend>>) -> Self {
        Self {
            dispatcher: Arc::new(Mutex::new(dispatcher)),
        }
    }
}

/// Health check response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Lists the inbound ports this host accepts.
pub async fn ports_handler(State(state): State<AppState>) -> ServerResult<Json<Vec<&'static str>>> {
    let dispatcher = state
        .dispatcher
        .lock()
        .map_err(|_| ServerError::Internal("dispatcher lock poisoned".into()))?;
    Ok(Json(dispatcher.channels()))
}

/// Runs one command. The request body is the port payload; an empty body is
/// `null`. Answers with the response message, or `204 No Content` when the
/// command deliberately produces no response.
pub async fn port_handler(
    State(state): State<AppState>,
    Path(port): Path<String>,
    body: Bytes,
) -> ServerResult<Response> {
    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| ServerError::BadRequest(e.to_string()))?
    };

    let mut outbox: Vec<PortMessage> = Vec::with_capacity(1);
    {
        let dispatcher = state
            .dispatcher
            .lock()
            .map_err(|_| ServerError::Internal("dispatcher lock poisoned".into()))?;
        dispatcher.dispatch(PortMessage::new(port, payload), &mut outbox)?;
    }

    Ok(match outbox.pop() {
        Some(message) => (StatusCode::OK, Json(message)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
