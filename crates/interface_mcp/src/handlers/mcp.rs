//! `POST /mcp`: JSON-RPC over HTTP
//!
//! Each request body is one JSON-RPC message. Notifications are answered
//! with `202 Accepted` and no body. A successful `initialize` carries a fresh
//! `Mcp-Session-Id`; the server keeps no session state, so later requests
//! are not checked against it.

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::protocol::JsonRpcResponse;
use crate::AppState;

/// Header carrying the session id issued on `initialize`
pub const SESSION_HEADER: &str = "mcp-session-id";

pub async fn handle_mcp(State(state): State<AppState>, body: String) -> Response {
    let Some(response) = state.server.handle_message(&body).await else {
        return StatusCode::ACCEPTED.into_response();
    };

    let issue_session = is_initialize_result(&response);
    let mut http_response = Json(response).into_response();

    if issue_session {
        if let Ok(value) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
            http_response.headers_mut().insert(SESSION_HEADER, value);
        }
    }

    http_response
}

/// Only a successful `initialize` result carries `protocolVersion`
fn is_initialize_result(response: &JsonRpcResponse) -> bool {
    response.error.is_none()
        && response
            .result
            .as_ref()
            .is_some_and(|result| result.get("protocolVersion").is_some())
}
