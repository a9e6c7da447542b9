// ============================================================================
// Storefront API - Session Handlers
// File: crates/storefront-api/src/handlers/session.rs
// ============================================================================
//! Session set / clear (POST /session) and load (GET /session)

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use storefront_core::SessionOutcome;
use storefront_security::SessionCookie;
use storefront_shared::constants::{MESSAGE_SESSION_LOADED, SESSION_ID_HEADER};

use crate::context::ClientContext;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user: Option<Value>,
}

/// Session handler - POST /session
///
/// `{"clear": true}` destroys the session, any other non-empty JSON body is
/// stored under `user`.
pub async fn update_session(
    State(state): State<AppState>,
    client: ClientContext,
    body: Bytes,
) -> Result<Response, ApiError> {
    let outcome = state
        .sessions
        .dispatch(client.session_id.as_ref(), &body)
        .await?;

    let mut response = Json(ApiResponse::ok(outcome.message())).into_response();

    // A new session id has to reach the client, by cookie or by header
    if let SessionOutcome::Updated(id) = &outcome {
        if client.session_id.as_ref() != Some(id) {
            if state.session_settings.use_cookies {
                let cookie = SessionCookie::new(&state.session_settings).issue(id.as_str());
                let value = HeaderValue::from_str(&cookie).map_err(|e| {
                    ApiError::InternalError(format!("invalid session cookie: {}", e))
                })?;
                response.headers_mut().append(header::SET_COOKIE, value);
            } else {
                let value = HeaderValue::from_str(id.as_str()).map_err(|e| {
                    ApiError::InternalError(format!("invalid session id header: {}", e))
                })?;
                response.headers_mut().insert(SESSION_ID_HEADER, value);
            }
        }
    }

    Ok(response)
}

/// Session handler - GET /session
pub async fn show_session(
    State(state): State<AppState>,
    client: ClientContext,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let user = state
        .sessions
        .load_session(client.session_id.as_ref())
        .await?
        .and_then(|data| data.user());

    Ok(Json(ApiResponse::with_data(
        MESSAGE_SESSION_LOADED,
        SessionView { user },
    )))
}
