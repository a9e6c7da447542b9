// ============================================================================
// Storefront API - Logout Handler
// File: crates/storefront-api/src/handlers/logout.rs
// ============================================================================

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use storefront_security::SessionCookie;
use tracing::error;

use crate::context::ClientContext;
use crate::state::AppState;

/// Logout handler - GET|POST /logout
///
/// Always answers 302 to the landing page, whatever happened to the session
/// store or the audit log along the way.
pub async fn logout(State(state): State<AppState>, client: ClientContext) -> Response {
    state
        .logout
        .logout(client.session_id.as_ref(), client.source_ip)
        .await;

    let mut headers = HeaderMap::new();

    if state.session_settings.use_cookies {
        let cookie = SessionCookie::new(&state.session_settings).expire();
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                headers.insert(header::SET_COOKIE, value);
            }
            Err(e) => error!("Could not build expired session cookie: {}", e),
        }
    }

    match HeaderValue::from_str(&state.session_settings.logout_redirect) {
        Ok(location) => {
            headers.insert(header::LOCATION, location);
        }
        Err(e) => error!("Invalid logout redirect target: {}", e),
    }

    (StatusCode::FOUND, headers).into_response()
}
