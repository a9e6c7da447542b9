//! Per-request client context: session id and source address

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use storefront_core::SessionId;
use storefront_security::{read_cookie, SessionCookie};
use storefront_shared::constants::SESSION_ID_HEADER;
use tracing::debug;

use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct ClientContext {
    pub session_id: Option<SessionId>,
    pub source_ip: Option<IpAddr>,
}

impl FromRequestParts<AppState> for ClientContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session_id = if state.session_settings.use_cookies {
            let cookie = SessionCookie::new(&state.session_settings);
            session_id_from_headers(&parts.headers, cookie.name())
        } else {
            session_id_from_id_header(&parts.headers)
        };

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let source_ip = if state.trust_proxy_headers {
            forwarded_ip(&parts.headers).or(peer)
        } else {
            peer
        };

        Ok(Self {
            session_id,
            source_ip,
        })
    }
}

/// Reads the session token from every `Cookie` header; malformed values are ignored.
pub fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| read_cookie(value, cookie_name))
        .and_then(|raw| {
            let parsed = SessionId::parse(raw);
            if parsed.is_none() {
                debug!("Ignoring malformed session cookie");
            }
            parsed
        })
}

/// Reads the session token from the `X-Session-Id` header.
pub fn session_id_from_id_header(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get(SESSION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|raw| SessionId::parse(raw.trim()))
}

/// First hop of `X-Forwarded-For`, falling back to `X-Real-IP`.
pub fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse().ok());

    forwarded.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    })
}
