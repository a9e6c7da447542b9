use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use storefront_shared::constants::SESSION_ID_HEADER;
use tracing::warn;

use crate::handlers::{health, logout, session};
use crate::state::AppState;

pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        // Session routes
        .route("/session", get(session::show_session).post(session::update_session))
        .route("/logout", get(logout::logout).post(logout::logout))
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(SESSION_ID_HEADER)])
        .expose_headers([HeaderName::from_static(SESSION_ID_HEADER)])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use chrono::Duration;
    use serde_json::{json, Value};
    use storefront_core::{
        AuditEntry, AuditError, AuditLogger, LogoutService, SessionId, SessionService, SessionStore,
    };
    use storefront_infrastructure::MemorySessionStore;
    use storefront_shared::config::SessionSettings;
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingAudit {
        entries: Mutex<Vec<AuditEntry>>,
    }

    #[async_trait]
    impl AuditLogger for RecordingAudit {
        async fn log_user_activity(&self, entry: AuditEntry) -> Result<(), AuditError> {
            self.entries.lock().unwrap().push(entry);
            Ok(())
        }
    }

    struct BrokenAudit;

    #[async_trait]
    impl AuditLogger for BrokenAudit {
        async fn log_user_activity(&self, _entry: AuditEntry) -> Result<(), AuditError> {
            Err(AuditError::Unavailable("audit database down".to_string()))
        }
    }

    struct Harness {
        router: Router,
        store: MemorySessionStore,
        sessions: Arc<SessionService>,
    }

    fn harness(audit: Arc<dyn AuditLogger>) -> Harness {
        harness_with(audit, SessionSettings::default())
    }

    fn harness_with(audit: Arc<dyn AuditLogger>, settings: SessionSettings) -> Harness {
        let store = MemorySessionStore::new();
        let sessions = Arc::new(SessionService::new(Arc::new(store.clone()), Duration::minutes(30)));
        let state = AppState {
            sessions: sessions.clone(),
            logout: Arc::new(LogoutService::new(sessions.clone(), audit)),
            session_settings: Arc::new(settings),
            database: None,
            trust_proxy_headers: true,
        };
        Harness {
            router: build_router(state, &[]),
            store,
            sessions,
        }
    }

    fn post_session(body: &str, cookie: Option<&SessionId>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/session")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(id) = cookie {
            builder = builder.header(header::COOKIE, format!("storefront_session={}", id.as_str()));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn logout_request(cookie: Option<&SessionId>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("GET")
            .uri("/logout")
            .header("x-forwarded-for", "203.0.113.7");
        if let Some(id) = cookie {
            builder = builder.header(header::COOKIE, format!("storefront_session={}", id.as_str()));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn issued_session_id(response: &Response) -> SessionId {
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        let token = storefront_security::read_cookie(cookie, "storefront_session").unwrap();
        SessionId::parse(token).unwrap()
    }

    #[tokio::test]
    async fn test_set_session_stores_payload_and_issues_cookie() {
        let h = harness(Arc::new(RecordingAudit::default()));

        let response = h
            .router
            .clone()
            .oneshot(post_session(r#"{"foo":"bar"}"#, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let id = issued_session_id(&response);
        assert_eq!(
            json_body(response).await,
            json!({"success": true, "message": "Session updated"})
        );

        let data = h.sessions.load_session(Some(&id)).await.unwrap().unwrap();
        assert_eq!(data.user(), Some(json!({"foo": "bar"})));
    }

    #[tokio::test]
    async fn test_update_existing_session_keeps_cookie() {
        let h = harness(Arc::new(RecordingAudit::default()));
        let id = h.sessions.set_session(None, &json!({"id": 1})).await.unwrap();

        let response = h
            .router
            .clone()
            .oneshot(post_session(r#"{"id": 2}"#, Some(&id)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let data = h.sessions.load_session(Some(&id)).await.unwrap().unwrap();
        assert_eq!(data.user(), Some(json!({"id": 2})));
    }

    #[tokio::test]
    async fn test_clear_session() {
        let h = harness(Arc::new(RecordingAudit::default()));
        let id = h.sessions.set_session(None, &json!({"id": 1})).await.unwrap();

        let response = h
            .router
            .clone()
            .oneshot(post_session(r#"{"clear": true}"#, Some(&id)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"success": true, "message": "Session cleared"})
        );
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn test_empty_body_is_rejected_without_mutation() {
        let h = harness(Arc::new(RecordingAudit::default()));
        let id = h.sessions.set_session(None, &json!({"id": 1})).await.unwrap();
        let before = h.store.load(&id).await.unwrap();

        let response = h.router.clone().oneshot(post_session("", Some(&id))).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"success": false, "message": "Invalid data"})
        );
        assert_eq!(h.store.load(&id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_show_session() {
        let h = harness(Arc::new(RecordingAudit::default()));
        let id = h.sessions.set_session(None, &json!({"id": 5})).await.unwrap();

        let request = Request::builder()
            .uri("/session")
            .header(header::COOKIE, format!("storefront_session={}", id.as_str()))
            .body(Body::empty())
            .unwrap();
        let response = h.router.clone().oneshot(request).await.unwrap();

        assert_eq!(
            json_body(response).await,
            json!({"success": true, "message": "Session loaded", "user": {"id": 5}})
        );
    }

    #[tokio::test]
    async fn test_logout_scenario() {
        let audit = Arc::new(RecordingAudit::default());
        let h = harness(audit.clone());
        let id = h
            .sessions
            .set_session(None, &json!({"id": 42, "username": "alice"}))
            .await
            .unwrap();

        let response = h.router.clone().oneshot(logout_request(Some(&id))).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/?page=landing&logout=success"
        );
        let cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("storefront_session=;"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        assert!(to_bytes(response.into_body(), usize::MAX).await.unwrap().is_empty());

        assert!(h.store.is_empty());
        let entries = audit.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_id, "42");
        assert_eq!(entries[0].action, "logout");
        assert!(entries[0].message.contains("alice"));
        assert_eq!(entries[0].source_ip, "203.0.113.7");
    }

    #[tokio::test]
    async fn test_logout_twice_is_idempotent() {
        let h = harness(Arc::new(RecordingAudit::default()));
        let id = h.sessions.set_session(None, &json!({"id": 1})).await.unwrap();

        let first = h.router.clone().oneshot(logout_request(Some(&id))).await.unwrap();
        let second = h.router.clone().oneshot(logout_request(Some(&id))).await.unwrap();

        assert_eq!(first.status(), StatusCode::FOUND);
        assert_eq!(second.status(), StatusCode::FOUND);
        assert_eq!(
            first.headers().get(header::SET_COOKIE),
            second.headers().get(header::SET_COOKIE)
        );
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn test_logout_with_failing_audit_still_redirects() {
        let h = harness(Arc::new(BrokenAudit));
        let id = h.sessions.set_session(None, &json!({"id": 1})).await.unwrap();

        let request = Request::builder()
            .method("POST")
            .uri("/logout")
            .header(header::COOKIE, format!("storefront_session={}", id.as_str()))
            .body(Body::empty())
            .unwrap();
        let response = h.router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/?page=landing&logout=success"
        );
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn test_session_id_travels_by_header_without_cookies() {
        let settings = SessionSettings {
            use_cookies: false,
            ..SessionSettings::default()
        };
        let h = harness_with(Arc::new(RecordingAudit::default()), settings);

        let response = h
            .router
            .clone()
            .oneshot(post_session(r#"{"foo":"bar"}"#, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let token = response
            .headers()
            .get(SESSION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();

        // Follow-up writes reuse the echoed id instead of minting new sessions
        let update = Request::builder()
            .method("POST")
            .uri("/session")
            .header(SESSION_ID_HEADER, &token)
            .body(Body::from(r#"{"foo":"baz"}"#))
            .unwrap();
        let response = h.router.clone().oneshot(update).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SESSION_ID_HEADER).is_none());
        assert_eq!(h.store.len(), 1);

        let show = Request::builder()
            .uri("/session")
            .header(SESSION_ID_HEADER, &token)
            .body(Body::empty())
            .unwrap();
        let response = h.router.clone().oneshot(show).await.unwrap();
        assert_eq!(
            json_body(response).await,
            json!({"success": true, "message": "Session loaded", "user": {"foo": "baz"}})
        );

        let logout = Request::builder()
            .uri("/logout")
            .header(SESSION_ID_HEADER, &token)
            .body(Body::empty())
            .unwrap();
        let response = h.router.clone().oneshot(logout).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn test_readiness_without_database() {
        let h = harness(Arc::new(RecordingAudit::default()));
        let request = Request::builder().uri("/health/ready").body(Body::empty()).unwrap();
        let response = h.router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"session_store": "ok", "database": "not_configured"})
        );
    }
}
