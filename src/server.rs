//! HTTP adapter for the chat proxy.
//!
//! Maps `ChatProxy::complete_chat` results onto the wire contract: 200 with
//! `{response}` on success, 500 with `{error, response}` on any failure, and
//! the CORS header set on every reply.

use crate::models::{ChatRequest, ChatResponse, Config, ErrorResponse};
use crate::prompts::TECHNICAL_FALLBACK;
use crate::proxy::ChatProxy;
use crate::{Error, Result};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, Instrument};
use uuid::Uuid;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";

/// Largest inbound chat body read into memory.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub proxy: ChatProxy,
}

impl AppState {
    pub fn new(proxy: ChatProxy) -> Self {
        Self { proxy }
    }
}

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", any(chat_handler).options(preflight_handler))
        .route("/chat", any(chat_handler).options(preflight_handler))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(TraceLayer::new_for_http())
}

async fn preflight_handler() -> &'static str {
    "ok"
}

/// Serves every method except OPTIONS. The body is read and decoded here
/// rather than by the `Bytes`/`Json` extractors so that oversized or
/// malformed input takes the same 500 path as every other failure.
async fn chat_handler(State(state): State<SharedState>, body: Body) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id);

    async move {
        match handle_chat(&state.proxy, body).await {
            Ok(text) => Json(ChatResponse { response: text }).into_response(),
            Err(e) => {
                error!("Error in chat request: {}", e);
                e.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

async fn handle_chat(proxy: &ChatProxy, body: Body) -> Result<String> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| Error::RequestBody(e.to_string()))?;
    let request: ChatRequest = serde_json::from_slice(&bytes)?;
    proxy.complete_chat(&request).await
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            response: TECHNICAL_FALLBACK.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Bind `config.bind_addr` and serve until Ctrl-C or SIGTERM.
pub async fn serve(config: &Config, state: SharedState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Dental chat proxy listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockChatClient, MockReply};
    use crate::credentials::StaticCredentials;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::util::ServiceExt;

    fn app(chat: MockChatClient, creds: StaticCredentials) -> Router {
        let proxy = ChatProxy::new(Arc::new(chat), Arc::new(creds));
        create_router(Arc::new(AppState::new(proxy)))
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn assert_cors(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ALLOW_ORIGIN);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], ALLOW_HEADERS);
    }

    #[tokio::test]
    async fn test_success_maps_to_200() {
        let app = app(
            MockChatClient::new().with_text_response("Floss daily."),
            StaticCredentials::new("key"),
        );

        let response = app
            .oneshot(post_json(r#"{"message":"Tips?","context":"Be brief."}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(body_json(response).await, serde_json::json!({ "response": "Floss daily." }));
    }

    #[tokio::test]
    async fn test_error_maps_to_500_with_fallback() {
        let app = app(
            MockChatClient::new().with_reply(MockReply::UpstreamError {
                status: 500,
                message: "X".to_string(),
            }),
            StaticCredentials::new("key"),
        );

        let response = app
            .oneshot(post_json(r#"{"message":"Tips?","context":"Be brief."}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "X", "response": TECHNICAL_FALLBACK })
        );
    }

    #[tokio::test]
    async fn test_missing_field_is_500_not_422() {
        let app = app(MockChatClient::new(), StaticCredentials::new("key"));

        let response = app
            .oneshot(post_json(r#"{"message":"Tips?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["response"], TECHNICAL_FALLBACK);
    }

    #[tokio::test]
    async fn test_other_methods_take_chat_path() {
        let app = app(
            MockChatClient::new().with_text_response("Rinse after meals."),
            StaticCredentials::new("key"),
        );

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message":"Tips?","context":"Be brief."}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "response": "Rinse after meals." })
        );

        let response = app
            .oneshot(Request::builder().method(Method::GET).uri("/chat").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
        assert_eq!(body["response"], TECHNICAL_FALLBACK);
    }

    #[tokio::test]
    async fn test_oversized_body_is_500_not_413() {
        let chat = Arc::new(MockChatClient::new());
        let proxy = ChatProxy::new(chat.clone(), Arc::new(StaticCredentials::new("key")));
        let app = create_router(Arc::new(AppState::new(proxy)));

        let message = "a".repeat(3 * 1024 * 1024);
        let body = serde_json::json!({ "message": message, "context": "ctx" }).to_string();

        let response = app.oneshot(post_json(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);
        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to read request body"));
        assert_eq!(body["response"], TECHNICAL_FALLBACK);
        assert_eq!(chat.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_preflight_on_chat_alias() {
        let app = app(MockChatClient::new(), StaticCredentials::missing());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/chat")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(MockChatClient::new(), StaticCredentials::missing());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
