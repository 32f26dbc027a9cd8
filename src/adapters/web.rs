//! Web adapter - JSON chat API plus the embedded single-page UI.
//!
//! Handlers only talk to the [`ChatStore`]; every agent call goes through it.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::chat::ChatStore;
use crate::error::Error;
use crate::templates::INDEX_HTML;
use crate::tools::camera;
use crate::Result;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ChatStore>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageRequest {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct CreateChatRequest {
    model: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ModelRequest {
    #[serde(default)]
    model: String,
}

/// Error response as `{"error": ...}`.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::ChatNotFound(_) => StatusCode::NOT_FOUND,
            Error::Config(_) => StatusCode::BAD_REQUEST,
            other => {
                error!("Request failed: {}", other);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult = std::result::Result<Json<Value>, ApiError>;

/// Lenient body decoding: a missing or malformed body is treated as empty.
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}

/// Build the axum router with all routes.
pub fn build_router(store: Arc<ChatStore>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/favicon.ico", get(handle_favicon))
        .route("/api/status", get(handle_status))
        .route("/api/vision/support", get(handle_vision_support))
        .route("/api/chat", post(handle_default_chat))
        .route("/api/chats", get(handle_list_chats).post(handle_create_chat))
        .route("/api/chats/{id}", get(handle_get_chat))
        .route("/api/chats/{id}/messages", post(handle_send_message))
        .route("/api/chats/{id}/model", post(handle_switch_model))
        .with_state(AppState { store })
}

/// Serve on an already bound listener until the process exits.
pub async fn serve(store: Arc<ChatStore>, listener: tokio::net::TcpListener) -> Result<()> {
    info!("Web UI listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(store)).await?;
    Ok(())
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn handle_favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn handle_status(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.store.status().await))
}

async fn handle_vision_support() -> Json<Value> {
    Json(json!(camera::support().await))
}

async fn handle_list_chats(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "chats": state.store.list().await }))
}

async fn handle_create_chat(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let request: CreateChatRequest = parse_body(&body);
    let summary = state
        .store
        .create(request.model.as_deref(), request.title.as_deref())
        .await?;
    Ok(Json(json!(summary)))
}

async fn handle_get_chat(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let detail = state.store.get(&id).await?;
    Ok(Json(json!(detail)))
}

async fn handle_send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult {
    let request: MessageRequest = parse_body(&body);
    let reply = state.store.send(&id, &request.message).await?;
    Ok(Json(json!({ "reply": reply })))
}

async fn handle_default_chat(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let request: MessageRequest = parse_body(&body);
    let id = state.store.default_id().to_string();
    let reply = state.store.send(&id, &request.message).await?;
    Ok(Json(json!({ "reply": reply })))
}

async fn handle_switch_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult {
    let request: ModelRequest = parse_body(&body);
    let summary = state.store.switch_model(&id, &request.model).await?;
    Ok(Json(json!({ "ok": true, "model": summary.model })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::echo_factory;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn router() -> Router {
        let store = ChatStore::new(echo_factory(), "llama3").unwrap();
        build_router(Arc::new(store))
    }

    async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_chat_lifecycle() {
        let router = router();

        let (status, body) = call(&router, "GET", "/api/chats", None).await;
        assert_eq!(status, StatusCode::OK);
        let chats = body["chats"].as_array().unwrap();
        assert_eq!(chats.len(), 1);
        let id = chats[0]["id"].as_str().unwrap().to_string();

        let uri = format!("/api/chats/{id}/messages");
        let (_, body) = call(&router, "POST", &uri, Some(json!({"message": "hello"}))).await;
        assert_eq!(body["reply"], "[llama3] hello");

        let (status, body) = call(
            &router,
            "POST",
            &format!("/api/chats/{id}/model"),
            Some(json!({"model": "mistral"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true, "model": "mistral"}));

        let (_, body) = call(&router, "POST", &uri, Some(json!({"message": "again"}))).await;
        assert_eq!(body["reply"], "[mistral] again");

        let (_, body) = call(&router, "GET", &format!("/api/chats/{id}"), None).await;
        assert_eq!(body["model"], "mistral");
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_chat() {
        let router = router();

        let (status, body) = call(
            &router,
            "POST",
            "/api/chats",
            Some(json!({"model": "mistral", "title": "Trip"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"], "mistral");
        assert_eq!(body["title"], "Trip");

        let (_, body) = call(&router, "POST", "/api/chats", None).await;
        assert_eq!(body["model"], "llama3");

        let (_, body) = call(&router, "GET", "/api/chats", None).await;
        assert_eq!(body["chats"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_default_chat_endpoint() {
        let router = router();

        let (_, body) = call(&router, "POST", "/api/chat", Some(json!({"message": "hi"}))).await;
        assert_eq!(body["reply"], "[llama3] hi");

        let (_, body) = call(&router, "POST", "/api/chat", Some(json!({"message": "   "}))).await;
        assert_eq!(body["reply"], "Please enter a message.");

        let (_, body) = call(&router, "POST", "/api/chat", None).await;
        assert_eq!(body["reply"], "Please enter a message.");
    }

    #[tokio::test]
    async fn test_unknown_chat_is_404() {
        let router = router();

        let (status, body) = call(&router, "GET", "/api/chats/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("missing"));

        let (status, _) = call(
            &router,
            "POST",
            "/api/chats/missing/messages",
            Some(json!({"message": "hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_model_is_400() {
        let router = router();
        let (_, body) = call(&router, "GET", "/api/chats", None).await;
        let id = body["chats"][0]["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &router,
            "POST",
            &format!("/api/chats/{id}/model"),
            Some(json!({"model": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_status_and_index() {
        let router = router();

        let (status, body) = call(&router, "GET", "/api/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true, "models": ["llama3", "mistral"], "error": null}));

        let response = router
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("<title>Hearth</title>"));
    }

    #[tokio::test]
    async fn test_vision_support_reports_ok() {
        let router = router();

        let (status, body) = call(&router, "GET", "/api/vision/support", None).await;
        assert_eq!(status, StatusCode::OK);
        let support: crate::tools::CameraSupport = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(body["ok"], json!(support.problem().is_none()));
        assert_eq!(
            support.ok,
            support.platform_supported && support.ffmpeg_available && support.device_available
        );
    }
}
