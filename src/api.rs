use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::channel::{MethodCall, MethodChannel, MethodResponse};
use crate::error::PluginError;

// ── Response types ───────────────────────────────────────────────

#[derive(Serialize)]
struct ApiOk<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Serialize)]
struct ApiErr {
    ok: bool,
    error: MethodResponse,
}

fn ok_json<T: Serialize>(data: T) -> impl IntoResponse {
    Json(ApiOk { ok: true, data })
}

fn err_json(status: StatusCode, e: &PluginError) -> impl IntoResponse {
    (
        status,
        Json(ApiErr {
            ok: false,
            error: MethodResponse::from(e),
        }),
    )
}

/// Request bodies are optional; an empty body means "no arguments".
fn parse_arguments(body: &Bytes) -> Result<Option<Value>, PluginError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(body)?))
}

// ── Handlers ─────────────────────────────────────────────────────

async fn post_method(
    Extension(channel): Extension<Arc<MethodChannel>>,
    Path((name, method)): Path<(String, String)>,
    body: Bytes,
) -> impl IntoResponse {
    if name != channel.name() {
        let e = PluginError::UnknownChannel { name };
        return err_json(StatusCode::NOT_FOUND, &e).into_response();
    }
    match parse_arguments(&body) {
        Ok(arguments) => {
            ok_json(channel.invoke(MethodCall { method, arguments })).into_response()
        }
        Err(e) => err_json(StatusCode::BAD_REQUEST, &e).into_response(),
    }
}

async fn get_commands(Extension(channel): Extension<Arc<MethodChannel>>) -> impl IntoResponse {
    ok_json(channel.catalog())
}

// ── Server startup ───────────────────────────────────────────────

pub fn router(channel: Arc<MethodChannel>) -> Router {
    Router::new()
        .route("/api/channels/{name}/{method}", post(post_method))
        .route("/api/commands", get(get_commands))
        .layer(CorsLayer::permissive())
        .layer(Extension(channel))
}

/// Start the HTTP API on loopback. `port` 0 picks a free port. Returns the
/// bound port and the server task.
pub async fn start_api_server(
    channel: Arc<MethodChannel>,
    port: u16,
) -> Result<(u16, JoinHandle<()>), PluginError> {
    let app = router(channel);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let port = listener.local_addr()?.port();
    info!(port, "API server listening on http://127.0.0.1:{port}");

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "API server error");
        }
    });

    Ok((port, handle))
}
