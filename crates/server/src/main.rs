use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use server_api::{decrement, increment, read, reset, service_info, ApiContext};
use shared::{
    domain::CounterOp,
    error::{ApiError, ErrorCode},
    protocol::{healthz_route, home_route, CounterRequest, CounterResponse, ServiceInfo},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
};
use tracing::{debug, error, info};

mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

/// Counter requests carry at most `{"value": n}`; anything bigger is noise.
const MAX_REQUEST_BODY_BYTES: usize = 4 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings();
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();

    let cors = cors_layer(&settings.allowed_origins)?;
    let state = AppState {
        api: ApiContext::default(),
    };
    let app = build_router(Arc::new(state), cors);

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|error| {
        error!(%addr, %error, "failed to bind counter service");
        error
    })?;
    info!(%addr, origins = ?settings.allowed_origins, "counter service listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("counter service stopped");
    Ok(())
}

fn build_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route(home_route(), get(home))
        .route(healthz_route(), get(healthz))
        .route(CounterOp::Increment.route(), post(http_increment))
        .route(CounterOp::Decrement.route(), post(http_decrement))
        .route(CounterOp::Read.route(), post(http_read).get(http_read))
        .route(CounterOp::Reset.route(), get(http_reset).post(http_reset))
        .fallback(not_found)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(middleware::map_response(payload_too_large_as_api_error))
        .layer(cors)
}

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    if origins.iter().any(|origin| origin == "*") {
        anyhow::bail!("wildcard origin cannot be combined with credentials");
    }
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("invalid CORS origin '{origin}'"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true))
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(%error, "failed to install Ctrl-C handler; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Pulls the informational client value out of a request body.
///
/// Empty or unparseable bodies are not errors: the server never depends on
/// what the client thinks the counter is.
fn submitted_value(body: &[u8]) -> Option<i64> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice::<CounterRequest>(body) {
        Ok(request) => request.value,
        Err(error) => {
            debug!(%error, "ignoring unparseable counter request body");
            None
        }
    }
}

async fn home() -> Json<ServiceInfo> {
    Json(service_info())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_increment(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<CounterResponse> {
    Json(increment(&state.api, submitted_value(&body)))
}

async fn http_decrement(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<CounterResponse> {
    Json(decrement(&state.api, submitted_value(&body)))
}

async fn http_read(State(state): State<Arc<AppState>>, body: Bytes) -> Json<CounterResponse> {
    Json(read(&state.api, submitted_value(&body)))
}

async fn http_reset(State(state): State<Arc<AppState>>) -> Json<CounterResponse> {
    Json(reset(&state.api))
}

/// Rewrites the body-limit layer's plain-text 413 into an `ApiError` body.
async fn payload_too_large_as_api_error(response: Response) -> Response {
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return response;
    }
    (
        StatusCode::PAYLOAD_TOO_LARGE,
        Json(ApiError::new(
            ErrorCode::PayloadTooLarge,
            format!("request body exceeds {MAX_REQUEST_BODY_BYTES} bytes"),
        )),
    )
        .into_response()
}

async fn not_found() -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new(ErrorCode::NotFound, "route not found")),
    )
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
