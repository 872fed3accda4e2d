//! Translate Server
//!
//! Exposes a [`Translator`] (normally the embedded
//! [`TranslationService`](crate::core::translate::TranslationService)) as the
//! remote translation endpoint that [`HttpTranslator`](crate::core::translate::HttpTranslator)
//! calls.
//!
//! Routes:
//! - `POST /api/translate`: [`TranslationRequest`] in, [`TranslationResponse`] out
//! - `GET /health`

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};

use crate::core::translate::{TranslateError, TranslationRequest, TranslationResponse, Translator};

pub const TRANSLATE_PATH: &str = "/api/translate";

#[derive(Clone)]
struct ServerState {
    translator: Arc<dyn Translator>,
}

/// Build the router without binding a socket.
pub fn router(translator: Arc<dyn Translator>) -> Router {
    Router::new()
        .route(TRANSLATE_PATH, post(translate))
        .route("/health", get(health_check))
        .with_state(ServerState { translator })
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(
    addr: SocketAddr,
    translator: Arc<dyn Translator>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let translator_name = translator.name().to_string();
    let app = router(translator);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        translator = %translator_name,
        "Translate server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("Translate server shutting down");
        })
        .await
}

// ============================================================================
// HTTP Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn translate(
    State(state): State<ServerState>,
    Json(request): Json<TranslationRequest>,
) -> Response {
    match state.translator.translate(request).await {
        Ok(result) => Json(TranslationResponse::from(result)).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(error: TranslateError) -> Response {
    let status = match &error {
        TranslateError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        TranslateError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TranslateError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
        TranslateError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        TranslateError::Http(_) | TranslateError::Api { .. } | TranslateError::InvalidResponse(_) => {
            StatusCode::BAD_GATEWAY
        }
        TranslateError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(error = %error, "Translation failed");
    } else {
        tracing::debug!(error = %error, status = status.as_u16(), "Translation refused");
    }

    let retry_after = error.retry_after();
    let mut response = (status, Json(TranslationResponse::failure(error.to_string()))).into_response();
    if let Some(wait) = retry_after {
        if let Ok(value) = HeaderValue::from_str(&wait.as_secs().max(1).to_string()) {
            response.headers_mut().insert(RETRY_AFTER, value);
        }
    }
    response
}
