use super::types::{AnalyzeRequest, ErrorResponse};
use crate::{
    Error,
    proxy::{SentimentProxy, TEXT_REQUIRED},
};
use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{
        HeaderValue, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW,
        },
    },
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub proxy: SentimentProxy,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

const ALLOWED_METHODS: &str = "POST, OPTIONS";

pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, HandlerError> {
    let request_id = Uuid::new_v4();

    let body = body.map_err(|rejection| {
        warn!(%request_id, "Could not read request body: {}", rejection.body_text());
        (rejection.status(), Json(ErrorResponse::new(rejection.body_text())))
    })?;

    // Anything that does not decode to a non-empty string `text` is rejected the same way.
    let text = serde_json::from_slice::<AnalyzeRequest>(&body)
        .ok()
        .and_then(|request| request.text)
        .filter(|text| !text.is_empty());

    let Some(text) = text else {
        warn!(%request_id, "Rejected analyze request without text");
        return Err(error_response(&Error::invalid_request(TEXT_REQUIRED)));
    };

    info!(
        %request_id,
        "Received analyze request ({} characters)",
        text.chars().count()
    );

    match state.proxy.analyze(&text).await {
        Ok(payload) => {
            info!(%request_id, "Analyze request succeeded");
            Ok(Json(payload))
        }
        Err(e) => {
            error!(%request_id, "Analyze request failed: {}", e);
            Err(error_response(&e))
        }
    }
}

pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(ALLOW, ALLOWED_METHODS)],
        Json(ErrorResponse::new("Method not allowed")),
    )
        .into_response()
}

pub async fn not_found() -> HandlerError {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}

/// Stamps the CORS headers onto every response, errors included.
pub async fn cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

fn error_response(err: &Error) -> HandlerError {
    (
        err.status_code(),
        Json(ErrorResponse::new(err.public_message())),
    )
}
