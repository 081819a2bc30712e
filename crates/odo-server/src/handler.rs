use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use odo_registry::{ErrorKind, Operation, Registry, RegistryError};
use odo_store::StoreError;
use odo_types::DOC_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Request body of `POST /v1/invoke`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InvokeRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Error body returned for every failed invocation.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: ErrorKind,
    pub message: String,
}

/// HTTP status for each failure kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::MalformedInput
        | ErrorKind::InvalidDate
        | ErrorKind::InvalidValue
        | ErrorKind::UnknownOperation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists
        | ErrorKind::ValueRegression
        | ErrorKind::DateRegression
        | ErrorKind::EmptyIndex => StatusCode::CONFLICT,
        ErrorKind::Corrupt | ErrorKind::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// A registry error on its way out as an HTTP response.
pub struct ApiError(RegistryError);

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let body = ErrorBody {
            error: kind,
            message: self.0.to_string(),
        };
        (status_for(kind), Json(body)).into_response()
    }
}

fn payload_response(payload: Vec<u8>) -> Response {
    if payload.is_empty() {
        return StatusCode::OK.into_response();
    }
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        payload,
    )
        .into_response()
}

async fn run_blocking<F>(registry: Arc<Registry>, f: F) -> Result<Vec<u8>, ApiError>
where
    F: FnOnce(&Registry) -> Result<Vec<u8>, RegistryError> + Send + 'static,
{
    // Ledger backends may block on disk.
    tokio::task::spawn_blocking(move || f(&registry))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "invocation task failed");
            ApiError(RegistryError::StorageFailure(StoreError::Backend(format!(
                "invocation task failed: {e}"
            ))))
        })?
        .map_err(ApiError::from)
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler(State(registry): State<Arc<Registry>>) -> Json<serde_json::Value> {
    Json(json!({
        "name": "odo-server",
        "version": env!("CARGO_PKG_VERSION"),
        "index_key": registry.config().index_key,
        "doc_type": DOC_TYPE,
        "operations": Operation::NAMES,
    }))
}

/// Run one named operation with positional arguments.
pub async fn invoke_handler(
    State(registry): State<Arc<Registry>>,
    body: Result<Json<InvokeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "invoke request rejected");
        RegistryError::MalformedInput(format!("invalid invoke request: {}", rejection.body_text()))
    })?;
    tracing::debug!(function = %request.function, args = request.args.len(), "invoke");
    let payload = run_blocking(registry, move |r| {
        r.invoke(&request.function, &request.args)
    })
    .await?;
    Ok(payload_response(payload))
}

pub async fn read_all_handler(
    State(registry): State<Arc<Registry>>,
) -> Result<Response, ApiError> {
    let payload = run_blocking(registry, |r| r.execute(&Operation::ReadAllReadings)).await?;
    Ok(payload_response(payload))
}

pub async fn read_one_handler(
    State(registry): State<Arc<Registry>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let payload = run_blocking(registry, move |r| r.execute(&Operation::ReadReading(id))).await?;
    Ok(payload_response(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(status_for(ErrorKind::MalformedInput), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::UnknownOperation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::EmptyIndex), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::DateRegression), StatusCode::CONFLICT);
        assert_eq!(
            status_for(ErrorKind::StorageFailure),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invoke_request_args_default_to_empty() {
        let req: InvokeRequest = serde_json::from_str(r#"{"function":"readAllReadings"}"#).unwrap();
        assert!(req.args.is_empty());
    }

    #[test]
    fn api_error_carries_kind() {
        let response = ApiError(RegistryError::EmptyIndex).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
