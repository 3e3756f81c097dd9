// --- File: crates/bienestar_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::{BienestarError, HttpStatusCode};

/// Extension trait for BienestarError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for BienestarError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            error!("Request failed with {}: {}", status_code, self);
        }

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "code": status_code.as_u16(),
            }
        }));

        (status_code, body).into_response()
    }
}

impl IntoResponse for BienestarError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// Converts a `Result<T, BienestarError>` into the `Result<Json<T>, Response>` axum expects.
pub fn handle_json_result<T>(result: Result<T, BienestarError>) -> Result<Json<T>, Response>
where
    T: serde::Serialize,
{
    result.map(Json).map_err(|err| err.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{conflict, service_unavailable};

    #[test]
    fn test_conflict_maps_to_409() {
        let response = conflict("09:00 is taken").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_data_unavailable_maps_to_503() {
        let result: Result<Vec<String>, BienestarError> =
            Err(service_unavailable("firestore timeout"));
        let response = handle_json_result(result).unwrap_err();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
