use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use wastewise_core::error::WasteError;

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(WasteError::InvalidRequest(msg.into()).into())
    }

    /// Construct a 401 Unauthorized error.
    pub fn unauthorized() -> Self {
        Self(WasteError::Unauthorized.into())
    }
}

fn status_for(e: &WasteError) -> StatusCode {
    match e {
        WasteError::NotInitialized
        | WasteError::Validation(_)
        | WasteError::InvalidRequest(_)
        | WasteError::InsufficientPoints { .. } => StatusCode::BAD_REQUEST,
        WasteError::Unauthorized => StatusCode::UNAUTHORIZED,
        WasteError::UserNotFound(_) | WasteError::ProductNotFound(_) => StatusCode::NOT_FOUND,
        WasteError::UserExists(_) | WasteError::OutOfStock(_) => StatusCode::CONFLICT,
        WasteError::Coach(_)
        | WasteError::Store(_)
        | WasteError::Io(_)
        | WasteError::Yaml(_)
        | WasteError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let Some(e) = self.0.downcast_ref::<WasteError>() else {
            tracing::error!(error = %self.0, "unhandled request error");
            let body = serde_json::json!({ "error": self.0.to_string() });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response();
        };

        let status = status_for(e);
        let body = match e {
            // Field issues travel as an array so clients can highlight inputs.
            WasteError::Validation(issues) => serde_json::json!({ "error": issues }),
            _ => serde_json::json!({ "error": e.to_string() }),
        };
        if status.is_server_error() {
            tracing::error!(error = %e, "request failed");
        }
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use wastewise_core::error::FieldError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn product_not_found_maps_to_404() {
        let err = AppError(WasteError::ProductNotFound("p-1".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn user_not_found_maps_to_404() {
        let err = AppError(WasteError::UserNotFound("a@b.c".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn out_of_stock_maps_to_409() {
        let err = AppError(WasteError::OutOfStock("Bag".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn user_exists_maps_to_409() {
        let err = AppError(WasteError::UserExists("a@b.c".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        assert_eq!(
            AppError::unauthorized().into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn not_initialized_maps_to_400() {
        let err = AppError(WasteError::NotInitialized.into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn coach_failure_maps_to_500() {
        let err = AppError(WasteError::Coach("timeout".into()).into());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn non_waste_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn insufficient_points_message_is_exact() {
        let err = AppError(
            WasteError::InsufficientPoints {
                available: 10,
                required: 50,
            }
            .into(),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Insufficient eco points");
    }

    #[tokio::test]
    async fn bad_request_carries_message() {
        let response = AppError::bad_request("Message is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Message is required");
    }

    #[tokio::test]
    async fn validation_body_is_issue_array() {
        let err = AppError(
            WasteError::Validation(vec![FieldError::new("kitchen_kg", "must be at most 10")])
                .into(),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"][0]["path"], "kitchen_kg");
        assert_eq!(json["error"][0]["message"], "must be at most 10");
    }
}
