pub mod calculations;
pub mod coach;
pub mod ecopoints;
pub mod ecostore;
pub mod events;
pub mod health;
pub mod locations;
pub mod nudges;
pub mod waste_logs;

use serde::de::DeserializeOwned;
use wastewise_core::error::{FieldError, WasteError};

use crate::error::AppError;

/// Run store work off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, WasteError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(result)
}

/// Decode a JSON body into a typed request, reporting shape errors as
/// field issues instead of a bare rejection.
pub(crate) fn parse_body<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, WasteError> {
    serde_json::from_value(body)
        .map_err(|e| WasteError::Validation(vec![FieldError::new("body", e.to_string())]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wastewise_core::validate::WasteInput;

    #[test]
    fn parse_body_reports_missing_fields() {
        let err = parse_body::<WasteInput>(serde_json::json!({ "kitchen_kg": 1.0 })).unwrap_err();
        match err {
            WasteError::Validation(issues) => {
                assert_eq!(issues[0].path, "body");
                assert!(issues[0].message.contains("plastic_kg"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
