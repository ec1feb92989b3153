use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use pcopp_common::contract::ContractError;
use pcopp_common::store::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("malformed JSON body: {0}")]
    MalformedJson(String),

    #[error("storage failure: {0}")]
    Storage(#[source] StorageError),

    #[error("risk data unavailable: {0}")]
    RiskDataUnavailable(#[source] StorageError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    age_secs: Option<i64>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Contract(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MalformedJson(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RiskDataUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn body(&self) -> ErrorBody {
        let mut body = ErrorBody {
            error: "",
            detail: self.to_string(),
            field: None,
            value: None,
            age_secs: None,
        };
        match self {
            Self::Contract(ContractError::ContractViolation { field, value, .. }) => {
                body.error = "contract_violation";
                body.field = Some(field.clone());
                body.value = Some(value.clone());
            }
            Self::Contract(ContractError::StaleData { age_secs, .. }) => {
                body.error = "stale_data";
                body.age_secs = Some(*age_secs);
            }
            Self::MalformedJson(_) => body.error = "malformed_json",
            // Storage internals stay in the logs.
            Self::Storage(_) => {
                body.error = "internal";
                body.detail = "internal server error".into();
            }
            Self::RiskDataUnavailable(_) => {
                body.error = "data_source";
                body.detail = "risk data source unavailable".into();
            }
        }
        body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn json_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn violation_names_field_and_value() {
        let err = ApiError::from(ContractError::ContractViolation {
            field: "memory.mem_frag_index".into(),
            value: "1.5".into(),
            reason: "must be within [0, 1]".into(),
        });
        let (status, body) = json_of(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "contract_violation");
        assert_eq!(body["field"], "memory.mem_frag_index");
        assert_eq!(body["value"], "1.5");
        assert!(body.get("age_secs").is_none());
    }

    #[tokio::test]
    async fn stale_reports_age() {
        let err = ApiError::from(ContractError::StaleData {
            node_id: "n1".into(),
            age_secs: 600,
            max_age_secs: 300,
        });
        let (status, body) = json_of(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "stale_data");
        assert_eq!(body["age_secs"], 600);
    }

    #[tokio::test]
    async fn storage_detail_is_not_leaked() {
        let err = ApiError::Storage(StorageError::Unavailable("pg at 10.0.0.3 refused".into()));
        let (status, body) = json_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["detail"].as_str().unwrap().contains("10.0.0.3"));
    }
}
