use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, Json};
use bytes::Bytes;

use crate::{
    domain::models::{QueryRequest, ResultList},
    infrastructure::state::AppState,
    services::{errors::RelayError, relay::QueryRelay},
};

/// `POST /query`. The body is read leniently so that a missing or
/// non-JSON payload still gets the "No query provided" answer.
pub async fn run_query(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ResultList>, (StatusCode, Json<serde_json::Value>)> {
    let request = QueryRequest::from_body(&body);
    let relay = QueryRelay::new(state);
    let bindings = relay.execute_query(&request).await.map_err(to_response)?;
    Ok(Json(bindings))
}

fn to_response(err: RelayError) -> (StatusCode, Json<serde_json::Value>) {
    (
        err.status_code(),
        Json(serde_json::json!({ "error": err.to_string() })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::errors::MISSING_QUERY_MESSAGE;

    #[test]
    fn missing_query_renders_fixed_payload() {
        let (status, Json(body)) = to_response(RelayError::MissingQuery);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": MISSING_QUERY_MESSAGE }));
    }
}
