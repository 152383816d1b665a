use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    domain::models::{QueryRequest, ResultList, SparqlResults},
    infrastructure::state::AppState,
};

use super::errors::RelayError;

pub struct QueryRelay {
    pub state: Arc<AppState>,
}

impl QueryRelay {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Runs the request's query against the configured endpoint once and
    /// returns its bindings untouched.
    pub async fn execute_query(&self, request: &QueryRequest) -> Result<ResultList, RelayError> {
        if let Some(kind) = request.non_text {
            return Err(RelayError::NonTextQuery(kind));
        }
        let Some(query) = request.query_text() else {
            return Err(RelayError::MissingQuery);
        };

        let request_id = Uuid::new_v4();
        info!(%request_id, query_len = query.len(), "relaying sparql query");

        let outcome = self
            .state
            .sparql
            .query(query)
            .await
            .and_then(SparqlResults::into_bindings);

        match outcome {
            Ok(bindings) => {
                info!(%request_id, bindings = bindings.len(), "sparql query completed");
                Ok(bindings)
            }
            Err(err) => {
                warn!(%request_id, error = %err, "sparql query failed");
                Err(RelayError::Execution(err))
            }
        }
    }
}
