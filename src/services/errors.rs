use axum::http::StatusCode;
use thiserror::Error;

use crate::infrastructure::sparql::SparqlError;

pub const MISSING_QUERY_MESSAGE: &str = "No query provided";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("No query provided")]
    MissingQuery,
    #[error("query must be a string, got {0}")]
    NonTextQuery(&'static str),
    /// Everything that went wrong past input validation, whether the remote
    /// service rejected the query or could not be reached at all.
    #[error(transparent)]
    Execution(#[from] SparqlError),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingQuery => StatusCode::BAD_REQUEST,
            RelayError::NonTextQuery(_) | RelayError::Execution(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
