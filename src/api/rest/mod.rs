use axum::{
    routing::{get, post},
    Router,
};

pub mod health;
pub mod query;

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health::healthcheck))
        .route("/query", post(query::run_query))
}
