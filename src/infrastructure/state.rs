use std::sync::Arc;

use crate::infrastructure::{config::Config, sparql::SparqlEndpoint};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sparql: Arc<dyn SparqlEndpoint>,
}

impl AppState {
    pub fn new(config: Arc<Config>, sparql: Arc<dyn SparqlEndpoint>) -> Self {
        Self { config, sparql }
    }
}
