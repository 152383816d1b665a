//! Client for remote SPARQL query services.
//!
//! [`SparqlEndpoint`] is the seam the relay talks to; [`HttpSparqlEndpoint`] is
//! the reqwest implementation used against the Wikidata query service.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::domain::models::SparqlResults;

use super::config::SparqlConfig;

pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// HTTP method used to submit queries, as in the SPARQL 1.1 protocol.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    /// Query text travels in the `query` URL parameter.
    #[default]
    #[serde(alias = "get")]
    Get,
    /// Query text travels in a form-encoded body.
    #[serde(alias = "post")]
    Post,
}

#[derive(Debug, Error)]
pub enum SparqlError {
    #[error("invalid SPARQL endpoint URL {url}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build SPARQL client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to SPARQL endpoint failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("SPARQL endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("SPARQL endpoint returned an unreadable response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("SPARQL endpoint response has no results.bindings")]
    MissingBindings,
}

#[async_trait]
pub trait SparqlEndpoint: Send + Sync {
    /// Submits `query` once and returns the decoded JSON results document.
    async fn query(&self, query: &str) -> Result<SparqlResults, SparqlError>;
}

pub fn build_endpoint(config: &SparqlConfig) -> Result<Arc<dyn SparqlEndpoint>, SparqlError> {
    Ok(Arc::new(HttpSparqlEndpoint::new(config)?))
}

pub struct HttpSparqlEndpoint {
    client: Client,
    endpoint: Url,
    method: RequestMethod,
}

impl HttpSparqlEndpoint {
    pub fn new(config: &SparqlConfig) -> Result<Self, SparqlError> {
        let endpoint =
            Url::parse(&config.endpoint_url).map_err(|source| SparqlError::InvalidEndpoint {
                url: config.endpoint_url.clone(),
                source,
            })?;

        let mut builder = Client::builder().user_agent(config.user_agent());
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(SparqlError::Client)?;

        Ok(Self {
            client,
            endpoint,
            method: config.method,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SparqlEndpoint for HttpSparqlEndpoint {
    async fn query(&self, query: &str) -> Result<SparqlResults, SparqlError> {
        let request = match self.method {
            RequestMethod::Get => self
                .client
                .get(self.endpoint.clone())
                .query(&[("query", query), ("format", "json")]),
            RequestMethod::Post => self
                .client
                .post(self.endpoint.clone())
                .query(&[("format", "json")])
                .form(&[("query", query)]),
        };

        debug!(endpoint = %self.endpoint, method = ?self.method, "submitting sparql query");

        let response = request
            .header(header::ACCEPT, SPARQL_RESULTS_JSON)
            .send()
            .await
            .map_err(SparqlError::Transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(SparqlError::Transport)?;

        if !status.is_success() {
            return Err(SparqlError::Status {
                status,
                body: String::from_utf8_lossy(&body).trim().to_string(),
            });
        }

        serde_json::from_slice(&body).map_err(SparqlError::Decode)
    }
}
