use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::infrastructure::sparql::SparqlError;

/// One result row: variable name to value descriptor (`type`, `value`,
/// optional `xml:lang` or `datatype`). Never interpreted by the relay.
pub type Binding = Map<String, Value>;

pub type ResultList = Vec<Binding>;

#[derive(Debug, Clone, Default, Validate)]
pub struct QueryRequest {
    #[validate(required, length(min = 1))]
    pub query: Option<String>,
    /// JSON type of a `query` member that is set to a non-empty value other
    /// than a string.
    pub non_text: Option<&'static str>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            non_text: None,
        }
    }

    /// Parses a raw request body. Only a JSON object carries a query; any
    /// other body yields an empty request.
    pub fn from_body(body: &[u8]) -> Self {
        let Ok(Value::Object(members)) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };

        match members.get("query") {
            Some(Value::String(text)) => Self::new(text.as_str()),
            Some(value) if has_content(value) => Self {
                query: None,
                non_text: Some(json_type(value)),
            },
            _ => Self::default(),
        }
    }

    /// The query text, provided it is present and non-empty.
    pub fn query_text(&self) -> Option<&str> {
        match self.validate() {
            Ok(()) => self.query.as_deref(),
            Err(_) => None,
        }
    }
}

/// `null`, `false`, zero and empty containers count as no query at all.
fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(members) => !members.is_empty(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// SPARQL 1.1 query results document in its JSON serialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SparqlResults {
    #[serde(default)]
    pub head: ResultsHead,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultsBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResultsHead {
    #[serde(default)]
    pub vars: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResultsBody {
    pub bindings: ResultList,
}

impl SparqlResults {
    /// Consumes the document and returns its bindings in endpoint order.
    pub fn into_bindings(self) -> Result<ResultList, SparqlError> {
        self.results
            .map(|results| results.bindings)
            .ok_or(SparqlError::MissingBindings)
    }
}
