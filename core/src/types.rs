//! Payloads sent to and decoded from the image API.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::ClientConfig;

/// JSON body of a fetch-mode request. Values are sent verbatim, `null`
/// when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchPayload {
    pub img_url: Option<String>,
    pub process: Option<String>,
}

impl FetchPayload {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            img_url: config.img_url.clone(),
            process: config.process.clone(),
        }
    }

    /// Encode as the request body.
    pub fn to_body(&self) -> String {
        json!({ "img_url": self.img_url, "process": self.process }).to_string()
    }
}

/// A decoded API response object.
///
/// Only `status == true` counts as success; `message` explains a failure.
/// Every other field is passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult(Map<String, Value>);

impl ApiResult {
    pub fn new(object: Map<String, Value>) -> Self {
        ApiResult(object)
    }

    /// True only for a JSON boolean `true`.
    pub fn is_success(&self) -> bool {
        self.0.get("status") == Some(&Value::Bool(true))
    }

    pub fn status(&self) -> Option<&Value> {
        self.0.get("status")
    }

    /// The `message` field as text: strings verbatim, other values as JSON,
    /// empty when absent.
    pub fn message(&self) -> String {
        match self.0.get("message") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}
