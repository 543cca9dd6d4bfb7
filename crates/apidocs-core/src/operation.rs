//! HTTP operations attached to resources.

use serde::Deserialize;

use crate::definition::{ExampleText, Field};

/// A named group of operations on a resource (e.g., `Write Operations`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationCategory {
    /// Category title.
    pub name: String,
    /// Operations in display order.
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// A single REST operation (create, patch, list, watch, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Operation {
    /// Operation type name (e.g., `Create`, `Patch Status`).
    #[serde(rename = "type")]
    pub type_name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// HTTP verb, upper-case (e.g., `POST`).
    pub http_method: String,
    /// URL path template (e.g., `/api/v1/namespaces/{namespace}/pods`).
    pub path: String,
    /// Parameters bound from the URL path.
    #[serde(default)]
    pub path_params: Vec<Field>,
    /// Parameters bound from the query string.
    #[serde(default)]
    pub query_params: Vec<Field>,
    /// Parameters bound from the request body.
    #[serde(default)]
    pub body_params: Vec<Field>,
    /// Documented responses keyed by status code.
    #[serde(default)]
    pub http_responses: Vec<HttpResponse>,
    /// Example requests, one per tab.
    #[serde(default)]
    pub example_requests: Vec<ExampleText>,
    /// Example responses, one per tab.
    #[serde(default)]
    pub example_responses: Vec<ExampleText>,
}

impl Operation {
    /// `METHOD path`, e.g. `POST /api/v1/namespaces/{namespace}/pods`.
    #[must_use]
    pub fn display_http(&self) -> String {
        format!("{} {}", self.http_method, self.path)
    }

    /// Responses sorted by status code.
    #[must_use]
    pub fn sorted_responses(&self) -> Vec<&HttpResponse> {
        let mut responses: Vec<&HttpResponse> = self.http_responses.iter().collect();
        responses.sort_by(|a, b| a.code.cmp(&b.code));
        responses
    }
}

/// One documented response of an operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpResponse {
    /// Status code as written in the API (`200`, `201`, ...).
    pub code: String,
    /// Response body type and description.
    #[serde(default)]
    pub field: Field,
}
