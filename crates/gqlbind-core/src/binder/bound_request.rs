use crate::OperationKind;
use serde::Serialize;

/// A request ready to be sent: the final document text and the JSON values
/// of its GraphQL variables.
///
/// Serializes as the standard GraphQL-over-HTTP request body
/// (`{"query", "operationName", "variables"}`).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoundRequest {
    #[serde(rename = "query")]
    pub(super) document: String,
    #[serde(skip)]
    pub(super) kind: OperationKind,
    #[serde(rename = "operationName", skip_serializing_if = "Option::is_none")]
    pub(super) operation_name: Option<String>,
    pub(super) variables: serde_json::Map<String, serde_json::Value>,
}
impl BoundRequest {
    pub fn document(&self) -> &str {
        self.document.as_str()
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn operation_name(&self) -> Option<&str> {
        self.operation_name.as_deref()
    }

    pub fn variables(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.variables
    }
}
