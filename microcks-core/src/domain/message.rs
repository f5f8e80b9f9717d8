//! Messages exchanged during a test
//!
//! Microcks records what it sent to and received from the tested endpoint so
//! callers can inspect failures after the fact.

use serde::{Deserialize, Serialize};

use super::test::Header;

/// A query or path parameter of a recorded request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

/// A request sent by Microcks to the tested endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Request {
    pub id: Option<String>,
    pub name: Option<String>,
    pub content: Option<String>,
    pub operation_id: Option<String>,
    pub test_case_id: Option<String>,
    pub source_artifact: Option<String>,
    pub headers: Vec<Header>,
    pub query_parameters: Vec<Parameter>,
}

/// A response returned by the tested endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Response {
    pub id: Option<String>,
    pub name: Option<String>,
    pub content: Option<String>,
    pub operation_id: Option<String>,
    pub test_case_id: Option<String>,
    pub source_artifact: Option<String>,
    pub headers: Vec<Header>,
    pub status: Option<String>,
    pub media_type: Option<String>,
}

/// A request and the response it got
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestResponsePair {
    pub request: Request,
    pub response: Response,
}

/// An asynchronous message received by Microcks while testing an event API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventMessage {
    pub id: Option<String>,
    pub name: Option<String>,
    pub content: Option<String>,
    pub operation_id: Option<String>,
    pub test_case_id: Option<String>,
    pub source_artifact: Option<String>,
    pub headers: Vec<Header>,
    pub media_type: Option<String>,
}

/// Wrapper Microcks uses for one-way exchanges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnidirectionalEvent {
    pub event_message: EventMessage,
}
