//! Contract test domain types
//!
//! A [`TestRequest`] asks Microcks to run conformance tests against a system
//! under test. Microcks answers with a [`TestResult`] whose `in_progress` flag
//! stays `true` until every test case has finished.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::serde_util::{duration_millis, string_or_seq};

/// Strategy Microcks uses to exercise the tested endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestRunnerType {
    Http,
    SoapHttp,
    SoapUi,
    Postman,
    OpenApiSchema,
    AsyncApiSchema,
    GrpcProtobuf,
    GraphqlSchema,
}

impl std::fmt::Display for TestRunnerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TestRunnerType::Http => "HTTP",
            TestRunnerType::SoapHttp => "SOAP_HTTP",
            TestRunnerType::SoapUi => "SOAP_UI",
            TestRunnerType::Postman => "POSTMAN",
            TestRunnerType::OpenApiSchema => "OPEN_API_SCHEMA",
            TestRunnerType::AsyncApiSchema => "ASYNC_API_SCHEMA",
            TestRunnerType::GrpcProtobuf => "GRPC_PROTOBUF",
            TestRunnerType::GraphqlSchema => "GRAPHQL_SCHEMA",
        };
        write!(f, "{}", name)
    }
}

/// A header to send (or that was sent) with a tested operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,

    /// Comma separated values
    #[serde(deserialize_with = "string_or_seq::deserialize")]
    pub values: String,
}

impl Header {
    pub fn new(name: impl Into<String>, values: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: values.into(),
        }
    }
}

/// OAuth2 grant used by Microcks to obtain a token before testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OAuth2GrantType {
    Password,
    ClientCredentials,
    RefreshToken,
}

/// OAuth2 client settings attached to a test request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2ClientContext {
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    pub token_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub grant_type: OAuth2GrantType,
}

impl OAuth2ClientContext {
    /// Creates a client-credentials context
    pub fn client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Some(client_secret.into()),
            token_uri: token_uri.into(),
            scopes: None,
            username: None,
            password: None,
            refresh_token: None,
            grant_type: OAuth2GrantType::ClientCredentials,
        }
    }
}

/// Request to launch a new test on Microcks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRequest {
    /// Service identifier, `name:version`
    pub service_id: String,
    pub runner_type: TestRunnerType,
    /// Endpoint of the system under test, as reachable from the Microcks container
    pub test_endpoint: String,
    /// How long Microcks may spend on the test
    #[serde(with = "duration_millis")]
    pub timeout: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_operations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations_headers: Option<HashMap<String, Vec<Header>>>,
    #[serde(
        rename = "oAuth2Context",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub oauth2_context: Option<OAuth2ClientContext>,
}

impl TestRequest {
    /// Creates a request with no filtering, headers or OAuth2 context
    pub fn new(
        service_id: impl Into<String>,
        runner_type: TestRunnerType,
        test_endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            runner_type,
            test_endpoint: test_endpoint.into(),
            timeout,
            filtered_operations: None,
            operations_headers: None,
            oauth2_context: None,
        }
    }
}

/// Status snapshot of a test run
///
/// Every refresh from Microcks yields a fresh snapshot; the last one fetched
/// is what callers consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub id: String,
    #[serde(default)]
    pub version: i32,
    #[serde(default)]
    pub test_number: i32,
    #[serde(default)]
    pub test_date: i64,
    #[serde(default)]
    pub tested_endpoint: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(with = "duration_millis", default)]
    pub timeout: Duration,
    #[serde(default)]
    pub elapsed_time: i64,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub in_progress: bool,
    pub runner_type: TestRunnerType,
    #[serde(default)]
    pub test_case_results: Vec<TestCaseResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations_headers: Option<HashMap<String, Vec<Header>>>,
}

/// Outcome of testing one operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub elapsed_time: i64,
    pub operation_name: String,
    #[serde(default)]
    pub test_step_results: Vec<TestStepResult>,
}

/// Outcome of one request or event check within a test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStepResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub elapsed_time: i64,
    #[serde(default)]
    pub request_name: Option<String>,
    #[serde(default)]
    pub event_message_name: Option<String>,
    /// Validation failure detail, absent on success
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let mut request = TestRequest::new(
            "API Pastries:0.0.1",
            TestRunnerType::OpenApiSchema,
            "http://good-impl:3002",
            Duration::from_secs(2),
        );
        request.filtered_operations = Some(vec!["GET /pastries".to_string()]);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["serviceId"], "API Pastries:0.0.1");
        assert_eq!(value["runnerType"], "OPEN_API_SCHEMA");
        assert_eq!(value["testEndpoint"], "http://good-impl:3002");
        assert_eq!(value["timeout"], 2000);
        assert_eq!(value["filteredOperations"][0], "GET /pastries");
        assert!(value.get("operationsHeaders").is_none());
        assert!(value.get("oAuth2Context").is_none());
    }

    #[test]
    fn test_request_with_oauth2_context() {
        let mut request = TestRequest::new(
            "API Pastries:0.0.1",
            TestRunnerType::OpenApiSchema,
            "http://good-impl:3002",
            Duration::from_secs(5),
        );
        request.oauth2_context = Some(OAuth2ClientContext::client_credentials(
            "myrealm-serviceaccount",
            "ab54d329-e435-41ae-a900-ec6b3fe15c54",
            "http://keycloak:8080/realms/myrealm/protocol/openid-connect/token",
        ));

        let value = serde_json::to_value(&request).unwrap();
        let context = &value["oAuth2Context"];
        assert_eq!(context["clientId"], "myrealm-serviceaccount");
        assert_eq!(context["grantType"], "CLIENT_CREDENTIALS");
        assert!(context.get("username").is_none());
    }

    #[test]
    fn test_result_deserializes_snapshot() {
        let json = r#"{
            "id": "66d0b7e5",
            "version": 1,
            "testNumber": 2,
            "testDate": 1725000000000,
            "testedEndpoint": "http://bad-impl:3001",
            "serviceId": "66d0b7e0",
            "timeout": 2000,
            "elapsedTime": 45,
            "success": false,
            "inProgress": true,
            "runnerType": "OPEN_API_SCHEMA",
            "testCaseResults": [{
                "success": false,
                "elapsedTime": 12,
                "operationName": "GET /pastries",
                "testStepResults": [{
                    "success": false,
                    "elapsedTime": 12,
                    "requestName": "pastries_json",
                    "message": "object has missing required properties"
                }]
            }],
            "operationsHeaders": {
                "GET /pastries": [{"name": "X-Auth", "values": ["a", "b"]}]
            }
        }"#;

        let result: TestResult = serde_json::from_str(json).unwrap();
        assert!(result.in_progress);
        assert!(!result.success);
        assert_eq!(result.test_number, 2);
        assert_eq!(result.timeout, Duration::from_secs(2));
        assert_eq!(result.test_case_results.len(), 1);
        assert_eq!(
            result.test_case_results[0].test_step_results[0]
                .message
                .as_deref(),
            Some("object has missing required properties")
        );
        let headers = result.operations_headers.unwrap();
        assert_eq!(headers["GET /pastries"][0].values, "a,b");
    }

    #[test]
    fn test_result_tolerates_missing_fields() {
        let json = r#"{"id": "abc", "runnerType": "HTTP", "inProgress": false}"#;
        let result: TestResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.id, "abc");
        assert!(result.test_case_results.is_empty());
        assert_eq!(result.timeout, Duration::ZERO);
    }

    #[test]
    fn test_runner_type_display_matches_wire_name() {
        for runner in [
            TestRunnerType::Http,
            TestRunnerType::SoapUi,
            TestRunnerType::AsyncApiSchema,
            TestRunnerType::GraphqlSchema,
        ] {
            let wire = serde_json::to_value(runner).unwrap();
            assert_eq!(wire, runner.to_string());
        }
    }
}
