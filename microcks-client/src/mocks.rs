//! Mock endpoint URLs

use reqwest::Url;

use crate::MicrocksClient;
use crate::error::{ClientError, Result};

impl MicrocksClient {
    /// Base URL of the REST mocks of a service
    pub fn rest_mock_endpoint(&self, service: &str, version: &str) -> Result<String> {
        self.mock_endpoint("rest", service, version)
    }

    /// Base URL of the SOAP mocks of a service
    pub fn soap_mock_endpoint(&self, service: &str, version: &str) -> Result<String> {
        self.mock_endpoint("soap", service, version)
    }

    /// Base URL of the GraphQL mocks of a service
    pub fn graphql_mock_endpoint(&self, service: &str, version: &str) -> Result<String> {
        self.mock_endpoint("graphql", service, version)
    }

    fn mock_endpoint(&self, kind: &str, service: &str, version: &str) -> Result<String> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidRequest(format!("invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidRequest("base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend([kind, service, version]);
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_mock_endpoint() {
        let client = MicrocksClient::new("http://localhost:49153");
        assert_eq!(
            client.rest_mock_endpoint("API Pastries", "0.0.1").unwrap(),
            "http://localhost:49153/rest/API%20Pastries/0.0.1"
        );
    }

    #[test]
    fn test_soap_and_graphql_mock_endpoints() {
        let client = MicrocksClient::new("http://localhost:8080/");
        assert_eq!(
            client.soap_mock_endpoint("Pastries Service", "1.0").unwrap(),
            "http://localhost:8080/soap/Pastries%20Service/1.0"
        );
        assert_eq!(
            client.graphql_mock_endpoint("Pastries Graph", "1.0").unwrap(),
            "http://localhost:8080/graphql/Pastries%20Graph/1.0"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let client = MicrocksClient::new("not a url");
        assert!(client.rest_mock_endpoint("svc", "1").is_err());
    }
}
