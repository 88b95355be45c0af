//! Outbound HTTP capability
//!
//! The delivery client only describes the request it wants; sockets, TLS and
//! connection pooling belong to the [`HttpSender`] implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::error::BoxError;

/// A fully described outbound request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// Value of the first header named `name` (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// What came back from the remote side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
}

/// Issues a single HTTP request.
///
/// Implementations decide which responses count as errors; anything returned
/// as `Err` is reported to the caller as a transport failure.
#[async_trait]
pub trait HttpSender: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError>;
}

/// reqwest-backed sender; 4xx and 5xx responses are errors
#[derive(Debug, Clone, Default)]
pub struct ReqwestSender {
    client: Client,
}

impl ReqwestSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxies, TLS roots, ...)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSender for ReqwestSender {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(request.body).send().await?;
        let response = response.error_for_status()?;

        Ok(HttpResponse {
            status: response.status().as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = HttpRequest {
            method: Method::POST,
            url: "http://localhost/".to_string(),
            headers: vec![("X-AUTH-ALGORITHM".to_string(), "sha512".to_string())],
            body: vec![],
            timeout: Duration::from_secs(1),
        };
        assert_eq!(request.header("x-auth-algorithm"), Some("sha512"));
        assert_eq!(request.header("content-type"), None);
    }
}
