use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use url::Url;

/// Failure to obtain a response at all
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

/// HTTP method used by the sync API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// An outgoing request, independent of the HTTP library
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// First value of a header, compared case-insensitively
    #[cfg(test)]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw response.
///
/// Implementations only report failures to get a response at all; status
/// codes are interpreted by the caller.
pub trait Transport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by reqwest
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(request.url),
            Method::Post => self.client.post(request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let url = Url::parse("https://example.com/sync").unwrap();
        let request = HttpRequest::new(Method::Post, url)
            .header("Authorization", "Bearer abc")
            .body(b"{}".to_vec());

        assert_eq!(request.header_value("authorization"), Some("Bearer abc"));
        assert_eq!(request.header_value("Content-Type"), None);
        assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn test_response_status() {
        let ok = HttpResponse { status: 200, body: Vec::new() };
        let denied = HttpResponse { status: 403, body: Vec::new() };
        assert!(ok.is_success());
        assert!(!denied.is_success());
    }
}
