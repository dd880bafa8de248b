use thiserror::Error;

use crate::api::transport::TransportError;

/// Failures that can stop a report run
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch {endpoint}: {message}")]
    RemoteFetch {
        endpoint: String,
        message: String,
        #[source]
        source: Option<TransportError>,
    },

    #[error("Project not found: {0}")]
    ProjectNotFound(String),
}

impl ReportError {
    pub fn remote(endpoint: impl Into<String>, message: impl ToString) -> Self {
        ReportError::RemoteFetch {
            endpoint: endpoint.into(),
            message: message.to_string(),
            source: None,
        }
    }

    /// The request never produced a response
    pub fn transport(endpoint: impl Into<String>, source: TransportError) -> Self {
        ReportError::RemoteFetch {
            endpoint: endpoint.into(),
            message: "no response".to_string(),
            source: Some(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ReportError::ProjectNotFound("Work".to_string());
        assert_eq!(err.to_string(), "Project not found: Work");

        let err = ReportError::remote("activity/get", "HTTP 500");
        assert_eq!(err.to_string(), "Failed to fetch activity/get: HTTP 500");
    }

    #[test]
    fn test_transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "operation timed out");
        let err = ReportError::transport("/sync/v9/sync", TransportError::from(io));

        let chain: Vec<String> = anyhow::Error::from(err).chain().map(|e| e.to_string()).collect();
        assert_eq!(chain[0], "Failed to fetch /sync/v9/sync: no response");
        assert!(chain.iter().any(|e| e == "operation timed out"));
    }
}
