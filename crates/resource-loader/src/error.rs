//! Loader errors.

use crate::transport::Response;
use template_xml::XmlError;
use thiserror::Error;

/// Result type for resource loading.
pub type LoaderResult<T> = Result<T, LoaderError>;

/// A resource that could not be loaded.
///
/// Every variant keeps the requested URL; failures that happened after a
/// response arrived keep the response too.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The transport could not deliver a response.
    #[error("failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// The response status is not 200.
    #[error("{url} answered with status {}", .response.status)]
    Status { url: String, response: Response },

    /// The response body is not well-formed XML.
    #[error("{url} is not a valid XML document: {source}")]
    Xml {
        url: String,
        response: Response,
        #[source]
        source: XmlError,
    },

    /// The loading task panicked or was cancelled.
    #[error("loading {url} did not complete: {message}")]
    Task { url: String, message: String },
}

impl LoaderError {
    /// URL of the failed request.
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::Xml { url, .. }
            | Self::Task { url, .. } => url,
        }
    }

    /// Response received before the failure, if any.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Status { response, .. } | Self::Xml { response, .. } => Some(response),
            Self::Transport { .. } | Self::Task { .. } => None,
        }
    }
}
