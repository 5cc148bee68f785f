//! Melange client errors

use thiserror::Error;

/// Errors that can occur when talking to the Melange IPAM service
#[derive(Debug, Error)]
pub enum MelangeError {
    /// The service could not be reached (socket, TLS or timeout failure)
    #[error("Error while communicating with server. Got error: {0}")]
    Connection(String),

    /// The service answered with a status of 400 or above.
    ///
    /// The body is carried verbatim; it is usually a JSON error payload
    /// such as `{"NotFound": {"message": "IpBlock Not Found"}}`.
    #[error("{body}")]
    ServiceResponse {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Token acquisition from the identity endpoint failed
    #[error("Error occured while retrieving token : {0}")]
    Auth(String),

    /// A resource or operation name did not resolve to anything
    #[error("{owner} has no attribute {name}")]
    UnknownCapability {
        /// The component that was asked (e.g. `Factory`, `IpBlockClient`)
        owner: String,
        /// The name that was requested
        name: String,
    },

    /// The caller supplied arguments that do not fit an operation
    #[error("{0}")]
    Usage(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A non-empty response did not carry the expected envelope key
    #[error("Response is missing the '{key}' envelope")]
    MissingEnvelope {
        /// The top-level key that was expected
        key: String,
    },

    /// A configured URL could not be parsed or joined
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl MelangeError {
    /// Build a usage error from anything displayable
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Whether this error stems from bad caller input rather than the service
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_) | Self::UnknownCapability { .. })
    }

    /// HTTP status of a service-side failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServiceResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}
