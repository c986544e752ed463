//! Error types for request building and dispatch.
//!
//! # Design
//! Building a request fails in exactly two ways: the target cannot be turned
//! into a URL, or the parameters cannot be serialized. Both surface
//! synchronously to whoever asked for the request. `Transport` never comes
//! out of a build step; it is only handed to completion callbacks after the
//! platform client gave up on a request.

/// Errors produced while building or executing a request.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The URL-like input could not be resolved to a URL. Carries the input
    /// exactly as the caller supplied it.
    #[error("invalid URL: {input}")]
    InvalidUrl { input: String },

    /// The parameters could not be serialized.
    #[error("parameter encoding failed: {0}")]
    EncodingFailed(#[source] serde_json::Error),

    /// The platform HTTP client failed to execute the request.
    #[error("transport failed: {0}")]
    Transport(String),
}

impl NetworkError {
    pub(crate) fn invalid_url(input: impl Into<String>) -> Self {
        NetworkError::InvalidUrl {
            input: input.into(),
        }
    }
}
