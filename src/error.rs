//! Error types for meganet-adaptor
//!
//! Only parameter and configuration validation surface as hard errors to
//! the caller. Fetch and presentation failures are recovered where they
//! occur and reported to the mediation host through the
//! [`AdaptorListener`](crate::types::AdaptorListener) contract; the enums
//! here carry their cause text. A completion that arrives for a released
//! or destroyed adaptor is not an error at all — see
//! [`Delivery`](crate::types::Delivery).

use thiserror::Error;

/// Result type alias for meganet-adaptor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for meganet-adaptor
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing ad-request parameter. The transaction never starts.
    #[error("validation error: {message}")]
    Validation {
        /// Human-readable description of the invalid input
        message: String,
        /// The parameter key that caused the error (e.g., "imageUrl")
        key: Option<String>,
    },

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "display_density")
        key: Option<String>,
    },

    /// Creative fetch failed (recovered locally, surfaced via the listener)
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Interstitial presentation failed (recovered locally, surfaced via the listener)
    #[error("presentation error: {0}")]
    Presentation(#[from] PresentationError),
}

/// Errors raised while fetching and decoding a creative image.
///
/// None of these propagate out of [`ImageFetcher::fetch`](crate::fetcher::ImageFetcher::fetch);
/// they collapse to an absent result at that boundary and are logged at
/// warn level.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The image URL could not be parsed
    #[error("malformed url: {0}")]
    MalformedUrl(String),

    /// The HTTP request failed (connect, timeout, mid-body disconnect)
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status
    #[error("server returned status {status}")]
    Status {
        /// The HTTP status code returned by the server
        status: u16,
    },

    /// The response body was empty
    #[error("response body is empty")]
    EmptyBody,

    /// The response body exceeded the configured size cap
    #[error("response body exceeds {limit} bytes")]
    TooLarge {
        /// The configured maximum body size in bytes
        limit: u64,
    },

    /// The response body could not be decoded as an image
    #[error("image decode failed: {0}")]
    Decode(String),
}

/// Errors raised while presenting a full-screen interstitial
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PresentationError {
    /// Another interstitial already occupies the process-wide slot
    #[error("interstitial could not be shown because one is showing now")]
    AlreadyShowing,

    /// The presentation host failed to launch the full-screen surface
    #[error("failed to launch interstitial presentation: {0}")]
    LaunchFailed(String),
}
