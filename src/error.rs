//! Error types for request building and execution.
//!
//! Failures fall into two groups. Configuration-time failures are captured as a
//! [`BuildError`] inside the request builder and only reported when the request
//! is executed. Everything else (transport failures, rejected status codes,
//! undecodable bodies) is produced by the execution itself.

use http::{HeaderMap, StatusCode};

/// A failure recorded while a request was being configured.
///
/// Build errors are sticky: once a builder holds one, every further
/// configuration call is ignored and execution returns the same error without
/// touching the network. They are `Clone` so a failed builder can be cloned and
/// executed any number of times with identical results.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The target URL could not be parsed as an absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The JSON request body could not be serialized.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// The multipart form could not be written.
    #[error("Failed to build form: {0}")]
    Form(String),

    /// A header name or value supplied by the caller is not valid HTTP.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Bearer authentication was requested with an empty token.
    #[error("bearer token must not be empty")]
    EmptyBearerToken,
}

/// The main error type for building and executing requests.
///
/// # Examples
///
/// ```no_run
/// use httpc::Error;
///
/// # async fn example() -> Result<(), Error> {
/// match httpc::get("https://api.example.com/users/1").send().await {
///     Ok(response) => println!("status {}", response.status()),
///     Err(Error::Status { status, raw_response, .. }) => {
///         eprintln!("rejected with {}: {}", status, raw_response);
///     }
///     Err(e) if e.is_deferred() => eprintln!("bad request configuration: {}", e),
///     Err(e) => eprintln!("other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A failure recorded while the request was being configured.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The builder was executed without an HTTP method.
    #[error("no HTTP method specified")]
    NoMethod,

    /// The transport failed (connection refused, DNS, TLS, ...).
    ///
    /// The underlying `reqwest::Error` is surfaced unchanged.
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    /// The server answered with a status outside the accepted set
    /// (200, 201, 202, 204).
    ///
    /// The error text is the response body. A body that is not valid UTF-8
    /// is decoded lossily for the text; `raw_bytes` keeps it byte for byte.
    #[error("{raw_response}")]
    Status {
        /// The HTTP status code
        status: StatusCode,
        /// The full response body decoded as UTF-8, with invalid sequences
        /// replaced by U+FFFD
        raw_response: String,
        /// The full response body exactly as received
        raw_bytes: Vec<u8>,
        /// The response headers
        headers: HeaderMap,
    },

    /// The response body could not be decoded into the requested type.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// Invalid client configuration was provided.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl Error {
    /// Returns `true` if this error was recorded at configuration time rather
    /// than produced by executing the request.
    ///
    /// # Examples
    ///
    /// ```
    /// use httpc::{BuildError, Error};
    ///
    /// assert!(Error::from(BuildError::EmptyBearerToken).is_deferred());
    /// assert!(!Error::NoMethod.is_deferred());
    /// ```
    pub fn is_deferred(&self) -> bool {
        matches!(self, Error::Build(_))
    }

    /// Returns the build error if this error was recorded at configuration time.
    pub fn as_build_error(&self) -> Option<&BuildError> {
        match self {
            Error::Build(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Status { raw_response, .. } => Some(raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns the undecoded body of a rejected response.
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        match self {
            Error::Status { raw_bytes, .. } => Some(raw_bytes),
            _ => None,
        }
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_body_verbatim() {
        let err = Error::Status {
            status: StatusCode::NOT_FOUND,
            raw_response: "{\"error\":\"not found\"}".to_string(),
            raw_bytes: b"{\"error\":\"not found\"}".to_vec(),
            headers: HeaderMap::new(),
        };

        assert_eq!(err.to_string(), "{\"error\":\"not found\"}");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.raw_response(), Some("{\"error\":\"not found\"}"));
        assert_eq!(err.raw_bytes(), Some(&b"{\"error\":\"not found\"}"[..]));
    }

    #[test]
    fn build_errors_are_transparent() {
        let err = Error::from(BuildError::EmptyBearerToken);
        assert_eq!(err.to_string(), "bearer token must not be empty");
        assert_eq!(err.as_build_error(), Some(&BuildError::EmptyBearerToken));
        assert!(err.status().is_none());
    }

    #[test]
    fn no_method_message() {
        assert_eq!(Error::NoMethod.to_string(), "no HTTP method specified");
    }
}
