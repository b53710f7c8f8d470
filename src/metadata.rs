//! Request metadata accumulated by the builder.

use crate::BuildError;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use url::Url;

/// Content type seeded into every request before any other header is applied.
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Authentication attached to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Auth {
    /// No `Authorization` header is sent.
    #[default]
    None,
    /// HTTP Basic authentication.
    Basic {
        /// The user name
        username: String,
        /// The password
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The token
        token: String,
    },
}

impl Auth {
    /// Returns `true` unless this is [`Auth::None`].
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Auth::None)
    }
}

/// Everything about a request except its body.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The HTTP method, if one has been set.
    pub method: Option<Method>,

    /// The validated target URL.
    pub url: Url,

    /// Headers sent with the request. Later writes for a name overwrite earlier ones.
    pub headers: HeaderMap,

    /// Authentication for the request.
    pub auth: Auth,
}

impl RequestMetadata {
    /// Creates metadata for `url` with the JSON content type seeded.
    pub fn new(method: Option<Method>, url: Url) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        Self {
            method,
            url,
            headers,
            auth: Auth::None,
        }
    }
}

pub(crate) fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), BuildError> {
    let name = HeaderName::try_from(name)
        .map_err(|e| BuildError::InvalidHeader(format!("name {:?}: {}", name, e)))?;
    let value = HeaderValue::try_from(value)
        .map_err(|e| BuildError::InvalidHeader(format!("value for {}: {}", name, e)))?;
    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> RequestMetadata {
        RequestMetadata::new(
            Some(Method::GET),
            Url::parse("https://api.com/api/v1/example/").unwrap(),
        )
    }

    #[test]
    fn seeds_json_content_type() {
        let metadata = metadata();
        assert_eq!(metadata.headers.len(), 1);
        assert_eq!(metadata.headers[CONTENT_TYPE], JSON_CONTENT_TYPE);
        assert_eq!(metadata.auth, Auth::None);
    }

    #[test]
    fn only_none_is_disabled() {
        assert!(!Auth::None.is_enabled());
        assert!(Auth::Basic {
            username: "user".to_string(),
            password: "myPassword".to_string(),
        }
        .is_enabled());
        assert!(Auth::Bearer {
            token: "someToken".to_string()
        }
        .is_enabled());
    }

    #[test]
    fn parse_header_normalizes_name() {
        let (name, value) = parse_header("X-Auth-Token", "mySecretToken").unwrap();
        assert_eq!(name.as_str(), "x-auth-token");
        assert_eq!(value, "mySecretToken");
    }

    #[test]
    fn parse_header_rejects_invalid_name() {
        let err = parse_header("bad header", "value").unwrap_err();
        assert!(matches!(err, BuildError::InvalidHeader(_)));
    }

    #[test]
    fn parse_header_rejects_invalid_value() {
        let err = parse_header("X-Test", "line\nbreak").unwrap_err();
        assert!(matches!(err, BuildError::InvalidHeader(_)));
    }
}
