//! The fluent request builder.
//!
//! A [`RequestBuilder`] is created by one of the entry constructors on
//! [`Client`](crate::Client) (or the crate-level shortcuts), configured by
//! chained calls, and consumed by [`send`](RequestBuilder::send),
//! [`load`](RequestBuilder::load) or [`fetch`](RequestBuilder::fetch).
//!
//! Configuration never fails loudly. The first failure is recorded inside the
//! builder, every later configuration call passes it through untouched, and
//! execution reports it without performing any network I/O.

use crate::form::{self, FormField, FormFile, MultipartBody};
use crate::metadata::{parse_header, Auth, RequestMetadata};
use crate::{BuildError, Error, Response, Result};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::io::Read;
use std::time::{Duration, Instant};
use url::Url;

/// Returns `true` for the status codes treated as success: 200, 201, 202 and 204.
///
/// Any other status, including other 2xx codes, is a failure.
///
/// # Examples
///
/// ```
/// use http::StatusCode;
///
/// assert!(httpc::is_accepted_status(StatusCode::NO_CONTENT));
/// assert!(!httpc::is_accepted_status(StatusCode::PARTIAL_CONTENT));
/// ```
pub fn is_accepted_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED | StatusCode::NO_CONTENT
    )
}

#[derive(Debug)]
enum Body {
    Empty,
    Json(Vec<u8>),
    Multipart(MultipartBody),
}

#[derive(Debug)]
struct Prepared {
    metadata: RequestMetadata,
    body: Body,
}

impl Prepared {
    fn try_clone(&self) -> Option<Self> {
        let body = match &self.body {
            Body::Empty => Body::Empty,
            Body::Json(bytes) => Body::Json(bytes.clone()),
            Body::Multipart(_) => return None,
        };
        Some(Self {
            metadata: self.metadata.clone(),
            body,
        })
    }
}

/// A request under construction.
///
/// # Examples
///
/// ```no_run
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Listing {
///     status: String,
///     data: Vec<serde_json::Value>,
/// }
///
/// # async fn example() -> Result<(), httpc::Error> {
/// let listing: Listing = httpc::get("https://api.example.com/api/v1/example/")
///     .add_headers([("X-Request-Source", "docs")])
///     .bearer_auth("my-token")
///     .load()
///     .await?;
/// println!("{} ({} items)", listing.status, listing.data.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
#[must_use = "a request builder does nothing until it is sent"]
pub struct RequestBuilder {
    http_client: reqwest::Client,
    url: String,
    state: std::result::Result<Prepared, BuildError>,
}

impl RequestBuilder {
    /// Validates `url` and seeds the request. A bad URL leaves the builder failed.
    pub(crate) fn new(
        http_client: reqwest::Client,
        default_headers: &HeaderMap,
        method: Option<Method>,
        url: &str,
    ) -> Self {
        let state = Url::parse(url).map_err(BuildError::from).map(|parsed| {
            let mut metadata = RequestMetadata::new(method, parsed);
            for (name, value) in default_headers {
                metadata.headers.insert(name.clone(), value.clone());
            }
            Prepared {
                metadata,
                body: Body::Empty,
            }
        });

        if let Err(e) = &state {
            tracing::debug!(url = %url, error = %e, "Rejected request URL");
        }

        Self {
            http_client,
            url: url.to_string(),
            state,
        }
    }

    pub(crate) fn with_json<T>(self, body: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        self.map_state(|mut prepared| {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| BuildError::SerializationFailed(e.to_string()))?;
            prepared.body = Body::Json(bytes);
            Ok(prepared)
        })
    }

    pub(crate) fn with_form<R, I>(self, file: FormFile<R>, fields: I) -> Self
    where
        R: Read,
        I: IntoIterator<Item = FormField>,
    {
        self.map_state(|mut prepared| {
            let multipart = form::write_form(file, fields)?;
            let (name, value) = parse_header(CONTENT_TYPE.as_str(), &multipart.content_type)?;
            prepared.metadata.headers.insert(name, value);
            prepared.body = Body::Multipart(multipart);
            Ok(prepared)
        })
    }

    fn map_state<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Prepared) -> std::result::Result<Prepared, BuildError>,
    {
        self.state = self.state.and_then(f);
        self
    }

    fn configure<F>(self, operation: &'static str, f: F) -> Self
    where
        F: FnOnce(Prepared) -> std::result::Result<Prepared, BuildError>,
    {
        if let Err(e) = &self.state {
            tracing::debug!(operation, error = %e, "Ignoring configuration on failed request");
        }
        self.map_state(f)
    }

    /// Merges `headers` into the request, overwriting values for names already present.
    ///
    /// The multipart content type of a form request cannot be replaced. An
    /// invalid header name or value fails the builder.
    pub fn add_headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.configure("add_headers", |mut prepared| {
            let multipart = matches!(prepared.body, Body::Multipart(_));
            for (name, value) in headers {
                let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
                if multipart && name == CONTENT_TYPE {
                    tracing::debug!("Keeping multipart content type of form request");
                    continue;
                }
                prepared.metadata.headers.insert(name, value);
            }
            Ok(prepared)
        })
    }

    /// Enables HTTP Basic authentication.
    ///
    /// If either `username` or `password` is empty the call does nothing: no
    /// authentication is configured and no error is recorded.
    pub fn basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        let username = username.into();
        let password = password.into();
        self.configure("basic_auth", |mut prepared| {
            if username.is_empty() || password.is_empty() {
                tracing::debug!("Skipping basic auth with empty credentials");
            } else {
                prepared.metadata.auth = Auth::Basic { username, password };
            }
            Ok(prepared)
        })
    }

    /// Enables bearer token authentication.
    ///
    /// Unlike [`basic_auth`](Self::basic_auth), an empty token fails the
    /// builder with [`BuildError::EmptyBearerToken`].
    pub fn bearer_auth(self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.configure("bearer_auth", |mut prepared| {
            if token.is_empty() {
                return Err(BuildError::EmptyBearerToken);
            }
            prepared.metadata.auth = Auth::Bearer { token };
            Ok(prepared)
        })
    }

    /// The URL exactly as it was passed to the constructor.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The HTTP method, or `None` if none is set or the builder has failed.
    pub fn method(&self) -> Option<&Method> {
        self.state.as_ref().ok()?.metadata.method.as_ref()
    }

    /// The accumulated headers, or `None` if the builder has failed.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.state.as_ref().ok().map(|p| &p.metadata.headers)
    }

    /// The configured authentication, or `None` if the builder has failed.
    pub fn auth(&self) -> Option<&Auth> {
        self.state.as_ref().ok().map(|p| &p.metadata.auth)
    }

    /// Returns `true` if the builder carries a request body.
    pub fn has_body(&self) -> bool {
        matches!(&self.state, Ok(p) if !matches!(p.body, Body::Empty))
    }

    /// The recorded configuration error, if any.
    pub fn error(&self) -> Option<&BuildError> {
        self.state.as_ref().err()
    }

    /// Returns `true` once a configuration error has been recorded.
    pub fn is_failed(&self) -> bool {
        self.state.is_err()
    }

    /// Attempts to clone the builder.
    ///
    /// Returns `None` for multipart requests, whose body can only be sent once.
    /// A failed builder always clones, and every clone fails with an equal error.
    pub fn try_clone(&self) -> Option<Self> {
        let state = match &self.state {
            Ok(prepared) => Ok(prepared.try_clone()?),
            Err(e) => Err(e.clone()),
        };
        Some(Self {
            http_client: self.http_client.clone(),
            url: self.url.clone(),
            state,
        })
    }

    /// Executes the request and returns the raw response.
    ///
    /// # Errors
    ///
    /// - the recorded configuration error, or [`Error::NoMethod`], without any network I/O
    /// - [`Error::Network`] if the transport fails
    /// - [`Error::Status`] if the status is not 200, 201, 202 or 204; its text is the
    ///   full response body
    pub async fn send(self) -> Result<reqwest::Response> {
        let (response, _) = self.execute().await?;
        Ok(response)
    }

    /// Executes the request and decodes the JSON response body into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`send`](Self::send) returns, plus
    /// [`Error::DeserializationFailed`] if the body does not decode.
    pub async fn load<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        Ok(self.fetch().await?.data)
    }

    /// Like [`load`](Self::load), but keeps the response metadata and raw body.
    pub async fn fetch<T>(self) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        let (response, latency) = self.execute().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let raw_body = response.text().await?;

        match serde_json::from_str::<T>(&raw_body) {
            Ok(data) => Ok(Response::new(data, raw_body, status, headers, latency)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %raw_body,
                    "Failed to deserialize response"
                );

                Err(Error::DeserializationFailed {
                    raw_response: raw_body,
                    serde_error: e.to_string(),
                    status,
                })
            }
        }
    }

    async fn execute(self) -> Result<(reqwest::Response, Duration)> {
        let prepared = self.state?;
        let Prepared { metadata, body } = prepared;
        let method = metadata.method.ok_or(Error::NoMethod)?;

        tracing::debug!(method = %method, url = %metadata.url, "Executing HTTP request");

        let mut request = self.http_client.request(method, metadata.url);

        let multipart = matches!(body, Body::Multipart(_));
        let authenticated = metadata.auth.is_enabled();
        for (name, value) in &metadata.headers {
            // reqwest writes the form's own content type
            if multipart && *name == CONTENT_TYPE {
                continue;
            }
            // configured credentials replace any Authorization header
            if authenticated && *name == AUTHORIZATION {
                continue;
            }
            request = request.header(name, value);
        }

        request = match metadata.auth {
            Auth::None => request,
            Auth::Basic { username, password } => request.basic_auth(username, Some(password)),
            Auth::Bearer { token } => request.bearer_auth(token),
        };

        request = match body {
            Body::Empty => request,
            Body::Json(bytes) => request.body(bytes),
            Body::Multipart(multipart) => request.multipart(multipart.form),
        };

        let start_time = Instant::now();
        let response = request.send().await?;
        let latency = start_time.elapsed();
        let status = response.status();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            "Received HTTP response"
        );

        if !is_accepted_status(status) {
            let headers = response.headers().clone();
            let raw_bytes = response.bytes().await?.to_vec();
            let raw_response = String::from_utf8_lossy(&raw_bytes).into_owned();

            if status.is_client_error() {
                tracing::error!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Client error (4xx)"
                );
            } else {
                tracing::warn!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Rejected response status"
                );
            }

            return Err(Error::Status {
                status,
                raw_response,
                raw_bytes,
                headers,
            });
        }

        Ok((response, latency))
    }
}
