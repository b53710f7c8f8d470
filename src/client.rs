//! Shared transport and the entry constructors for request builders.
//!
//! The [`Client`] type owns the HTTP transport (and with it the connection
//! pool) plus headers applied to every request it creates. Use
//! [`ClientBuilder`] to configure one.

use crate::form::{FormField, FormFile};
use crate::metadata::parse_header;
use crate::{Error, RequestBuilder, Result};
use http::header::USER_AGENT;
use http::{HeaderMap, Method};
use serde::Serialize;
use std::io::Read;
use std::sync::Arc;

/// Creates request builders that share one transport.
///
/// The client is cheap to clone and designed to be reused across many
/// requests and tasks.
///
/// # Examples
///
/// ```no_run
/// use httpc::{Client, FormField, FormFile};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Comment {
///     text: String,
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::builder()
///     .user_agent("my-app/1.0")?
///     .build()?;
///
/// // GET
/// let response = client.get("https://api.example.com/users/123").send().await?;
/// println!("status {}", response.status());
///
/// // POST with a JSON body
/// let comment = Comment { text: "hello".to_string() };
/// client
///     .post_json("https://api.example.com/comments", &comment)
///     .basic_auth("user", "secret")
///     .send()
///     .await?;
///
/// // POST a multipart form
/// client
///     .post_form(
///         "https://api.example.com/uploads",
///         FormFile::open("report.csv")?,
///         [FormField::new("project_id", "123456")],
///     )
///     .send()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    http_client: reqwest::Client,
    default_headers: HeaderMap,
}

impl Client {
    /// Creates a client with the default transport and no extra headers.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized, like
    /// `reqwest::Client::new`. Use [`Client::builder`] to handle that as an error.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http_client: reqwest::Client::new(),
                default_headers: HeaderMap::new(),
            }),
        }
    }

    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Headers applied to every request created by this client.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.inner.default_headers
    }

    /// Starts a request to `url` without an HTTP method.
    ///
    /// Sending it fails with [`Error::NoMethod`]; use [`get`](Self::get),
    /// [`post_json`](Self::post_json) or [`post_form`](Self::post_form) for
    /// requests that go out on the wire.
    pub fn request(&self, url: impl AsRef<str>) -> RequestBuilder {
        self.builder_for(None, url.as_ref())
    }

    /// Starts a GET request to `url`.
    pub fn get(&self, url: impl AsRef<str>) -> RequestBuilder {
        self.builder_for(Some(Method::GET), url.as_ref())
    }

    /// Starts a POST request to `url` whose body is `body` encoded as JSON.
    pub fn post_json<T>(&self, url: impl AsRef<str>, body: &T) -> RequestBuilder
    where
        T: Serialize + ?Sized,
    {
        self.builder_for(Some(Method::POST), url.as_ref())
            .with_json(body)
    }

    /// Starts a multipart POST request to `url`.
    ///
    /// The form holds the text `fields` in order, followed by `file` under the
    /// part name `"file"`.
    pub fn post_form<R, I>(&self, url: impl AsRef<str>, file: FormFile<R>, fields: I) -> RequestBuilder
    where
        R: Read,
        I: IntoIterator<Item = FormField>,
    {
        self.builder_for(Some(Method::POST), url.as_ref())
            .with_form(file, fields)
    }

    fn builder_for(&self, method: Option<Method>, url: &str) -> RequestBuilder {
        RequestBuilder::new(
            self.inner.http_client.clone(),
            &self.inner.default_headers,
            method,
            url,
        )
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use httpc::ClientBuilder;
///
/// # fn example() -> Result<(), httpc::Error> {
/// let client = ClientBuilder::new()
///     .default_header("X-Api-Version", "2")?
///     .user_agent("my-app/1.0")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    http_client: Option<reqwest::Client>,
    default_headers: HeaderMap,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header that will be included in all requests.
    ///
    /// Client headers are applied after the JSON content type seed and before
    /// any header added on an individual request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())
            .map_err(|e| Error::ConfigurationError(e.to_string()))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the `User-Agent` header for all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a valid header value.
    pub fn user_agent(self, value: impl AsRef<str>) -> Result<Self> {
        self.default_header(USER_AGENT.as_str(), value)
    }

    /// Uses a preconfigured transport instead of a default `reqwest::Client`.
    ///
    /// Proxies, TLS roots, timeouts and redirect policy all belong to the
    /// transport and are configured there.
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if no transport was supplied and the default one
    /// cannot be built.
    pub fn build(self) -> Result<Client> {
        let http_client = match self.http_client {
            Some(http_client) => http_client,
            None => reqwest::Client::builder().build().map_err(|e| {
                Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?,
        };

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                default_headers: self.default_headers,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;

    #[test]
    fn default_headers_reach_every_builder() {
        let client = Client::builder()
            .default_header("X-Api-Version", "2")
            .unwrap()
            .user_agent("httpc-tests")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(client.default_headers().len(), 2);
        assert!(Client::new().default_headers().is_empty());

        let builder = client.get("https://api.com/");
        let headers = builder.headers().unwrap();
        assert_eq!(headers["x-api-version"], "2");
        assert_eq!(headers[USER_AGENT], "httpc-tests");
        assert!(headers.contains_key(CONTENT_TYPE));
    }

    #[test]
    fn default_header_can_replace_content_type_seed() {
        let client = Client::builder()
            .default_header("Content-Type", "application/vnd.api+json")
            .unwrap()
            .build()
            .unwrap();

        let builder = client.get("https://api.com/");
        assert_eq!(
            builder.headers().unwrap()[CONTENT_TYPE],
            "application/vnd.api+json"
        );
    }

    #[test]
    fn invalid_default_header_is_a_configuration_error() {
        let result = Client::builder().default_header("X-Test", "bad\r\nvalue");
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }

    #[test]
    fn request_has_no_method() {
        let builder = Client::new().request("https://api.com/");
        assert!(builder.method().is_none());
        assert!(!builder.is_failed());
    }
}
