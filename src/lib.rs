//! # httpc - a fluent HTTP request builder
//!
//! httpc builds GET, JSON POST and multipart form POST requests on top of
//! `reqwest`, and decodes JSON responses. Configuration is chained on a
//! [`RequestBuilder`] and validated lazily: a bad URL, an unencodable body or an
//! empty bearer token does not fail at the call site. The first such failure is
//! kept in the builder, later configuration calls are ignored, and the error is
//! returned when the request is executed, before any network I/O happens.
//!
//! ## Quick Start
//!
//! ```no_run
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct CreateUser {
//!     name: String,
//!     email: String,
//! }
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), httpc::Error> {
//!     let user: User = httpc::get("https://api.example.com/users/123")
//!         .bearer_auth("my-token")
//!         .load()
//!         .await?;
//!     println!("User: {}", user.name);
//!
//!     let new_user = CreateUser {
//!         name: "Alice".to_string(),
//!         email: "alice@example.com".to_string(),
//!     };
//!     let created: User = httpc::post_json("https://api.example.com/users", &new_user)
//!         .add_headers([("X-Request-Id", "42")])
//!         .load()
//!         .await?;
//!     println!("Created user with ID: {}", created.id);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Headers
//!
//! Every request starts with `Content-Type: application/json;charset=UTF-8`.
//! Client default headers are applied next, then headers passed to
//! [`RequestBuilder::add_headers`], each overwriting earlier values for the same
//! name. Form requests replace the seed with their
//! `multipart/form-data; boundary=...` content type, which nothing can override.
//!
//! ## Status codes
//!
//! Only 200, 201, 202 and 204 count as success. Any other status is returned as
//! [`Error::Status`], whose text is the full response body:
//!
//! ```no_run
//! # async fn example() {
//! match httpc::get("https://api.example.com/missing").send().await {
//!     Ok(response) => println!("status {}", response.status()),
//!     Err(e) => eprintln!("{:?} {}", e.status(), e),
//! }
//! # }
//! ```

mod client;
mod error;
pub mod form;
mod metadata;
mod request;
mod response;

pub use client::{Client, ClientBuilder};
pub use error::{BuildError, Error, Result};
pub use form::{FormField, FormFile};
pub use metadata::{Auth, JSON_CONTENT_TYPE};
pub use request::{is_accepted_status, RequestBuilder};
pub use response::Response;

use serde::Serialize;
use std::io::Read;
use std::sync::OnceLock;

fn default_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(Client::new)
}

/// Starts a GET request on the shared default [`Client`].
pub fn get(url: impl AsRef<str>) -> RequestBuilder {
    default_client().get(url)
}

/// Starts a JSON POST request on the shared default [`Client`].
pub fn post_json<T>(url: impl AsRef<str>, body: &T) -> RequestBuilder
where
    T: Serialize + ?Sized,
{
    default_client().post_json(url, body)
}

/// Starts a multipart form POST request on the shared default [`Client`].
pub fn post_form<R, I>(url: impl AsRef<str>, file: FormFile<R>, fields: I) -> RequestBuilder
where
    R: Read,
    I: IntoIterator<Item = FormField>,
{
    default_client().post_form(url, file, fields)
}
