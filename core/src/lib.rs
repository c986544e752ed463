//! Request shaping over a platform HTTP client.
//!
//! # Overview
//! Builds `HttpRequest` values (URL + method + headers + encoded parameters)
//! and hands them to a `Transport` for execution. The crate owns no sockets,
//! connection pools, retries or response pipelines; those belong to the
//! transport, which by default is a `ureq` agent.
//!
//! # Design
//! - `HttpHeaders` is an ordered, case-insensitive header collection with
//!   upsert semantics.
//! - URL-like inputs (text, `Url`, `UrlComponents`) meet at `UrlConvertible`;
//!   anything that yields a finished request implements `RequestConvertible`.
//! - `ParameterEncoding` turns a parameter map into a JSON body or a
//!   form-urlencoded query/body.
//! - `Client` is the dispatch facade: build, submit, return. Build errors come
//!   back to the caller; responses only reach an optional completion callback.

pub mod client;
pub mod config;
pub mod encoding;
pub mod error;
pub mod header;
pub mod http;
pub mod request;
pub mod transport;
pub mod url_like;

pub use client::Client;
pub use config::{AgentInfo, ClientConfig};
pub use encoding::{Destination, JsonEncoding, JsonFormatting, ParameterEncoding, Parameters, UrlEncoding};
pub use error::NetworkError;
pub use header::{quality_encoded, HeaderName, HttpHeader, HttpHeaders};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::{Request, RequestConvertible};
pub use transport::{Completion, Transport, UreqTransport};
pub use url::Url;
pub use url_like::{UrlComponents, UrlConvertible, UrlLike};

/// Build a JSON-encoded request and submit it on the shared client.
///
/// Returns once the request is handed to the transport. The response is
/// discarded; use `Client::request_with` to receive it.
pub fn request(
    url: impl Into<UrlLike>,
    method: HttpMethod,
    headers: Option<HttpHeaders>,
    parameters: Option<Parameters>,
) -> Result<(), NetworkError> {
    Client::shared().request(url, method, headers, parameters)
}

/// `request` with GET and no headers or parameters.
pub fn get(url: impl Into<UrlLike>) -> Result<(), NetworkError> {
    Client::shared().get(url)
}
