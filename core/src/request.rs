//! Request descriptors and the request-building step.
//!
//! # Design
//! `Request` captures everything needed to build one `HttpRequest` and is
//! consumed per call. Building resolves the target, attaches the caller's
//! headers verbatim, then lets the encoding strategy add the parameters.

use crate::encoding::{ParameterEncoding, Parameters};
use crate::error::NetworkError;
use crate::header::HttpHeaders;
use crate::http::{HttpMethod, HttpRequest};
use crate::url_like::UrlLike;

/// Anything that can produce a finished `HttpRequest`.
pub trait RequestConvertible {
    fn as_request(&self) -> Result<HttpRequest, NetworkError>;

    /// The request, or `None` if building failed.
    fn request(&self) -> Option<HttpRequest> {
        self.as_request().ok()
    }
}

impl RequestConvertible for HttpRequest {
    fn as_request(&self) -> Result<HttpRequest, NetworkError> {
        Ok(self.clone())
    }
}

impl<T: RequestConvertible + ?Sized> RequestConvertible for &T {
    fn as_request(&self) -> Result<HttpRequest, NetworkError> {
        (**self).as_request()
    }
}

/// Description of one request: target, method, headers, parameters and the
/// strategy used to encode them.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub url: UrlLike,
    pub method: HttpMethod,
    pub headers: Option<HttpHeaders>,
    pub parameters: Option<Parameters>,
    pub encoding: ParameterEncoding,
}

impl Request {
    /// A request with no headers or parameters, JSON-encoded.
    pub fn new(url: impl Into<UrlLike>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: None,
            parameters: None,
            encoding: ParameterEncoding::default(),
        }
    }

    pub fn headers(mut self, headers: HttpHeaders) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn encoding(mut self, encoding: impl Into<ParameterEncoding>) -> Self {
        self.encoding = encoding.into();
        self
    }
}

impl RequestConvertible for Request {
    fn as_request(&self) -> Result<HttpRequest, NetworkError> {
        let base = HttpRequest::new(&self.url, self.method, self.headers.clone())?;
        let request = self.encoding.encode(base, self.parameters.as_ref())?;
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            headers = request.headers.len(),
            "built request"
        );
        Ok(request)
    }
}
