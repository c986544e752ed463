//! Parameter encoders: JSON bodies and URL-form query strings or bodies.
//!
//! # Design
//! An encoder takes a base request and an optional parameter map and returns
//! the finished request. Absent parameters always leave the request exactly
//! as it came in. A `Content-Type` already set by the caller is never
//! overwritten.

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::NetworkError;
use crate::header::HeaderName;
use crate::http::HttpRequest;
use crate::request::RequestConvertible;

/// Request parameters: a JSON object.
pub type Parameters = serde_json::Map<String, Value>;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Strategy used to put parameters into a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterEncoding {
    Json(JsonEncoding),
    Url(UrlEncoding),
}

impl Default for ParameterEncoding {
    fn default() -> Self {
        ParameterEncoding::Json(JsonEncoding::default())
    }
}

impl ParameterEncoding {
    pub fn encode(
        &self,
        request: impl RequestConvertible,
        parameters: Option<&Parameters>,
    ) -> Result<HttpRequest, NetworkError> {
        match self {
            ParameterEncoding::Json(json) => json.encode(request, parameters),
            ParameterEncoding::Url(url) => url.encode(request, parameters),
        }
    }
}

impl From<JsonEncoding> for ParameterEncoding {
    fn from(encoding: JsonEncoding) -> Self {
        ParameterEncoding::Json(encoding)
    }
}

impl From<UrlEncoding> for ParameterEncoding {
    fn from(encoding: UrlEncoding) -> Self {
        ParameterEncoding::Url(encoding)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormatting {
    #[default]
    Compact,
    Pretty,
}

/// Serializes parameters as the JSON request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonEncoding {
    pub formatting: JsonFormatting,
}

impl JsonEncoding {
    pub fn pretty() -> Self {
        Self {
            formatting: JsonFormatting::Pretty,
        }
    }

    pub fn encode(
        &self,
        request: impl RequestConvertible,
        parameters: Option<&Parameters>,
    ) -> Result<HttpRequest, NetworkError> {
        self.encode_value(request, parameters)
    }

    /// Encode any serializable value as the body, not just a parameter map.
    pub fn encode_value<T: Serialize + ?Sized>(
        &self,
        request: impl RequestConvertible,
        value: Option<&T>,
    ) -> Result<HttpRequest, NetworkError> {
        let mut request = request.as_request()?;
        let Some(value) = value else {
            return Ok(request);
        };

        let data = match self.formatting {
            JsonFormatting::Compact => serde_json::to_vec(value),
            JsonFormatting::Pretty => serde_json::to_vec_pretty(value),
        }
        .map_err(NetworkError::EncodingFailed)?;

        if request.content_type().is_none() {
            request.set_header(HeaderName::ContentType.as_str(), JSON_CONTENT_TYPE);
        }
        tracing::debug!(url = %request.url, bytes = data.len(), "encoded JSON body");
        request.body = Some(data);
        Ok(request)
    }
}

/// Where URL-form parameters go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    /// Query string for GET, HEAD and DELETE; body for everything else.
    #[default]
    MethodDependent,
    QueryString,
    HttpBody,
}

/// Form-urlencodes parameters into the query string or the body.
///
/// Nested values are flattened with bracket keys: arrays become `key[]=v`
/// pairs and objects `key[sub]=v`. Booleans render as `true`/`false` and
/// nulls are dropped. Top-level keys come out in map order, which is sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UrlEncoding {
    pub destination: Destination,
}

impl UrlEncoding {
    pub fn query_string() -> Self {
        Self {
            destination: Destination::QueryString,
        }
    }

    pub fn http_body() -> Self {
        Self {
            destination: Destination::HttpBody,
        }
    }

    pub fn encode(
        &self,
        request: impl RequestConvertible,
        parameters: Option<&Parameters>,
    ) -> Result<HttpRequest, NetworkError> {
        let mut request = request.as_request()?;
        let pairs = match parameters {
            Some(parameters) if !parameters.is_empty() => query_pairs(parameters),
            _ => return Ok(request),
        };

        if self.in_query(&request) {
            request.url.query_pairs_mut().extend_pairs(&pairs);
            tracing::debug!(url = %request.url, "encoded form parameters into query");
        } else {
            let body = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&pairs)
                .finish();
            if request.content_type().is_none() {
                request.set_header(HeaderName::ContentType.as_str(), FORM_CONTENT_TYPE);
            }
            tracing::debug!(url = %request.url, bytes = body.len(), "encoded form body");
            request.body = Some(body.into_bytes());
        }
        Ok(request)
    }

    fn in_query(&self, request: &HttpRequest) -> bool {
        match self.destination {
            Destination::MethodDependent => request.method.encodes_in_query(),
            Destination::QueryString => true,
            Destination::HttpBody => false,
        }
    }
}

/// Flatten parameters into ordered `(key, value)` pairs, not yet escaped.
pub fn query_pairs(parameters: &Parameters) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in parameters {
        flatten(key, value, &mut pairs);
    }
    pairs
}

fn flatten(key: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((key.to_string(), b.to_string())),
        Value::Number(n) => pairs.push((key.to_string(), n.to_string())),
        Value::String(s) => pairs.push((key.to_string(), s.clone())),
        Value::Array(items) => {
            let key = format!("{key}[]");
            for item in items {
                flatten(&key, item, pairs);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                flatten(&format!("{key}[{sub}]"), item, pairs);
            }
        }
    }
}
