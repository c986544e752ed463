//! Boundary to the platform HTTP client.
//!
//! # Design
//! The core never performs I/O itself. A `Transport` receives a finished
//! `HttpRequest` and reports the outcome later through a completion
//! callback; how and where the request runs is its own business.
//! `UreqTransport` is the stock implementation: one detached thread per
//! request, driving a shared `ureq::Agent`.

use crate::error::NetworkError;
use crate::header::HttpHeaders;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use ureq::typestate::{WithBody, WithoutBody};

/// Callback receiving the outcome of one request.
pub type Completion = Box<dyn FnOnce(Result<HttpResponse, NetworkError>) + Send + 'static>;

/// Executes finished requests asynchronously.
pub trait Transport: Send + Sync {
    /// Start executing `request` and return without waiting for it.
    /// `completion` is called exactly once, from any thread.
    fn execute(&self, request: HttpRequest, completion: Completion);
}

impl<F> Transport for F
where
    F: Fn(HttpRequest, Completion) + Send + Sync,
{
    fn execute(&self, request: HttpRequest, completion: Completion) {
        self(request, completion)
    }
}

/// Transport backed by `ureq`.
///
/// Non-2xx statuses are delivered as responses, not errors; only failures
/// to get a response at all become `NetworkError::Transport`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl UreqTransport {
    pub fn new(agent: ureq::Agent) -> Self {
        Self { agent }
    }

    /// Run `request` on the calling thread. A body is sent whenever the
    /// request carries one, whatever the method.
    pub fn execute_blocking(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError> {
        let url = request.url.as_str();
        let headers = &request.headers;
        let body = request.body.as_deref();
        let result = match request.method {
            HttpMethod::Get => without_body(with_headers(self.agent.get(url), headers), body),
            HttpMethod::Delete => without_body(with_headers(self.agent.delete(url), headers), body),
            HttpMethod::Head => without_body(with_headers(self.agent.head(url), headers), body),
            HttpMethod::Options => without_body(with_headers(self.agent.options(url), headers), body),
            HttpMethod::Connect => without_body(with_headers(self.agent.connect(url), headers), body),
            HttpMethod::Trace => without_body(with_headers(self.agent.trace(url), headers), body),
            HttpMethod::Post => with_body(with_headers(self.agent.post(url), headers), body),
            HttpMethod::Put => with_body(with_headers(self.agent.put(url), headers), body),
            HttpMethod::Patch => with_body(with_headers(self.agent.patch(url), headers), body),
        };

        let mut response = result.map_err(|e| NetworkError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let headers: HttpHeaders = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = if request.method == HttpMethod::Head {
            Vec::new()
        } else {
            response
                .body_mut()
                .read_to_vec()
                .map_err(|e| NetworkError::Transport(e.to_string()))?
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest, completion: Completion) {
        let transport = self.clone();
        std::thread::spawn(move || {
            let method = request.method;
            let url = request.url.to_string();
            let result = transport.execute_blocking(request);
            match &result {
                Ok(response) => tracing::debug!(%method, %url, status = response.status, "request finished"),
                Err(e) => tracing::warn!(%method, %url, error = %e, "request failed"),
            }
            completion(result);
        });
    }
}

type UreqResult = Result<ureq::http::Response<ureq::Body>, ureq::Error>;

fn without_body(builder: ureq::RequestBuilder<WithoutBody>, body: Option<&[u8]>) -> UreqResult {
    match body {
        Some(body) => builder.force_send_body().send(body),
        None => builder.call(),
    }
}

fn with_body(builder: ureq::RequestBuilder<WithBody>, body: Option<&[u8]>) -> UreqResult {
    match body {
        Some(body) => builder.send(body),
        None => builder.send_empty(),
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &HttpHeaders) -> ureq::RequestBuilder<B> {
    for header in headers {
        builder = builder.header(header.name.as_str(), header.value.as_str());
    }
    builder
}
