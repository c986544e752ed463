//! Fire-and-forget dispatch facade.
//!
//! # Design
//! `Client` builds a request and hands it to its `Transport`, returning as
//! soon as the transport has it. A request that cannot be built is reported
//! to the caller and nothing is sent. Callers that care about the response
//! use `request_with` and get it through a completion callback.

use std::sync::OnceLock;

use crate::encoding::Parameters;
use crate::error::NetworkError;
use crate::header::HttpHeaders;
use crate::http::{HttpMethod, HttpResponse};
use crate::request::{Request, RequestConvertible};
use crate::transport::{Transport, UreqTransport};
use crate::url_like::UrlLike;

/// Builds requests and submits them to a transport.
#[derive(Debug, Clone, Default)]
pub struct Client<T = UreqTransport> {
    transport: T,
}

impl Client<UreqTransport> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide client backed by a single `ureq` agent.
    pub fn shared() -> &'static Client<UreqTransport> {
        static SHARED: OnceLock<Client<UreqTransport>> = OnceLock::new();
        SHARED.get_or_init(Client::new)
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build a JSON-encoded request and submit it, ignoring the outcome.
    pub fn request(
        &self,
        url: impl Into<UrlLike>,
        method: HttpMethod,
        headers: Option<HttpHeaders>,
        parameters: Option<Parameters>,
    ) -> Result<(), NetworkError> {
        self.request_with(url, method, headers, parameters, |_| {})
    }

    /// Like `request`, delivering the outcome to `completion`.
    pub fn request_with<F>(
        &self,
        url: impl Into<UrlLike>,
        method: HttpMethod,
        headers: Option<HttpHeaders>,
        parameters: Option<Parameters>,
        completion: F,
    ) -> Result<(), NetworkError>
    where
        F: FnOnce(Result<HttpResponse, NetworkError>) + Send + 'static,
    {
        let mut request = Request::new(url, method);
        request.headers = headers;
        request.parameters = parameters;
        self.dispatch(request, completion)
    }

    /// GET with no headers or parameters.
    pub fn get(&self, url: impl Into<UrlLike>) -> Result<(), NetworkError> {
        self.request(url, HttpMethod::Get, None, None)
    }

    /// Submit any request-convertible value.
    pub fn dispatch<F>(&self, request: impl RequestConvertible, completion: F) -> Result<(), NetworkError>
    where
        F: FnOnce(Result<HttpResponse, NetworkError>) + Send + 'static,
    {
        let request = request.as_request()?;
        tracing::info!(method = %request.method, url = %request.url, "dispatching request");
        self.transport.execute(request, Box::new(completion));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpRequest;
    use crate::transport::Completion;
    use std::sync::{Arc, Mutex};

    type Sent = Arc<Mutex<Vec<HttpRequest>>>;

    fn recording_client() -> (Client<impl Transport>, Sent) {
        let sent: Sent = Arc::default();
        let log = Arc::clone(&sent);
        let transport = move |request: HttpRequest, completion: Completion| {
            log.lock().unwrap().push(request);
            completion(Ok(HttpResponse {
                status: 200,
                headers: HttpHeaders::new(),
                body: b"ok".to_vec(),
            }));
        };
        (Client::with_transport(transport), sent)
    }

    #[test]
    fn request_submits_json_encoded() {
        let (client, sent) = recording_client();
        let params = serde_json::json!({"name": "x"}).as_object().cloned();
        client
            .request("https://api.test/items", HttpMethod::Post, None, params)
            .unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].content_type(), Some("application/json"));
        assert_eq!(sent[0].body.as_deref(), Some(br#"{"name":"x"}"#.as_slice()));
    }

    #[test]
    fn build_failure_is_reported_and_nothing_sent() {
        let (client, sent) = recording_client();
        let err = client.get("not a url").unwrap_err();
        assert!(matches!(err, NetworkError::InvalidUrl { .. }));
        assert!(sent.lock().unwrap().is_empty());
    }

    #[test]
    fn completion_receives_response() {
        let (client, _) = recording_client();
        let (tx, rx) = std::sync::mpsc::channel();
        client
            .request_with("https://api.test", HttpMethod::Get, None, None, move |result| {
                tx.send(result.map(|r| r.body)).unwrap();
            })
            .unwrap();
        assert_eq!(rx.recv().unwrap().unwrap(), b"ok".to_vec());
    }

    #[test]
    fn get_defaults() {
        let (client, sent) = recording_client();
        client.get("https://api.test/").unwrap();
        let sent = sent.lock().unwrap();
        assert_eq!(sent[0].method, HttpMethod::Get);
        assert!(sent[0].headers.is_empty());
        assert!(sent[0].body.is_none());
    }

    #[test]
    fn shared_client_is_reused() {
        assert!(std::ptr::eq(Client::shared(), Client::shared()));
    }
}
