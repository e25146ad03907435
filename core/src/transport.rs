//! The seam between the I/O-free client and the network.
//!
//! A `Transport` turns an `HttpRequest` into an `HttpResponse`. It reports
//! only transport failures (`ApiError::Fetch`); every status code, including
//! 4xx and 5xx, comes back as data for `EventsClient::parse_*` to interpret.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes HTTP round-trips on behalf of `EventsSession`.
///
/// `execute` takes `&self` so independent operations may share one
/// transport. Implementations must not retry.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use super::Transport;
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a `ureq` agent.
    ///
    /// The agent has `http_status_as_error` disabled so 4xx/5xx responses are
    /// returned as data. Timeouts are ureq's defaults.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
        for (key, value) in headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        builder
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            let headers = &request.headers;
            let result = match (request.method, request.body.as_deref()) {
                (HttpMethod::Get, _) => with_headers(self.agent.get(&request.path), headers).call(),
                (HttpMethod::Delete, _) => with_headers(self.agent.delete(&request.path), headers).call(),
                (HttpMethod::Post, Some(body)) => {
                    with_headers(self.agent.post(&request.path), headers).send(body.as_bytes())
                }
                (HttpMethod::Post, None) => with_headers(self.agent.post(&request.path), headers).send_empty(),
            };
            let mut response = result.map_err(|e| ApiError::Fetch(e.to_string()))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| ApiError::Fetch(e.to_string()))?;

            Ok(HttpResponse { status, headers, body })
        }
    }
}
