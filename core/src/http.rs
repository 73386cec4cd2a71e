//! HTTP transport types and the `Transport` seam.
//!
//! # Design
//! Requests and responses are plain data. `EanSearch` builds an
//! `HttpRequest` for every operation without touching the network, hands it
//! to a `Transport`, and parses the returned `HttpResponse`. Production code
//! uses `UreqTransport`; tests plug in closures that return canned bodies.

use std::fmt;

use crate::error::Result;

/// A single GET against the service, described as plain data.
///
/// `url` already contains the complete query string, credential included.
/// The `Debug` output masks the credential.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Upstream operation id (`op=` value), kept separately for logging.
    pub op: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// The request URL with the `token` value replaced by `***`.
    pub fn redacted_url(&self) -> String {
        let Some(start) = self.url.rfind("&token=") else {
            return self.url.clone();
        };
        let value_start = start + "&token=".len();
        let value_end = self.url[value_start..]
            .find('&')
            .map_or(self.url.len(), |i| value_start + i);
        format!("{}***{}", &self.url[..value_start], &self.url[value_end..])
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("op", &self.op)
            .field("url", &self.redacted_url())
            .field("headers", &self.headers)
            .finish()
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// A 200 response carrying `body`, mostly useful for stubs.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

/// Executes exactly one request and returns the raw response.
///
/// Implementations own the connection for the duration of the call and must
/// release it before returning, on success and on failure alike.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self(request)
    }
}
