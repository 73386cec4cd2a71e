//! Blocking HTTPS transport backed by `ureq`.
//!
//! # Design
//! Every call builds its own agent, so no connection outlives the call that
//! opened it and a failure in one call cannot leak into the next. TLS uses
//! ureq's rustls defaults, which verify the certificate chain and hostname.
//! Non-2xx statuses are read as data and reported as `HttpStatus`.

use tracing::warn;

use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse, Transport};

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("eansearch-rust/", env!("CARGO_PKG_VERSION"));

/// Performs one blocking GET per call with a fresh `ureq::Agent`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl UreqTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();

        let mut call = agent.get(request.url.as_str()).header("User-Agent", USER_AGENT);
        for (name, value) in &request.headers {
            call = call.header(name.as_str(), value.as_str());
        }

        let mut response = call.call().map_err(|e| {
            warn!(op = request.op, error = %e, "EAN search request failed");
            ApiError::Transport(e.to_string())
        })?;

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
        let body = response.body_mut().read_to_string().map_err(|e| {
            warn!(op = request.op, error = %e, "reading EAN search response failed");
            ApiError::Transport(e.to_string())
        })?;

        if !(200..300).contains(&status) {
            warn!(op = request.op, status, "EAN search returned an error status");
            return Err(ApiError::HttpStatus { status, body });
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_names_the_crate_version() {
        assert!(USER_AGENT.starts_with("eansearch-rust/"));
        assert!(USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let request = HttpRequest {
            op: "verify-checksum",
            url: format!("http://127.0.0.1:{port}/api?op=verify-checksum&ean=1&token=t&format=json"),
            headers: Vec::new(),
        };
        let err = UreqTransport::new().execute(&request).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
    }
}
