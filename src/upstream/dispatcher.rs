//! Upstream dispatch with a bounded timeout.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::Method;
use reqwest::redirect::Policy;

use crate::http::error::RelayError;
use crate::security::ForwardHeaders;

/// One outbound request.
#[derive(Debug)]
pub struct UpstreamRequest {
    pub method: Method,
    /// Fully derived target URL, query string included.
    pub url: String,
    pub headers: ForwardHeaders,
    pub body: Option<Bytes>,
}

/// HTTP client used for every upstream call.
///
/// The timeout bounds the whole exchange: waiting for headers and reading
/// the body, streamed or buffered. Redirects are never followed; a 3xx is
/// relayed like any other status.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;
        Ok(Self { client })
    }

    /// Send the request and return once response headers arrive.
    ///
    /// Fails with [`RelayError::Timeout`] or [`RelayError::Transport`]; any
    /// status code the upstream answers with is returned as a response.
    pub async fn dispatch(&self, request: UpstreamRequest) -> Result<reqwest::Response, RelayError> {
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            has_body = request.body.is_some(),
            "Dispatching upstream request"
        );

        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers.into_header_map());

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        tracing::debug!(
            url = %request.url,
            status = response.status().as_u16(),
            "Upstream responded"
        );

        Ok(response)
    }
}
