//! Reverse proxy to the web client.
//!
//! Requests that match no API route are forwarded to the client
//! application and its response is relayed back unchanged, apart from
//! framing headers that no longer describe the relayed body.

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, HeaderMap, HeaderName, Uri},
    response::Response,
};
use reqwest::redirect::Policy;
use std::time::Duration;
use url::Url;

use crate::web::error::ApiError;
use crate::{MailroomError, Result};

/// Largest request body forwarded to the client application.
const MAX_FORWARD_BODY: usize = 10 * 1024 * 1024;

/// Upstream request timeout.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Request headers not forwarded upstream.
const SKIP_REQUEST_HEADERS: &[HeaderName] = &[
    header::HOST,
    header::CONNECTION,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::ACCEPT_ENCODING,
];

/// Response headers not relayed back.
const SKIP_RESPONSE_HEADERS: &[HeaderName] = &[
    header::CONTENT_ENCODING,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::CONNECTION,
];

/// Forwards requests to the web client.
#[derive(Debug, Clone)]
pub struct ClientProxy {
    client: reqwest::Client,
    base: Url,
}

impl ClientProxy {
    /// Create a proxy to the client at `client_url`.
    pub fn new(client_url: &str) -> Result<Self> {
        let mut base = Url::parse(client_url)
            .map_err(|e| MailroomError::Config(format!("invalid client_url: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .map_err(|e| MailroomError::Config(format!("failed to build proxy client: {e}")))?;

        Ok(Self { client, base })
    }

    /// Base URL requests are forwarded to.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Map a request URI onto the client base.
    ///
    /// Only the path and query are taken from the request, so the scheme,
    /// host and port always stay those of `client_url`.
    fn upstream_url(&self, uri: &Uri) -> Url {
        let mut url = self.base.clone();
        let path = format!("{}{}", self.base.path(), uri.path().trim_start_matches('/'));
        url.set_path(&path);
        url.set_query(uri.query());
        url
    }

    /// Forward a request and relay the upstream response.
    pub async fn forward(&self, req: Request) -> std::result::Result<Response, ApiError> {
        let (parts, body) = req.into_parts();

        let url = self.upstream_url(&parts.uri);

        let body = to_bytes(body, MAX_FORWARD_BODY)
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read body: {e}")))?;

        let upstream = self
            .client
            .request(parts.method.clone(), url.clone())
            .headers(filter_headers(&parts.headers, SKIP_REQUEST_HEADERS))
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url = %url, error = %e, "Web client unreachable");
                ApiError::bad_gateway("Web client unavailable")
            })?;

        let status = upstream.status();
        let headers = filter_headers(upstream.headers(), SKIP_RESPONSE_HEADERS);
        let bytes = upstream.bytes().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Failed to read web client response");
            ApiError::bad_gateway("Web client unavailable")
        })?;

        tracing::debug!(method = %parts.method, url = %url, status = %status, "Proxied request");

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

fn filter_headers(headers: &HeaderMap, skip: &[HeaderName]) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !skip.contains(name) {
            filtered.append(name.clone(), value.clone());
        }
    }
    filtered
}
