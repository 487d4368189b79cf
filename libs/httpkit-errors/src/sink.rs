//! Response sinks the encoder writes into

use std::io;

use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

/// Destination of one HTTP response.
///
/// Writes follow transport semantics: headers must be set before the status
/// line, and the status line is committed before the first body byte. What
/// happens when a caller breaks that order is up to the implementation.
pub trait ResponseSink: io::Write {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);

    fn write_status(&mut self, status: StatusCode);
}

/// In-memory response with transport-like commit semantics.
///
/// - header changes after the status line are ignored
/// - a second status line is ignored
/// - writing the body without a status line commits `200 OK`
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl BufferedResponse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Convert into an [`http::Response`], defaulting to `200 OK` when no
    /// status line was written.
    #[must_use]
    pub fn into_http(self) -> http::Response<Vec<u8>> {
        let mut resp = http::Response::new(self.body);
        *resp.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *resp.headers_mut() = self.headers;
        resp
    }
}

impl ResponseSink for BufferedResponse {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        if self.status.is_some() {
            tracing::warn!(header = %name, "header set after status line was written; ignored");
            return;
        }
        self.headers.insert(name, value);
    }

    fn write_status(&mut self, status: StatusCode) {
        if let Some(committed) = self.status {
            tracing::warn!(
                committed = committed.as_u16(),
                attempted = status.as_u16(),
                "superfluous status line write; ignored"
            );
            return;
        }
        self.status = Some(status);
    }
}

impl io::Write for BufferedResponse {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Axum integration: a buffered response is directly usable as a response
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for BufferedResponse {
    fn into_response(self) -> axum::response::Response {
        let (parts, body) = self.into_http().into_parts();
        axum::response::Response::from_parts(parts, axum::body::Body::from(body))
    }
}
