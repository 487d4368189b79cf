//! Error response encoding (JSON envelope or a single plaintext line)

use std::error::Error;
use std::io;

use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, StatusCode};

use crate::classify::{ClassifiedError, ErrorClassifier};
use crate::envelope::{ErrorEnvelope, FieldViolation};
use crate::sink::ResponseSink;

pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_PLAIN: &str = "text/plain";

/// Failure while writing a response body.
///
/// Entry points of [`ResponseEncoder`] log these instead of returning them:
/// by the time the body is written the status line is already committed.
#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    #[error("failed to serialize error envelope: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write response body: {0}")]
    Io(#[from] io::Error),
}

/// Whether the client should get a JSON error body.
///
/// A missing or empty `Accept` header selects JSON. Otherwise JSON is chosen
/// iff the first `Accept` value contains `*/*` or `application/json` as a
/// plain substring; media ranges and q-values are not parsed.
#[must_use]
pub fn accepts_json(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(ACCEPT) else {
        return true;
    };
    let accept = String::from_utf8_lossy(accept.as_bytes());
    accept.is_empty() || accept.contains("*/*") || accept.contains(APPLICATION_JSON)
}

/// Terminal writers for error responses.
///
/// Each entry point sets `Content-Type`, writes the status line and then
/// the body, in that order. Call at most one of them per response.
#[derive(Debug, Clone)]
pub struct ResponseEncoder {
    classifier: ErrorClassifier,
}

impl ResponseEncoder {
    #[must_use]
    pub fn new(classifier: ErrorClassifier) -> Self {
        Self { classifier }
    }

    #[must_use]
    pub fn classifier(&self) -> &ErrorClassifier {
        &self.classifier
    }

    /// Classify `err` and write it as a one-element JSON envelope.
    pub fn write_json_error<S>(&self, sink: &mut S, err: &(dyn Error + 'static))
    where
        S: ResponseSink + ?Sized,
    {
        self.write_classified(sink, self.classifier.classify(err));
    }

    /// Write an already classified error as a one-element JSON envelope.
    pub fn write_classified<S>(&self, sink: &mut S, classified: ClassifiedError)
    where
        S: ResponseSink + ?Sized,
    {
        let status = classified.http_status;
        write_envelope(sink, status, &ErrorEnvelope::single(classified));
    }

    /// Write field violations as a JSON envelope with `400 Bad Request`.
    ///
    /// An empty slice is a caller bug; it still produces a well-formed
    /// envelope with an empty `errors` list.
    pub fn write_validation_errors<S>(&self, sink: &mut S, violations: &[FieldViolation])
    where
        S: ResponseSink + ?Sized,
    {
        if violations.is_empty() {
            tracing::warn!("writing validation error response without violations");
        }
        write_envelope(
            sink,
            StatusCode::BAD_REQUEST,
            &ErrorEnvelope::from_violations(violations),
        );
    }

    /// Write `<name>: <message>` as `text/plain` with the classified status.
    pub fn write_plaintext_error<S>(&self, sink: &mut S, err: &(dyn Error + 'static))
    where
        S: ResponseSink + ?Sized,
    {
        let classified = self.classifier.classify(err);
        sink.set_header(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
        sink.write_status(classified.http_status);
        if let Err(e) = write!(sink, "{}: {err}", classified.type_name) {
            log_encode_failure(&EncodeError::Io(e));
        }
    }

    /// Pick JSON or plaintext from the request's `Accept` header.
    pub fn write_error<S>(
        &self,
        sink: &mut S,
        request_headers: &HeaderMap,
        err: &(dyn Error + 'static),
    ) where
        S: ResponseSink + ?Sized,
    {
        if accepts_json(request_headers) {
            self.write_json_error(sink, err);
        } else {
            self.write_plaintext_error(sink, err);
        }
    }
}

fn write_envelope<S>(sink: &mut S, status: StatusCode, envelope: &ErrorEnvelope)
where
    S: ResponseSink + ?Sized,
{
    sink.set_header(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    sink.write_status(status);
    if let Err(e) = encode_json(sink, envelope) {
        log_encode_failure(&e);
    }
}

fn encode_json<S>(sink: &mut S, envelope: &ErrorEnvelope) -> Result<(), EncodeError>
where
    S: ResponseSink + ?Sized,
{
    serde_json::to_writer(&mut *sink, envelope)?;
    sink.write_all(b"\n")?;
    Ok(())
}

fn log_encode_failure(err: &EncodeError) {
    tracing::error!(error = %err, "Error marshalling error response into output");
}
