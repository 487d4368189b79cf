#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests: inventory-registered errors flowing through the
//! classifier into JSON and plaintext responses.

use std::io;
use std::sync::Arc;

use http::header::CONTENT_TYPE;
use http::{HeaderName, HeaderValue, StatusCode};
use httpkit_errors::{
    AppError, BufferedResponse, ErrorClassifier, ErrorEnvelope, ErrorsConfig, FieldViolation,
    HttpStatusEquivalent, Named, ResponseEncoder, ResponseSink,
};

// ---------- Errors registered through the inventory (module scope) ----------

#[derive(Debug, thiserror::Error)]
#[error("user {0} does not exist")]
pub struct UserNotFound(pub String);

impl HttpStatusEquivalent for UserNotFound {
    fn status_code(&self) -> StatusCode {
        StatusCode::NOT_FOUND
    }
}

httpkit_errors::register_error!(UserNotFound: http_status);

#[derive(Debug, thiserror::Error)]
#[error("slow down")]
pub struct RateLimited;

impl Named for RateLimited {
    fn name(&self) -> &str {
        "rate_limited"
    }
}

impl HttpStatusEquivalent for RateLimited {
    fn status_code(&self) -> StatusCode {
        StatusCode::TOO_MANY_REQUESTS
    }
}

httpkit_errors::register_error!(RateLimited: named, http_status);

#[derive(Debug, thiserror::Error)]
#[error("disk on fire")]
pub struct StorageFailure;

httpkit_errors::register_error!(StorageFailure);

// ---------- Helpers ----------

fn encoder(snake_case: bool) -> ResponseEncoder {
    let config = ErrorsConfig {
        snake_case_status_names: snake_case,
        ..ErrorsConfig::default()
    };
    ResponseEncoder::new(ErrorClassifier::new(Arc::new(config)))
}

fn decode(resp: &BufferedResponse) -> ErrorEnvelope {
    serde_json::from_slice(resp.body()).unwrap()
}

#[derive(Debug, PartialEq, Eq)]
enum Event {
    Header(String),
    Status(u16),
    Body,
}

/// Records the order in which the encoder touches the sink.
#[derive(Default)]
struct RecordingSink {
    events: Vec<Event>,
    body: Vec<u8>,
}

impl ResponseSink for RecordingSink {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.events
            .push(Event::Header(format!("{name}: {}", value.to_str().unwrap())));
    }

    fn write_status(&mut self, status: StatusCode) {
        self.events.push(Event::Status(status.as_u16()));
    }
}

impl io::Write for RecordingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.events.last() != Some(&Event::Body) {
            self.events.push(Event::Body);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ---------- Classification through the inventory ----------

#[test]
fn inventory_registrations_are_visible() {
    let classifier = ErrorClassifier::new(Arc::new(ErrorsConfig::default()));

    let c = classifier.classify(&UserNotFound("42".to_owned()));
    assert!(c.type_name.ends_with("::UserNotFound"), "{}", c.type_name);
    assert_eq!(c.http_status, StatusCode::NOT_FOUND);

    let c = classifier.classify(&StorageFailure);
    assert!(c.type_name.ends_with("::StorageFailure"), "{}", c.type_name);
    assert_eq!(c.http_status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn unregistered_dyn_error_uses_fallback() {
    let classifier = ErrorClassifier::new(Arc::new(ErrorsConfig::default()));
    let err = io::Error::other("boom");
    let c = classifier.classify(&err);
    assert_eq!(c.type_name, "error");
    assert_eq!(c.http_status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(c.description, "boom");
}

// ---------- JSON path ----------

#[test]
fn json_error_writes_headers_then_status_then_body() {
    let mut sink = RecordingSink::default();
    encoder(true).write_json_error(&mut sink, &UserNotFound("7".to_owned()));

    assert_eq!(
        sink.events,
        vec![
            Event::Header("content-type: application/json".to_owned()),
            Event::Status(404),
            Event::Body,
        ]
    );
    let body: serde_json::Value = serde_json::from_slice(&sink.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"errors": [{
            "error": "not_found",
            "description": "user 7 does not exist"
        }]})
    );
}

#[test]
fn named_error_keeps_its_name_in_json() {
    for snake_case in [false, true] {
        let mut resp = BufferedResponse::new();
        encoder(snake_case).write_json_error(&mut resp, &RateLimited);

        assert_eq!(resp.status(), Some(StatusCode::TOO_MANY_REQUESTS));
        let env = decode(&resp);
        assert_eq!(env.errors.len(), 1);
        assert_eq!(env.errors[0].error, "rate_limited");
        assert_eq!(env.errors[0].description, "slow down");
    }
}

#[test]
fn app_error_json_carries_code() {
    let mut resp = BufferedResponse::new();
    encoder(false).write_json_error(&mut resp, &AppError::json("unexpected EOF"));

    assert_eq!(resp.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
    let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"errors": [{
            "error": "json",
            "errorCode": 9001,
            "description": "unexpected EOF"
        }]})
    );
}

// ---------- Validation path ----------

fn violation(field: &str, description: &str) -> FieldViolation {
    FieldViolation {
        field: field.to_owned(),
        description: description.to_owned(),
        error_name: "validation".to_owned(),
        error_code: 8000,
    }
}

#[test]
fn validation_errors_round_trip() {
    let violations = vec![
        violation("email", "must not be empty"),
        violation("age", "must be numeric"),
        violation("city", "unknown city"),
    ];
    let mut resp = BufferedResponse::new();
    encoder(false).write_validation_errors(&mut resp, &violations);

    assert_eq!(resp.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");

    let env = decode(&resp);
    assert_eq!(env.errors.len(), violations.len());
    for (item, v) in env.errors.iter().zip(&violations) {
        assert_eq!(item.field, v.field);
        assert_eq!(item.description, v.description);
        assert_eq!(item.error, "validation");
        assert_eq!(item.error_code, 8000);
    }
}

#[test]
fn empty_violation_list_still_encodes() {
    let mut resp = BufferedResponse::new();
    encoder(false).write_validation_errors(&mut resp, &[]);

    assert_eq!(resp.status(), Some(StatusCode::BAD_REQUEST));
    assert!(decode(&resp).errors.is_empty());
}

// ---------- Plaintext path ----------

#[test]
fn plaintext_is_name_and_message() {
    let mut sink = RecordingSink::default();
    encoder(true).write_plaintext_error(&mut sink, &UserNotFound("9".to_owned()));

    assert_eq!(
        sink.events,
        vec![
            Event::Header("content-type: text/plain".to_owned()),
            Event::Status(404),
            Event::Body,
        ]
    );
    let body = String::from_utf8(sink.body).unwrap();
    assert_eq!(body, "not_found: user 9 does not exist");
    assert!(!body.contains('\n'));
}

#[test]
fn negotiated_write_defaults_to_json() {
    let mut resp = BufferedResponse::new();
    encoder(false).write_error(&mut resp, &http::HeaderMap::new(), &RateLimited);
    assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
    assert_eq!(decode(&resp).errors[0].error, "rate_limited");
}
