//! HTTP response and serialization of dispatch outcomes.
use serde_json::json;

use crate::dispatcher::Outcome;

pub mod status;

pub const APPLICATION_JSON: &str = "application/json; charset=utf-8";
pub const TEXT_HTML: &str = "text/html; charset=utf-8";

/// Title of the page wrapping non-JSON payloads.
pub const HTML_TITLE: &str = "Smart Speaker";

/// An HTTP response. Always sent with `Connection: close`.
///
/// # Example
/// ```
/// # use speakerd::response::{Response, APPLICATION_JSON};
///
/// let response = Response::new(200).with_payload(b"{}".to_vec());
///
/// # assert_eq!(response.content_length(), 2);
/// # assert_eq!(response.content_type(), APPLICATION_JSON);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status_code: u16,
    pub status: String,
    content_type: String,
    pub payload: Vec<u8>,
}

impl Response {
    /// Create a new, empty JSON response. Status is set to the default
    /// status for the given code (200 -> "OK", etc.)
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            status: status::default(status_code),
            content_type: APPLICATION_JSON.to_string(),
            payload: vec![],
        }
    }
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = content_type.to_string();
        self
    }
    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
    pub fn content_length(&self) -> usize {
        self.payload.len()
    }

    /// A successful response for an already serialized payload. Payloads
    /// that do not start with `{` are wrapped in an HTML page, with CRLF
    /// turned into line breaks.
    pub fn from_payload(payload: String) -> Self {
        if payload.starts_with('{') {
            Self::new(200).with_payload(payload.into_bytes())
        } else {
            let body = format!(
                "<html><head><title>{}</title></head><body>{}</body></html>",
                HTML_TITLE,
                payload.replace("\r\n", "<br/>")
            );
            Self::new(200)
                .with_content_type(TEXT_HTML)
                .with_payload(body.into_bytes())
        }
    }

    pub fn not_found() -> Self {
        Self::new(404)
    }

    /// A 500 with body `{"Error": message}`.
    pub fn fault(message: &str) -> Self {
        Self::new(500).with_payload(json!({ "Error": message }).to_string().into_bytes())
    }

    /// Write HTTP response bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        let head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status_code,
            self.status,
            self.content_type,
            self.content_length()
        );
        let mut bytes = head.into_bytes();
        bytes.extend(self.payload);
        bytes
    }
}

impl From<Outcome> for Response {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success(envelope) => match envelope.payload() {
                Ok(payload) => Response::from_payload(payload),
                Err(fault) => Response::fault(fault.message()),
            },
            Outcome::RouteNotFound => Response::not_found(),
            Outcome::Faulted(message) => Response::fault(&message),
        }
    }
}
