//! HTTP request line and parser.
use std::borrow::Cow;

use url::Url;

pub use reader::{read_request, Framing};

pub mod reader;

/// Authority the request target is resolved against.
const BASE_AUTHORITY: &str = "http://localhost";

/// A parsed request. Only the request line is kept, headers and body
/// are ignored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Request {
    pub verb: String,
    pub path: String,
    pub query: String,
}

impl Request {
    /// Parse buffered request text. This never fails: missing or
    /// malformed components are left empty and routing decides what
    /// to do with them.
    ///
    /// # Example
    /// ```
    /// use speakerd::request::Request;
    ///
    /// let request = Request::parse("GET /say/time?text=hi HTTP/1.1\r\nHost: speaker\r\n\r\n");
    /// assert_eq!(request.verb, "GET");
    /// assert_eq!(request.resource(), "say");
    /// assert_eq!(request.action(), "time");
    /// assert_eq!(request.query, "text=hi");
    /// ```
    pub fn parse(text: &str) -> Self {
        let mut tokens = text.split_whitespace();
        let verb = tokens.next().unwrap_or_default().to_string();
        let target = tokens.next().unwrap_or_default();
        let (path, query) = resolve_target(target);
        Self { verb, path, query }
    }

    /// First path segment, names the handler group.
    pub fn resource(&self) -> Cow<'_, str> {
        self.segment(0)
    }

    /// Second path segment, empty for the default action.
    pub fn action(&self) -> Cow<'_, str> {
        self.segment(1)
    }

    fn segment(&self, index: usize) -> Cow<'_, str> {
        let path = self.path.strip_prefix('/').unwrap_or(&self.path);
        match path.split('/').nth(index) {
            Some(segment) => urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment)),
            None => Cow::Borrowed(""),
        }
    }
}

/// Split a request target into path and query using standard URI rules.
fn resolve_target(target: &str) -> (String, String) {
    match Url::parse(&format!("{}{}", BASE_AUTHORITY, target)) {
        Ok(url) => (
            url.path().to_string(),
            url.query().unwrap_or_default().to_string(),
        ),
        Err(_) => (String::new(), String::new()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn request(verb: &str, path: &str, query: &str) -> Request {
        Request {
            verb: verb.to_string(),
            path: path.to_string(),
            query: query.to_string(),
        }
    }

    #[test]
    fn test_parse_default_action() {
        let req = Request::parse("GET /say?text=Hello&floor=up HTTP/1.1\r\n\r\n");
        assert_eq!(req, request("GET", "/say", "text=Hello&floor=up"));
        assert_eq!(req.resource(), "say");
        assert_eq!(req.action(), "");
    }

    #[test]
    fn test_parse_named_action() {
        let req = Request::parse("POST /clock/quiet HTTP/1.1\r\nContent-Length: 0\r\n\r\n");
        assert_eq!(req, request("POST", "/clock/quiet", ""));
        assert_eq!(req.action(), "quiet");
    }

    #[test]
    fn test_parse_decodes_path_segments() {
        let req = Request::parse("GET /living%20room/on HTTP/1.1\r\n\r\n");
        assert_eq!(req.resource(), "living room");
        assert_eq!(req.action(), "on");
    }

    #[test]
    fn test_parse_keeps_query_raw() {
        let req = Request::parse("GET /say?text=Hi+there&floor=UP HTTP/1.1\r\n\r\n");
        assert_eq!(req.query, "text=Hi+there&floor=UP");
    }

    #[test]
    fn test_parse_root() {
        let req = Request::parse("GET / HTTP/1.1\r\n\r\n");
        assert_eq!(req.resource(), "");
        assert_eq!(req.action(), "");
    }

    #[test]
    fn test_parse_garbage_is_empty() {
        assert_eq!(Request::parse(""), request("", "/", ""));
        let req = Request::parse("GET");
        assert_eq!(req.verb, "GET");
        assert_eq!(req.path, "/");
        assert_eq!(req.resource(), "");
    }

    #[test]
    fn test_parse_bad_authority() {
        let req = Request::parse("GET :notaport HTTP/1.1");
        assert_eq!(req, request("GET", "", ""));
    }
}
