//! Uniform handler output and handler failures.
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::announcer::AnnounceError;

/// What every handler returns on success.
///
/// `Ok` and `Error` serialize as `{"result": ..}` and `{"error": ..}`, so a
/// serialized envelope never carries both keys. `Text` is sent as-is and
/// ends up HTML-wrapped by the response serializer unless it looks like a
/// JSON object.
///
/// # Example
/// ```
/// use speakerd::envelope::Envelope;
///
/// let ok = Envelope::ok("OK").unwrap();
/// assert_eq!(ok.payload().unwrap(), r#"{"result":"OK"}"#);
///
/// let error = Envelope::error("nothing to say");
/// assert_eq!(error.payload().unwrap(), r#"{"error":"nothing to say"}"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Ok(Value),
    Error(String),
    /// Plain text, written to the body as-is rather than as a JSON string,
    /// so it arrives HTML-wrapped without surrounding quotes.
    Text(String),
}

pub type HandlerResult = Result<Envelope, Fault>;

impl Envelope {
    pub fn ok<T: serde::Serialize>(result: T) -> HandlerResult {
        Ok(Self::Ok(serde_json::to_value(result)?))
    }
    pub fn error(message: &str) -> Self {
        Self::Error(message.to_string())
    }
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }
    /// Response body for this envelope.
    pub fn payload(&self) -> Result<String, Fault> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            _ => Ok(serde_json::to_string(self)?),
        }
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Ok(result) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("result", result)?;
                map.end()
            }
            Self::Error(error) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", error)?;
                map.end()
            }
            Self::Text(text) => serializer.serialize_str(text),
        }
    }
}

/// A handler failure, reported to the client as a 500.
#[derive(Debug, Clone, PartialEq)]
pub struct Fault {
    message: String,
}

impl Fault {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<&str> for Fault {
    fn from(message: &str) -> Self {
        Fault::new(message)
    }
}

impl From<String> for Fault {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<serde_json::Error> for Fault {
    fn from(err: serde_json::Error) -> Self {
        Fault::new(&err.to_string())
    }
}

impl From<AnnounceError> for Fault {
    fn from(err: AnnounceError) -> Self {
        Fault::new(&err.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_omits_error() {
        let payload = Envelope::ok(json!({"spoken": 2})).unwrap().payload().unwrap();
        assert_eq!(payload, r#"{"result":{"spoken":2}}"#);
        assert!(!payload.contains("error"));
    }

    #[test]
    fn test_error_omits_result() {
        let payload = Envelope::error("too loud").payload().unwrap();
        assert_eq!(payload, r#"{"error":"too loud"}"#);
        assert!(!payload.contains("result"));
    }

    #[test]
    fn test_text_is_raw() {
        let payload = Envelope::text("line\r\nbreak").payload().unwrap();
        assert_eq!(payload, "line\r\nbreak");
    }

    #[test]
    fn test_ok_unit_is_null_result() {
        let payload = Envelope::ok(()).unwrap().payload().unwrap();
        assert_eq!(payload, r#"{"result":null}"#);
    }

    #[test]
    fn test_ok_unserializable() {
        let mut map = std::collections::HashMap::new();
        map.insert((1, 2), "pair keys are not valid JSON keys");
        assert!(Envelope::ok(map).is_err());
    }

    #[test]
    fn test_fault_from_announce_error() {
        let fault: Fault = AnnounceError::new("speaker unplugged").into();
        assert_eq!(fault.message(), "speech failed: speaker unplugged");
    }
}
