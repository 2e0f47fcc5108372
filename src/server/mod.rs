//! Listener and per-connection request handling.
use std::fmt;
use std::io;
use std::io::prelude::*;
use std::time::Duration;

use log::{debug, error, trace};

use crate::dispatcher::{Dispatcher, Outcome};
use crate::request::{read_request, Framing, Request};
use crate::response::Response;

pub mod stream;
pub mod tcp;

pub use stream::StreamServer;
pub use tcp::TcpServer;

/// Port the device has always listened on.
pub const DEFAULT_PORT: u16 = 8085;

#[derive(Debug)]
pub struct ServerError {
    message: String,
}

impl ServerError {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "server error: {}", &self.message)
    }
}

impl From<io::Error> for ServerError {
    fn from(err: io::Error) -> Self {
        ServerError::new(&format!("IOError({})", err))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to listen on, such as "0.0.0.0:8085".
    pub bind_addr: String,
    /// Socket read/write timeout, none by default.
    pub timeout: Option<Duration>,
    pub framing: Framing,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{}", DEFAULT_PORT),
            timeout: None,
            framing: Framing::default(),
        }
    }
}

pub trait Server {
    /// Accept and handle one connection, must be implemented.
    fn serve_one(&mut self) -> Result<(), ServerError>;
    /// Serve connections forever (default implementation). Errors are
    /// logged and never stop the loop.
    fn serve_forever(&mut self) {
        loop {
            if let Err(e) = self.serve_one() {
                error!("{}", e);
            }
        }
    }
}

/// What happened on one connection, for the access log.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub request: Request,
    pub status_code: u16,
    pub content_length: usize,
    /// Set when the response could not be written.
    pub write_error: Option<String>,
}

/// Run one read, dispatch, serialize and write cycle on `stream`. A
/// response is written whatever happens before it: read failures become a
/// 500 and handler failures are already folded into the outcome.
pub fn exchange<S: Read + Write>(
    stream: &mut S,
    dispatcher: &Dispatcher,
    framing: Framing,
) -> Exchange {
    let (request, outcome) = match read_request(stream, framing) {
        Ok(text) => {
            trace!("REQUEST {:?}", &text);
            let request = Request::parse(&text);
            debug!("dispatching {} {}", request.verb, request.path);
            let outcome = dispatcher.dispatch(&request);
            (request, outcome)
        }
        Err(e) => {
            error!("IO error reading request: {}", e);
            (Request::default(), Outcome::Faulted(e.to_string()))
        }
    };
    let response = Response::from(outcome);
    let status_code = response.status_code;
    let content_length = response.content_length();
    trace!("RESPONSE {:?}", &response);
    let written = stream
        .write_all(&response.into_bytes())
        .and_then(|_| stream.flush());
    if let Err(e) = &written {
        error!("IO error writing response: {}", e);
    }
    Exchange {
        request,
        status_code,
        content_length,
        write_error: written.err().map(|e| e.to_string()),
    }
}
