//! Generic IO stream HTTP server.
use std::io::prelude::*;

use crate::{
    dispatcher::Dispatcher,
    request::Framing,
    server::{exchange, Exchange},
};

/// Serve one request over a generic stream, for example a
/// [`ReadWriteAdapter`](crate::io::ReadWriteAdapter) in tests.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use speakerd::io::ReadWriteAdapter;
/// use speakerd::prelude::*;
/// use speakerd::server::StreamServer;
///
/// let dispatcher = Dispatcher::new(Arc::new(RouteTable::new()), Arc::new(Services::new()));
/// let read_buf = b"GET /nowhere HTTP/1.1\r\nHost: speaker\r\n\r\n";
/// let mut write_buf = vec![];
/// let stream = ReadWriteAdapter::new(&read_buf[..], &mut write_buf);
/// let mut server = StreamServer::new(stream, dispatcher);
/// server.serve_one();
///
/// assert_eq!(
///     std::str::from_utf8(&write_buf[..]).unwrap(),
///     "HTTP/1.1 404 Not Found\r\n\
///      Content-Type: application/json; charset=utf-8\r\n\
///      Content-Length: 0\r\n\
///      Connection: close\r\n\
///      \r\n"
/// );
/// ```
pub struct StreamServer<S> {
    dispatcher: Dispatcher,
    stream: S,
    framing: Framing,
}

impl<S: Read + Write> StreamServer<S> {
    pub fn new(stream: S, dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            stream,
            framing: Framing::default(),
        }
    }
    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }
    pub fn serve_one(&mut self) -> Exchange {
        exchange(&mut self.stream, &self.dispatcher, self.framing)
    }
    pub fn into_inner(self) -> S {
        self.stream
    }
}
