//! The HTTP side of a small smart speaker: other devices on the network
//! trigger announcements with plain `GET` requests.
//! * One request per [TCP connection](crate::server::tcp::TcpServer), each on its own thread
//! * `/{resource}/{action}` [routing](crate::router::RouteTable) to handler groups
//! * Query string [binding](crate::binder) to string parameters
//! * [JSON envelopes](crate::envelope::Envelope) with [`serde_json`](serde_json)
//! * An [announcer](crate::announcer) speaking on demand and on the hour
//!
//! # Example
//! ```
//! use std::sync::Arc;
//!
//! use speakerd::io::ReadWriteAdapter;
//! use speakerd::prelude::*;
//! use speakerd::server::StreamServer;
//!
//! struct EchoController;
//!
//! impl EchoController {
//!     fn get(&self, args: &Arguments) -> HandlerResult {
//!         if args.get("text").is_empty() {
//!             return Ok(Envelope::error("nothing to echo"));
//!         }
//!         Envelope::ok(args.get("text"))
//!     }
//! }
//!
//! impl Controller for EchoController {
//!     const NAME: &'static str = "EchoController";
//!     fn resolve(_: &Services) -> Option<Self> {
//!         Some(EchoController)
//!     }
//!     fn actions() -> Vec<Action<Self>> {
//!         vec![Action::new("Get", &["text"], Self::get)]
//!     }
//! }
//!
//! fn main() {
//!     let routes = RouteTable::new().with_controller::<EchoController>().unwrap();
//!     let dispatcher = Dispatcher::new(Arc::new(routes), Arc::new(Services::new()));
//!
//!     let request = b"GET /echo?text=Hi HTTP/1.1\r\nHost: speaker\r\n\r\n";
//!     println!("Request:\n{}", std::str::from_utf8(request).unwrap());
//!     let mut write_buf = vec![];
//!     let stream = ReadWriteAdapter::new(&request[..], &mut write_buf);
//!     let mut server = StreamServer::new(stream, dispatcher);
//!     server.serve_one();
//!     println!("Response:\n{}", std::str::from_utf8(&write_buf[..]).unwrap());
//!     assert!(write_buf.ends_with(br#"{"result":"Hi"}"#));
//! }
//! ```
pub mod announcer;
pub mod binder;
pub mod controllers;
pub mod dispatcher;
pub mod envelope;
pub mod io;
pub mod prelude;
pub mod request;
pub mod response;
pub mod router;
pub mod runner;
pub mod server;
pub mod services;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub use crate::announcer::{Announcer, Floor};
pub use crate::dispatcher::{Dispatcher, Outcome};
pub use crate::envelope::{Envelope, Fault};
pub use crate::request::Request;
pub use crate::response::Response;
pub use crate::router::{Controller, RouteTable};
pub use crate::server::Server;
pub use crate::services::Services;
