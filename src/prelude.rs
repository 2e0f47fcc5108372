pub use crate::binder::Arguments;
pub use crate::dispatcher::{Dispatcher, Outcome};
pub use crate::envelope::{Envelope, Fault, HandlerResult};
pub use crate::request::Request;
pub use crate::response::Response;
pub use crate::router::{Action, Controller, RouteTable};
pub use crate::server::Server;
pub use crate::services::Services;
