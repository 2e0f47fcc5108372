//! Route a parsed request to its handler and normalize the outcome.
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, warn};

use crate::binder::bind;
use crate::envelope::Envelope;
use crate::request::Request;
use crate::router::RouteTable;
use crate::services::Services;

/// Result of dispatching one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Envelope),
    /// No route matched, or the handler group could not be resolved.
    RouteNotFound,
    /// The handler failed or panicked, with the failure message.
    Faulted(String),
}

/// Cheap to clone, every connection gets its own handle on the shared
/// route table and services.
#[derive(Clone)]
pub struct Dispatcher {
    routes: Arc<RouteTable>,
    services: Arc<Services>,
}

impl Dispatcher {
    pub fn new(routes: Arc<RouteTable>, services: Arc<Services>) -> Self {
        Self { routes, services }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Never panics: handler panics are turned into [`Outcome::Faulted`].
    pub fn dispatch(&self, request: &Request) -> Outcome {
        match panic::catch_unwind(AssertUnwindSafe(|| self.invoke(request))) {
            Ok(outcome) => outcome,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                warn!("handler for {} {} panicked: {}", request.verb, request.path, message);
                Outcome::Faulted(message)
            }
        }
    }

    fn invoke(&self, request: &Request) -> Outcome {
        let route = match self
            .routes
            .lookup(&request.resource(), &request.verb, &request.action())
        {
            Some(route) => route,
            None => {
                debug!("no route for {} {}", request.verb, request.path);
                return Outcome::RouteNotFound;
            }
        };
        let invocation = match route.instantiate(&self.services) {
            Some(invocation) => invocation,
            None => {
                debug!("could not resolve handler group for {}", route.key());
                return Outcome::RouteNotFound;
            }
        };
        let args = bind(&request.query, route.params());
        debug!("invoking {} with {:?}", route.key(), args);
        match invocation(&args) {
            Ok(envelope) => Outcome::Success(envelope),
            Err(fault) => {
                warn!("handler for {} failed: {}", route.key(), fault);
                Outcome::Faulted(fault.to_string())
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}
