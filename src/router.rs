//! Route table mapping `(resource, verb, action)` to handlers.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::binder::Arguments;
use crate::envelope::HandlerResult;
use crate::services::Services;

/// Suffix stripped from a handler group's name to get its resource name.
pub const GROUP_SUFFIX: &str = "controller";

/// Verb tokens a handler name may start with.
const VERBS: [&str; 9] = [
    "get", "head", "post", "put", "patch", "delete", "connect", "options", "trace",
];

#[derive(Debug, Clone, PartialEq)]
pub enum RouteError {
    Duplicate(RouteKey),
    BadHandlerName(String),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate(key) => write!(f, "route registered twice: {}", key),
            Self::BadHandlerName(name) => {
                write!(f, "handler name does not start with an HTTP verb: {}", name)
            }
        }
    }
}

/// Route lookup key. Components are stored lowercase so matching is
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub resource: String,
    pub verb: String,
    pub action: String,
}

impl RouteKey {
    pub fn new(resource: &str, verb: &str, action: &str) -> Self {
        Self {
            resource: resource.to_lowercase(),
            verb: verb.to_lowercase(),
            action: action.to_lowercase(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} /{}", self.verb.to_uppercase(), self.resource)?;
        if !self.action.is_empty() {
            write!(f, "/{}", self.action)?;
        }
        Ok(())
    }
}

/// Resource name for a handler group name: `SayController` -> `say`.
pub fn resource_name(group: &str) -> String {
    let group = group.to_lowercase();
    match group.strip_suffix(GROUP_SUFFIX) {
        Some(name) => name.to_string(),
        None => group,
    }
}

/// Split a handler name into its verb and action tokens:
/// `Get` -> `("get", "")`, `GetTime` and `get_time` -> `("get", "time")`.
pub fn split_handler_name(name: &str) -> Option<(String, String)> {
    let name = name.to_lowercase();
    VERBS.iter().find(|verb| name.starts_with(*verb)).map(|verb| {
        let action = name[verb.len()..].trim_start_matches('_');
        (verb.to_string(), action.to_string())
    })
}

pub type HandlerFn<G> = dyn Fn(&G, &Arguments) -> HandlerResult + Send + Sync;

/// A handler bound to a resolved handler group instance, ready to be
/// called once.
pub type Invocation = Box<dyn FnOnce(&Arguments) -> HandlerResult>;

/// One handler of a group: its name, which carries the verb and action,
/// and the names of its parameters in call order.
pub struct Action<G> {
    name: &'static str,
    params: &'static [&'static str],
    handler: Arc<HandlerFn<G>>,
}

impl<G> Action<G> {
    pub fn new<F>(name: &'static str, params: &'static [&'static str], handler: F) -> Self
    where
        F: Fn(&G, &Arguments) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            name,
            params,
            handler: Arc::new(handler),
        }
    }
}

/// A handler group. Instances are resolved from [`Services`] for every
/// request and dropped afterwards, so they hold no state across requests.
pub trait Controller: Sized + 'static {
    /// Declared name, the resource name is derived from it with
    /// [`resource_name`].
    const NAME: &'static str;
    /// `None` if a dependency is unavailable.
    fn resolve(services: &Services) -> Option<Self>;
    fn actions() -> Vec<Action<Self>>;
}

type Instantiate = dyn Fn(&Services) -> Option<Invocation> + Send + Sync;

pub struct Route {
    key: RouteKey,
    params: &'static [&'static str],
    instantiate: Box<Instantiate>,
}

impl Route {
    pub fn key(&self) -> &RouteKey {
        &self.key
    }
    pub fn params(&self) -> &'static [&'static str] {
        self.params
    }
    /// Resolve a fresh handler group instance and bind the handler to it.
    pub fn instantiate(&self, services: &Services) -> Option<Invocation> {
        (self.instantiate)(services)
    }
}

/// Routes are registered explicitly, one handler group at a time, and
/// the table is read-only once built.
///
/// # Example
/// ```
/// use speakerd::prelude::*;
///
/// struct PingController;
///
/// impl Controller for PingController {
///     const NAME: &'static str = "PingController";
///     fn resolve(_: &Services) -> Option<Self> {
///         Some(PingController)
///     }
///     fn actions() -> Vec<Action<Self>> {
///         vec![Action::new("Get", &["echo"], |_: &Self, args: &Arguments| {
///             Envelope::ok(&args[0])
///         })]
///     }
/// }
///
/// let routes = RouteTable::new().with_controller::<PingController>().unwrap();
/// assert!(routes.lookup("PING", "get", "").is_some());
/// assert!(routes.lookup("ping", "post", "").is_none());
/// ```
#[derive(Default)]
pub struct RouteTable {
    routes: HashMap<RouteKey, Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_controller<G: Controller>(mut self) -> Result<Self, RouteError> {
        self.register::<G>()?;
        Ok(self)
    }

    /// Register every action of the handler group `G`.
    pub fn register<G: Controller>(&mut self) -> Result<(), RouteError> {
        let resource = resource_name(G::NAME);
        for action in G::actions() {
            let (verb, name) = split_handler_name(action.name)
                .ok_or_else(|| RouteError::BadHandlerName(format!("{}::{}", G::NAME, action.name)))?;
            let key = RouteKey::new(&resource, &verb, &name);
            if self.routes.contains_key(&key) {
                return Err(RouteError::Duplicate(key));
            }
            let handler = action.handler;
            let instantiate = move |services: &Services| -> Option<Invocation> {
                let group = G::resolve(services)?;
                let handler = Arc::clone(&handler);
                Some(Box::new(move |args: &Arguments| handler(&group, args)))
            };
            self.routes.insert(
                key.clone(),
                Route {
                    key,
                    params: action.params,
                    instantiate: Box::new(instantiate),
                },
            );
        }
        Ok(())
    }

    /// Exact, case-insensitive match on all three components.
    pub fn lookup(&self, resource: &str, verb: &str, action: &str) -> Option<&Route> {
        self.routes.get(&RouteKey::new(resource, verb, action))
    }

    pub fn keys(&self) -> impl Iterator<Item = &RouteKey> {
        self.routes.keys()
    }
    pub fn len(&self) -> usize {
        self.routes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
