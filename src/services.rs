//! Dependencies handed to handler groups when they are resolved.
use std::sync::Arc;

use crate::announcer::{Announcer, QuietHours};

/// Built once at start-up and shared read-only by every connection.
/// A handler group resolves whatever it needs from here on each request.
#[derive(Clone, Default)]
pub struct Services {
    announcer: Option<Arc<dyn Announcer>>,
    quiet_hours: QuietHours,
}

impl Services {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_announcer(mut self, announcer: Arc<dyn Announcer>) -> Self {
        self.announcer = Some(announcer);
        self
    }
    pub fn with_quiet_hours(mut self, quiet_hours: QuietHours) -> Self {
        self.quiet_hours = quiet_hours;
        self
    }
    pub fn announcer(&self) -> Option<Arc<dyn Announcer>> {
        self.announcer.clone()
    }
    pub fn quiet_hours(&self) -> QuietHours {
        self.quiet_hours
    }
}
