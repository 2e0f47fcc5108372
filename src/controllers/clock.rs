//! `/clock`: what time the speaker would announce.
use chrono::Local;

use crate::announcer::clock::time_phrase;
use crate::announcer::QuietHours;
use crate::binder::Arguments;
use crate::envelope::{Envelope, HandlerResult};
use crate::router::{Action, Controller};
use crate::services::Services;

pub struct ClockController {
    quiet_hours: QuietHours,
}

impl ClockController {
    /// `GET /clock`, answered as a plain text page.
    fn get(&self, _: &Arguments) -> HandlerResult {
        Ok(Envelope::text(&time_phrase(&Local::now())))
    }

    /// `GET /clock/quiet`
    fn get_quiet(&self, _: &Arguments) -> HandlerResult {
        Envelope::ok(self.quiet_hours.is_quiet(&Local::now()))
    }
}

impl Controller for ClockController {
    const NAME: &'static str = "ClockController";

    fn resolve(services: &Services) -> Option<Self> {
        Some(Self {
            quiet_hours: services.quiet_hours(),
        })
    }

    fn actions() -> Vec<Action<Self>> {
        vec![
            Action::new("Get", &[], Self::get),
            Action::new("GetQuiet", &[], Self::get_quiet),
        ]
    }
}
