//! `/say`: speak text on demand.
use std::sync::Arc;

use chrono::Local;

use crate::announcer::clock::time_phrase;
use crate::announcer::{Announcer, Floor};
use crate::binder::Arguments;
use crate::envelope::{Envelope, HandlerResult};
use crate::router::{Action, Controller};
use crate::services::Services;

pub struct SayController {
    announcer: Arc<dyn Announcer>,
}

impl SayController {
    /// `GET /say?text=..&floor=..`
    fn get(&self, args: &Arguments) -> HandlerResult {
        let (text, floor) = (&args[0], &args[1]);
        self.announcer.say(text, Floor::from_param(floor))?;
        Envelope::ok("OK")
    }

    /// `GET /say/time`
    fn get_time(&self, _: &Arguments) -> HandlerResult {
        self.announcer.say(&time_phrase(&Local::now()), Floor::Here)?;
        Envelope::ok("OK")
    }
}

impl Controller for SayController {
    const NAME: &'static str = "SayController";

    fn resolve(services: &Services) -> Option<Self> {
        let announcer = services.announcer()?;
        Some(Self { announcer })
    }

    fn actions() -> Vec<Action<Self>> {
        vec![
            Action::new("Get", &["text", "floor"], Self::get),
            Action::new("GetTime", &[], Self::get_time),
        ]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::announcer::test::RecordingAnnouncer;
    use crate::dispatcher::{Dispatcher, Outcome};
    use crate::request::Request;
    use crate::router::RouteTable;

    fn dispatch(announcer: Arc<RecordingAnnouncer>, line: &str) -> Outcome {
        let routes = RouteTable::new().with_controller::<SayController>().unwrap();
        let services = Services::new().with_announcer(announcer);
        Dispatcher::new(Arc::new(routes), Arc::new(services)).dispatch(&Request::parse(line))
    }

    fn ok() -> Outcome {
        Outcome::Success(Envelope::ok("OK").unwrap())
    }

    #[test]
    fn test_say_without_floor() {
        let announcer = Arc::new(RecordingAnnouncer::default());
        assert_eq!(dispatch(announcer.clone(), "GET /say?text=Hello HTTP/1.1"), ok());
        assert_eq!(announcer.spoken(), vec![("Hello".to_string(), Floor::Here)]);
    }

    #[test]
    fn test_say_floor_branches() {
        let announcer = Arc::new(RecordingAnnouncer::default());
        for line in &[
            "GET /say?text=Hello&floor=UP HTTP/1.1",
            "GET /say?floor=up&text=Hello HTTP/1.1",
            "GET /say?text=Hello&floor=basement HTTP/1.1",
            "GET /say?text=Hello&floor= HTTP/1.1",
        ] {
            assert_eq!(dispatch(announcer.clone(), line), ok());
        }
        let floors: Vec<Floor> = announcer.spoken().into_iter().map(|(_, f)| f).collect();
        assert_eq!(floors, vec![Floor::Up, Floor::Up, Floor::Down, Floor::Here]);
    }

    #[test]
    fn test_say_text_is_passed_verbatim() {
        let announcer = Arc::new(RecordingAnnouncer::default());
        dispatch(announcer.clone(), "GET /say?text=%20Dinner+is+READY%21 HTTP/1.1");
        assert_eq!(announcer.spoken()[0].0, " Dinner is READY!");
    }

    #[test]
    fn test_say_time() {
        let announcer = Arc::new(RecordingAnnouncer::default());
        assert_eq!(dispatch(announcer.clone(), "GET /say/time HTTP/1.1"), ok());
        assert!(announcer.spoken()[0].0.starts_with("Good "));
    }

    #[test]
    fn test_say_speech_failure() {
        let announcer = Arc::new(RecordingAnnouncer::failing("speaker unplugged"));
        assert_eq!(
            dispatch(announcer, "GET /say?text=Hello HTTP/1.1"),
            Outcome::Faulted("speech failed: speaker unplugged".to_string())
        );
    }

    #[test]
    fn test_say_wrong_verb() {
        let announcer = Arc::new(RecordingAnnouncer::default());
        assert_eq!(dispatch(announcer.clone(), "POST /say HTTP/1.1"), Outcome::RouteNotFound);
        assert!(announcer.spoken().is_empty());
    }

    #[test]
    fn test_say_without_announcer() {
        let routes = RouteTable::new().with_controller::<SayController>().unwrap();
        let dispatcher = Dispatcher::new(Arc::new(routes), Arc::new(Services::new()));
        assert_eq!(
            dispatcher.dispatch(&Request::parse("GET /say?text=Hello HTTP/1.1")),
            Outcome::RouteNotFound
        );
    }
}
