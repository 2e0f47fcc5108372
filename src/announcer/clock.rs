//! Hourly time announcements.
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{Local, Timelike};
use log::{debug, info, warn};

use crate::announcer::{AnnounceError, Announcer, Floor};

/// Slack added to each sleep so the wake-up lands after the full hour.
const WAKE_MARGIN: Duration = Duration::from_millis(500);

/// Hours during which the clock stays silent, from `start` o'clock up to
/// but excluding `end` o'clock. The range may wrap past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietHours {
    pub start: u32,
    pub end: u32,
}

impl Default for QuietHours {
    fn default() -> Self {
        Self { start: 22, end: 7 }
    }
}

impl QuietHours {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
    pub fn contains(&self, hour: u32) -> bool {
        if self.start <= self.end {
            hour >= self.start && hour < self.end
        } else {
            hour >= self.start || hour < self.end
        }
    }
    pub fn is_quiet<T: Timelike>(&self, time: &T) -> bool {
        self.contains(time.hour())
    }
}

/// Spoken form of a time of day, on a 12-hour clock.
///
/// # Example
/// ```
/// use chrono::NaiveTime;
/// use speakerd::announcer::clock::time_phrase;
///
/// let time = NaiveTime::from_hms_opt(15, 0, 0).unwrap();
/// assert_eq!(time_phrase(&time), "Good afternoon, it's 3 o'clock.");
/// ```
pub fn time_phrase<T: Timelike>(time: &T) -> String {
    let hour = time.hour();
    let part_of_day = if hour <= 12 {
        "morning"
    } else if hour <= 17 {
        "afternoon"
    } else {
        "evening"
    };
    let hour = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    match time.minute() {
        0 => format!("Good {}, it's {} o'clock.", part_of_day, hour),
        minute => format!("Good {}, it's {} {}.", part_of_day, hour, minute),
    }
}

/// Time left until the next full hour.
pub fn until_next_hour<T: Timelike>(time: &T) -> Duration {
    let elapsed = Duration::new(
        u64::from(time.minute() * 60 + time.second()),
        time.nanosecond() % 1_000_000_000,
    );
    Duration::from_secs(3600)
        .checked_sub(elapsed)
        .unwrap_or_default()
}

/// Announces the time at start-up and then on every full hour, except
/// during quiet hours.
pub struct HourlyClock {
    announcer: Arc<dyn Announcer>,
    quiet_hours: QuietHours,
}

impl HourlyClock {
    pub fn new(announcer: Arc<dyn Announcer>, quiet_hours: QuietHours) -> Self {
        Self {
            announcer,
            quiet_hours,
        }
    }

    /// Announce `time` unless it falls in quiet hours. Returns whether
    /// anything was said.
    pub fn announce<T: Timelike>(&self, time: &T) -> Result<bool, AnnounceError> {
        if self.quiet_hours.is_quiet(time) {
            return Ok(false);
        }
        self.announcer.say(&time_phrase(time), Floor::Here)?;
        Ok(true)
    }

    /// Run the clock on its own thread, forever.
    pub fn spawn(self) -> io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("speakerd-clock".to_string())
            .spawn(move || loop {
                let now = Local::now();
                match self.announce(&now) {
                    Ok(true) => info!("announced {}", now.format("%H:%M")),
                    Ok(false) => debug!("quiet hours, skipped {}", now.format("%H:%M")),
                    Err(e) => warn!("clock announcement failed: {}", e),
                }
                thread::sleep(until_next_hour(&Local::now()) + WAKE_MARGIN);
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::announcer::test::RecordingAnnouncer;
    use chrono::NaiveTime;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_time_phrase() {
        assert_eq!(time_phrase(&at(7, 0)), "Good morning, it's 7 o'clock.");
        assert_eq!(time_phrase(&at(12, 30)), "Good morning, it's 12 30.");
        assert_eq!(time_phrase(&at(13, 5)), "Good afternoon, it's 1 5.");
        assert_eq!(time_phrase(&at(17, 59)), "Good afternoon, it's 5 59.");
        assert_eq!(time_phrase(&at(18, 0)), "Good evening, it's 6 o'clock.");
        assert_eq!(time_phrase(&at(0, 0)), "Good morning, it's 12 o'clock.");
    }

    #[test]
    fn test_quiet_hours_wrapping() {
        let quiet = QuietHours::default();
        assert!(quiet.contains(6));
        assert!(!quiet.contains(7));
        assert!(!quiet.contains(21));
        assert!(quiet.contains(22));
        assert!(quiet.contains(0));
    }

    #[test]
    fn test_quiet_hours_same_day() {
        let quiet = QuietHours::new(13, 15);
        assert!(!quiet.contains(12));
        assert!(quiet.contains(13));
        assert!(quiet.contains(14));
        assert!(!quiet.contains(15));
        assert!(!QuietHours::new(9, 9).contains(9));
    }

    #[test]
    fn test_until_next_hour() {
        assert_eq!(until_next_hour(&at(9, 0)), Duration::from_secs(3600));
        assert_eq!(until_next_hour(&at(9, 45)), Duration::from_secs(900));
        let time = NaiveTime::from_hms_milli_opt(9, 59, 59, 250).unwrap();
        assert_eq!(until_next_hour(&time), Duration::from_millis(750));
    }

    #[test]
    fn test_announce_outside_quiet_hours() {
        let announcer = Arc::new(RecordingAnnouncer::default());
        let clock = HourlyClock::new(announcer.clone(), QuietHours::default());
        assert_eq!(clock.announce(&at(8, 0)), Ok(true));
        assert_eq!(clock.announce(&at(23, 0)), Ok(false));
        assert_eq!(
            announcer.spoken(),
            vec![("Good morning, it's 8 o'clock.".to_string(), Floor::Here)]
        );
    }

    #[test]
    fn test_announce_failure() {
        let announcer = Arc::new(RecordingAnnouncer::failing("no speaker"));
        let clock = HourlyClock::new(announcer, QuietHours::default());
        assert_eq!(
            clock.announce(&at(10, 0)),
            Err(AnnounceError::new("no speaker"))
        );
    }
}
