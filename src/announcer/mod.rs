//! The speaking side of the device, consumed by handlers.
use std::fmt;
use std::io;

pub mod clock;
pub mod speech;

pub use clock::{HourlyClock, QuietHours};
pub use speech::{SpeechAnnouncer, SpeechConfig};

/// Which floor an announcement is meant for. Each floor is wired to one
/// stereo channel of the speaker output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Floor {
    /// Both channels.
    Here,
    /// Left channel only.
    Up,
    /// Right channel only.
    Down,
}

impl Floor {
    /// Interpret a raw `floor` query value: empty means here, "up" in any
    /// case means up, anything else means down.
    pub fn from_param(value: &str) -> Self {
        if value.is_empty() {
            Self::Here
        } else if value.eq_ignore_ascii_case("up") {
            Self::Up
        } else {
            Self::Down
        }
    }
    /// Stereo balance, -1 is full left, 1 full right.
    pub fn balance(self) -> i8 {
        match self {
            Self::Here => 0,
            Self::Up => -1,
            Self::Down => 1,
        }
    }
}

impl Default for Floor {
    fn default() -> Self {
        Self::Here
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnounceError {
    reason: String,
}

impl AnnounceError {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for AnnounceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "speech failed: {}", self.reason)
    }
}

impl From<io::Error> for AnnounceError {
    fn from(err: io::Error) -> Self {
        AnnounceError::new(&err.to_string())
    }
}

/// Turns text into spoken audio. Shared by every connection and the
/// hourly clock, so implementations must serialize their own playback.
pub trait Announcer: Send + Sync {
    fn say(&self, text: &str, floor: Floor) -> Result<(), AnnounceError>;
}
