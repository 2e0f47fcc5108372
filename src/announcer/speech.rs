//! Announcer backed by an external synthesizer piped into an audio player.
use std::io::prelude::*;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Mutex;

use log::debug;

use crate::announcer::{AnnounceError, Announcer, Floor};

/// Female English voice, used when none is configured.
pub const DEFAULT_VOICE: &str = "en+f3";

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechConfig {
    /// Synthesizer program, must understand espeak-ng's `-v`, `--stdin`
    /// and `--stdout` flags.
    pub synthesizer: String,
    pub voice: Option<String>,
    /// Player program, must understand sox `play` arguments.
    pub player: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            synthesizer: "espeak-ng".to_string(),
            voice: None,
            player: "play".to_string(),
        }
    }
}

pub struct SpeechAnnouncer {
    config: SpeechConfig,
    playback: Mutex<()>,
}

impl SpeechAnnouncer {
    pub fn new(config: SpeechConfig) -> Self {
        Self {
            config,
            playback: Mutex::new(()),
        }
    }

    fn synthesizer_args(&self) -> Vec<String> {
        let voice = self.config.voice.as_deref().unwrap_or(DEFAULT_VOICE);
        vec![
            "-v".to_string(),
            voice.to_string(),
            "--stdin".to_string(),
            "--stdout".to_string(),
        ]
    }

    fn player_args(floor: Floor) -> Vec<String> {
        let mut args: Vec<String> = ["-q", "-t", "wav", "-"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let channels = match floor.balance() {
            b if b < 0 => Some(["1", "0"]),
            b if b > 0 => Some(["0", "1"]),
            _ => None,
        };
        if let Some([left, right]) = channels {
            args.extend(vec!["remix".to_string(), left.to_string(), right.to_string()]);
        }
        args
    }
}

/// Stop a child that is no longer needed and collect its exit status.
fn reap(child: &mut Child) {
    child.kill().ok();
    child.wait().ok();
}

fn check(program: &str, status: ExitStatus) -> Result<(), AnnounceError> {
    if status.success() {
        Ok(())
    } else {
        Err(AnnounceError::new(&format!("{} exited with {}", program, status)))
    }
}

impl Announcer for SpeechAnnouncer {
    fn say(&self, text: &str, floor: Floor) -> Result<(), AnnounceError> {
        let _playback = self
            .playback
            .lock()
            .map_err(|_| AnnounceError::new("playback lock poisoned"))?;
        debug!("saying {:?} on {:?}", text, floor);

        let mut synthesizer = Command::new(&self.config.synthesizer)
            .args(self.synthesizer_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let audio = synthesizer
            .stdout
            .take()
            .ok_or_else(|| AnnounceError::new("synthesizer has no output"))?;
        let mut player = match Command::new(&self.config.player)
            .args(Self::player_args(floor))
            .stdin(Stdio::from(audio))
            .spawn()
        {
            Ok(player) => player,
            Err(e) => {
                reap(&mut synthesizer);
                return Err(e.into());
            }
        };

        // Dropping stdin closes it, which ends synthesis.
        if let Some(mut stdin) = synthesizer.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                drop(stdin);
                reap(&mut synthesizer);
                reap(&mut player);
                return Err(e.into());
            }
        }
        let synthesized = synthesizer.wait();
        let played = player.wait();
        check(&self.config.synthesizer, synthesized?)?;
        check(&self.config.player, played?)
    }
}
