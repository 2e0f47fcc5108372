//! Where each connection's unit of work executes.
use std::thread;

use log::error;

/// Spawns a detached thread per job, with no upper bound, so a slow or
/// stalled connection never holds up another one.
#[derive(Default)]
pub struct ThreadRunner {
    spawned: u64,
}

impl ThreadRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.spawned += 1;
        let spawned = thread::Builder::new()
            .name(format!("speakerd-conn-{}", self.spawned))
            .spawn(f);
        if let Err(e) = spawned {
            error!("could not spawn connection thread: {}", e);
        }
    }
}
