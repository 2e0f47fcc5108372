use std::process;
use std::sync::Arc;
use std::time::Duration;

use log::*;
use structopt::StructOpt;

use speakerd::announcer::{Announcer, HourlyClock, QuietHours, SpeechAnnouncer, SpeechConfig};
use speakerd::controllers;
use speakerd::prelude::*;
use speakerd::request::Framing;
use speakerd::server::{ServerConfig, TcpServer};

#[derive(Debug, StructOpt)]
#[structopt(name = "speakerd", about = "Smart speaker announcement service.")]
struct Opt {
    #[structopt(long, default_value = "0.0.0.0")]
    bind: String,
    #[structopt(short, long, default_value = "8085")]
    port: u16,
    /// Socket timeout in seconds, 0 for none
    #[structopt(long, default_value = "0")]
    timeout: u64,
    /// delimited or short-read
    #[structopt(long, default_value = "delimited")]
    framing: Framing,
    /// Synthesizer voice, a female English voice if unset
    #[structopt(long)]
    voice: Option<String>,
    #[structopt(long, default_value = "espeak-ng")]
    speech_command: String,
    #[structopt(long, default_value = "play")]
    player_command: String,
    /// First hour of quiet hours
    #[structopt(long, default_value = "22")]
    quiet_start: u32,
    /// First hour after quiet hours
    #[structopt(long, default_value = "7")]
    quiet_end: u32,
    /// Do not announce the time every hour
    #[structopt(long)]
    no_clock: bool,
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,
}

fn timeout(seconds: u64) -> Option<Duration> {
    if seconds == 0 {
        None
    } else {
        Some(Duration::from_secs(seconds))
    }
}

fn setup_logging(verbosity: usize) {
    stderrlog::new()
        .module(module_path!())
        .module("speakerd")
        .verbosity(verbosity)
        .timestamp(stderrlog::Timestamp::Millisecond)
        .init()
        .unwrap();
}

fn main() {
    let opt = Opt::from_args();
    setup_logging(opt.verbose);

    let quiet_hours = QuietHours::new(opt.quiet_start, opt.quiet_end);
    let announcer: Arc<dyn Announcer> = Arc::new(SpeechAnnouncer::new(SpeechConfig {
        synthesizer: opt.speech_command.clone(),
        voice: opt.voice.clone(),
        player: opt.player_command.clone(),
    }));
    let services = Services::new()
        .with_announcer(announcer.clone())
        .with_quiet_hours(quiet_hours);

    let routes = controllers::routes().unwrap_or_else(|e| {
        error!("{}", e);
        process::exit(1);
    });
    for key in routes.keys() {
        debug!("route {}", key);
    }
    let dispatcher = Dispatcher::new(Arc::new(routes), Arc::new(services));

    let config = ServerConfig {
        bind_addr: format!("{}:{}", opt.bind, opt.port),
        timeout: timeout(opt.timeout),
        framing: opt.framing,
    };
    let mut server = TcpServer::new(config.clone(), dispatcher).unwrap_or_else(|e| {
        error!("could not listen on {}: {}", &config.bind_addr, e);
        process::exit(1);
    });

    if !opt.no_clock {
        if let Err(e) = HourlyClock::new(announcer, quiet_hours).spawn() {
            warn!("hourly clock not started: {}", e);
        }
    }

    info!("speakerd {} listening on {}", speakerd::VERSION, &config.bind_addr);
    server.serve_forever();
}
