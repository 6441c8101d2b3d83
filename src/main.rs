//! Wallet Matcher CLI
//!
//! Interactive loop driving the search engine:
//!   <address>   set the target (full 40-hex-char address, 0x optional)
//!   /run        start searching with the configured worker count
//!   /pause      stop the current run
//!   /stats      print counters, speed, and ETA
//!
//! Ctrl+C (or stdin EOF) stops the run and exits.

use std::io::{self, BufRead};
use std::process;
use std::sync::Arc;
use std::thread;

use clap::Parser;
use crossbeam_channel::{bounded, select, unbounded};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wallet_matcher::{
    server, CandidateSource, Command, Config, ConsoleNotifier, ControlError, Event, MatchLog,
    Notifier, SearchController, SecpSource,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let match_log = Arc::new(MatchLog::new(&config.match_log));
    let controller = Arc::new(SearchController::new(
        Arc::clone(&notifier),
        match_log,
        config.progress_interval,
    ));

    if !config.no_liveness {
        server::spawn_liveness(&config.listen);
    }

    // Ctrl-C requests shutdown through its own channel
    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.try_send(());
    })
    .expect("Error setting Ctrl-C handler");

    // Stdin reader feeds parsed commands; channel closes on EOF
    let (cmd_tx, cmd_rx) = unbounded::<Command>();
    thread::Builder::new()
        .name("command-reader".into())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match Command::parse(&line) {
                    Some(command) => {
                        if cmd_tx.send(command).is_err() {
                            break;
                        }
                    }
                    None => {
                        eprintln!(
                            "Unknown command. Use /run, /pause, /stats, or send a target address."
                        );
                    }
                }
            }
        })
        .expect("failed to spawn command reader thread");

    println!("Wallet Matcher");
    println!("==============");
    println!("Send the full wallet address you want to match, then /run to begin.");
    println!("Commands: /run  /pause  /stats   (Ctrl+C to quit)\n");

    let workers = config.worker_count();
    loop {
        select! {
            recv(cmd_rx) -> msg => {
                let Ok(command) = msg else { break };
                dispatch(&controller, &notifier, command, workers);
            }
            recv(shutdown_rx) -> _ => {
                info!("shutdown requested");
                break;
            }
        }
    }

    controller.stop();
    controller.join();
}

fn dispatch(
    controller: &Arc<SearchController>,
    notifier: &Arc<dyn Notifier>,
    command: Command,
    workers: usize,
) {
    let outcome = match command {
        Command::SetTarget(address) => match controller.set_target(&address) {
            Ok(pattern) => notifier.notify(Event::TargetSet {
                prefix: pattern.prefix().to_string(),
                suffix: pattern.suffix().to_string(),
            }),
            Err(e) => notifier.notify(Event::Error {
                context: e.to_string(),
            }),
        },
        Command::Start => {
            let result = SearchController::start(controller, workers, |_| {
                Box::new(SecpSource::new()) as Box<dyn CandidateSource + Send>
            });
            match result {
                Ok(()) => notifier.notify(Event::RunStarted { workers }),
                Err(ControlError::AlreadyRunning) => notifier.notify(Event::AlreadyRunning),
                Err(e) => notifier.notify(Event::Error {
                    context: e.to_string(),
                }),
            }
        }
        Command::Stop => {
            controller.stop();
            println!("Paused.");
            Ok(())
        }
        Command::Status => {
            let status = controller.status();
            notifier.notify(Event::Stats {
                generated: status.generated,
                matches_found: status.matches_found,
                speed: status.speed,
                eta: status.eta,
            })
        }
    };

    if let Err(e) = outcome {
        warn!(error = %e, "notification delivery failed");
    }
}
