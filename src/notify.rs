//! Outbound event messages.
//!
//! The search engine emits events through the [`Notifier`] trait and never
//! retries failed deliveries; a slow or failing transport must not affect the
//! run. The console implementation here renders the same message shapes a
//! chat transport would deliver.

use std::time::Duration;

/// An outbound event from the controller or a worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A new target was accepted.
    TargetSet { prefix: String, suffix: String },
    /// A run started with the given worker count.
    RunStarted { workers: usize },
    /// Start was requested while a run was already active.
    AlreadyRunning,
    /// The winning full match. Emitted exactly once per run.
    FullMatch {
        address: String,
        private_key: String,
        generated: u64,
    },
    /// A partial-tier match; the run continues.
    PartialMatch {
        tier: &'static str,
        address: String,
        private_key: String,
        generated: u64,
    },
    /// Periodic progress from the designated reporter worker.
    Progress {
        generated: u64,
        speed: f64,
        eta: Option<Duration>,
    },
    /// Response to a status query.
    Stats {
        generated: u64,
        matches_found: u64,
        speed: f64,
        eta: Option<Duration>,
    },
    /// A user-visible failure (bad target, generation failure, ...).
    Error { context: String },
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Delivers events to the user. Fire-and-forget from the engine's side.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: Event) -> Result<(), NotifyError>;
}

/// Renders events as plain text on stdout.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, event: Event) -> Result<(), NotifyError> {
        println!("{}", render(&event));
        Ok(())
    }
}

/// Renders an event as a human-readable message.
pub fn render(event: &Event) -> String {
    match event {
        Event::TargetSet { prefix, suffix } => format!(
            "Target set\n  first 3: {prefix}\n  last 4:  {suffix}\nUse /run to start."
        ),
        Event::RunStarted { workers } => {
            format!("Generation started with {workers} workers.")
        }
        Event::AlreadyRunning => "Already running.".to_string(),
        Event::FullMatch {
            address,
            private_key,
            generated,
        } => format!(
            "FULL MATCH FOUND\n  address:     {address}\n  private key: {private_key}\n  wallets generated: {}",
            format_count(*generated)
        ),
        Event::PartialMatch {
            tier,
            address,
            private_key,
            generated,
        } => format!(
            "{tier}\n  address:     {address}\n  private key: {private_key}\n  count: {}",
            format_count(*generated)
        ),
        Event::Progress {
            generated,
            speed,
            eta,
        } => format!(
            "Wallets checked: {} | speed: {}/s | est. time to match: {}",
            format_count(*generated),
            *speed as u64,
            format_eta(*eta)
        ),
        Event::Stats {
            generated,
            matches_found,
            speed,
            eta,
        } => format!(
            "Stats\n  wallets generated: {}\n  matches found: {matches_found}\n  speed: {}/s\n  eta: {}",
            format_count(*generated),
            *speed as u64,
            format_eta(*eta)
        ),
        Event::Error { context } => format!("Error: {context}"),
    }
}

/// Formats an ETA as whole hours and minutes, "Unknown" when there is none.
pub fn format_eta(eta: Option<Duration>) -> String {
    match eta {
        Some(eta) => {
            let secs = eta.as_secs();
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        }
        None => "Unknown".to_string(),
    }
}

/// Formats a count with comma separators.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
