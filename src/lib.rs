//! # wallet_matcher
//!
//! Multi-threaded Ethereum vanity wallet matcher.
//!
//! Workers generate random keypairs, derive the address, and classify each
//! candidate against a configured prefix/suffix target. The first worker to
//! find a full match claims the run and stops all others; weaker partial
//! matches are reported and logged without stopping the search.
//!
//! ## Architecture
//!
//! - `crypto`: key generation and address derivation (the candidate provider)
//! - `matcher`: target pattern derivation and tiered match classification
//! - `counters`: process-wide atomic generation/match counters
//! - `controller`: run lifecycle, claim arbitration, worker supervision
//! - `worker`: the per-thread generate/classify/report loop
//! - `notify`: outbound event messages
//! - `record`: append-only CSV match log
//! - `command`: interactive command parsing
//! - `server`: liveness endpoint for hosting health checks
//! - `config`: runtime configuration

pub mod command;
pub mod config;
pub mod controller;
pub mod counters;
pub mod crypto;
pub mod matcher;
pub mod notify;
pub mod record;
pub mod server;
pub mod worker;

pub use command::Command;
pub use config::Config;
pub use controller::{ControlError, SearchController, StatusSnapshot};
pub use counters::Counters;
pub use crypto::{Address, Candidate, CandidateSource, GenerationError, Keypair, SecpSource};
pub use matcher::{classify, InvalidTarget, MatchTier, PartialTier, TargetPattern};
pub use notify::{ConsoleNotifier, Event, Notifier, NotifyError};
pub use record::MatchLog;
pub use worker::Worker;
