//! Interactive command parsing.
//!
//! Mirrors the chat-bot convention: slash-prefixed words are commands, any
//! other non-empty line is taken as a target address.

/// A control command for the search engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Configure the target from a full address.
    SetTarget(String),
    /// Start a run with the configured worker count.
    Start,
    /// Stop the current run.
    Stop,
    /// Report counters, speed, and ETA.
    Status,
}

impl Command {
    /// Parses one input line. Returns `None` for empty input and for unknown
    /// slash commands.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some(word) = line.strip_prefix('/') {
            match word {
                "run" | "start" => Some(Command::Start),
                "pause" | "stop" => Some(Command::Stop),
                "stats" | "status" => Some(Command::Status),
                _ => None,
            }
        } else {
            Some(Command::SetTarget(line.to_string()))
        }
    }
}
