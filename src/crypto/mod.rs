//! Candidate production: key generation and address derivation.
//!
//! The search engine treats this module as an opaque provider behind the
//! [`CandidateSource`] trait, so tests can script candidates (forced matches,
//! forced failures) without touching real key material.

mod address;
mod keypair;

pub use address::Address;
pub use keypair::Keypair;

use secp256k1::{All, Secp256k1};

/// A failure to produce a candidate.
///
/// Run-fatal: the worker that hits one stops the whole run rather than
/// silently dropping out.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("key generation failed: {0}")]
    Provider(String),
}

/// One generated candidate: the derived address and its private key.
///
/// `address` is 40 lowercase hex characters without the 0x prefix, which is
/// the form the classifier works on. Candidates are ephemeral; they are
/// dropped after classification unless they matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub address: String,
    pub private_key: String,
}

/// A stream of candidates for one worker.
///
/// Each worker owns its source exclusively, so implementations need no
/// internal synchronization.
pub trait CandidateSource {
    fn next_candidate(&mut self) -> Result<Candidate, GenerationError>;
}

/// Production candidate source backed by secp256k1 + Keccak-256.
///
/// Holds a reusable signing context; creating one per candidate would
/// dominate the hot loop.
pub struct SecpSource {
    secp: Secp256k1<All>,
}

impl SecpSource {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }
}

impl Default for SecpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateSource for SecpSource {
    fn next_candidate(&mut self) -> Result<Candidate, GenerationError> {
        let keypair = Keypair::generate(&self.secp);
        Ok(Candidate {
            address: keypair.address().to_hex(),
            private_key: keypair.private_key_hex(),
        })
    }
}
