//! The per-thread generation loop.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::controller::SearchController;
use crate::crypto::{Candidate, CandidateSource, GenerationError};
use crate::matcher::{classify, MatchTier, PartialTier};
use crate::notify::Event;

/// One search worker: generate, count, classify, report, repeat.
///
/// The hot path (generate + classify) touches no shared state; only the
/// counter bump and the full-match claim synchronize with other workers.
pub struct Worker {
    id: usize,
    controller: Arc<SearchController>,
    source: Box<dyn CandidateSource + Send>,
    /// Next global count at which worker 0 reports progress.
    next_progress: u64,
}

impl Worker {
    pub fn new(
        id: usize,
        controller: Arc<SearchController>,
        source: Box<dyn CandidateSource + Send>,
    ) -> Self {
        let next_progress = controller.progress_interval();
        Self {
            id,
            controller,
            source,
            next_progress,
        }
    }

    /// Runs until the controller stops the run, a full match is claimed, or
    /// candidate generation fails.
    pub fn run(mut self) {
        debug!(worker = self.id, "worker started");

        while self.controller.is_running() {
            let candidate = match self.source.next_candidate() {
                Ok(candidate) => candidate,
                Err(err) => {
                    self.fail_run(err);
                    break;
                }
            };
            let generated = self.controller.counters().record_generated();

            // Target is read live each iteration, so mid-run reconfiguration
            // applies to subsequent candidates
            let Some(pattern) = self.controller.target() else {
                continue;
            };

            match classify(&candidate.address, &pattern) {
                MatchTier::Full => {
                    self.report_full(candidate, generated);
                    break;
                }
                MatchTier::Partial(tier) => self.report_partial(tier, &candidate, generated),
                MatchTier::None => {}
            }

            if self.id == 0 && generated >= self.next_progress {
                self.report_progress(generated);
            }
        }

        debug!(worker = self.id, "worker stopped");
    }

    /// Races for the claim; the winner reports and persists, losers stay
    /// silent so exactly one full-match notification goes out per run.
    fn report_full(&self, candidate: Candidate, generated: u64) {
        if !self.controller.claim_full_match() {
            return;
        }

        debug!(
            worker = self.id,
            address = %candidate.address,
            generated,
            "full match claimed"
        );
        self.persist("FULL", &candidate, generated);
        self.emit(Event::FullMatch {
            address: format!("0x{}", candidate.address),
            private_key: candidate.private_key,
            generated,
        });
    }

    fn report_partial(&self, tier: &'static PartialTier, candidate: &Candidate, generated: u64) {
        self.persist(tier.label, candidate, generated);
        self.emit(Event::PartialMatch {
            tier: tier.label,
            address: format!("0x{}", candidate.address),
            private_key: candidate.private_key.clone(),
            generated,
        });
    }

    fn report_progress(&mut self, generated: u64) {
        let status = self.controller.status();
        self.emit(Event::Progress {
            generated,
            speed: status.speed,
            eta: status.eta,
        });
        let interval = self.controller.progress_interval();
        self.next_progress = generated - generated % interval + interval;
    }

    fn persist(&self, tier: &str, candidate: &Candidate, generated: u64) {
        let address = format!("0x{}", candidate.address);
        if let Err(err) =
            self.controller
                .match_log()
                .append(tier, &address, &candidate.private_key, generated)
        {
            warn!(worker = self.id, error = %err, "failed to append match record");
        }
    }

    /// Notification delivery is fire-and-forget: failures are logged and
    /// never affect the run.
    fn emit(&self, event: Event) {
        if let Err(err) = self.controller.notifier().notify(event) {
            warn!(worker = self.id, error = %err, "notification delivery failed");
        }
    }

    /// Generation failures are run-fatal: stop everything rather than let the
    /// remaining workers mask a broken provider.
    fn fail_run(&self, err: GenerationError) {
        let generated = self.controller.counters().generated();
        error!(
            worker = self.id,
            generated,
            error = %err,
            "candidate generation failed; stopping run"
        );
        self.emit(Event::Error {
            context: format!(
                "worker {} generation failure after {} candidates: {}",
                self.id, generated, err
            ),
        });
        self.controller.stop();
    }
}
