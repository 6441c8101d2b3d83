//! Run lifecycle and claim arbitration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::info;

use crate::counters::Counters;
use crate::crypto::CandidateSource;
use crate::matcher::{search_space, InvalidTarget, TargetPattern};
use crate::notify::Notifier;
use crate::record::MatchLog;
use crate::worker::Worker;

/// A rejected control command.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("invalid target: {0}")]
    InvalidTarget(#[from] InvalidTarget),
    #[error("no target configured; send a target address first")]
    NoTargetConfigured,
    #[error("a search is already running")]
    AlreadyRunning,
}

/// Read-only view of the current run, for status queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusSnapshot {
    pub generated: u64,
    pub matches_found: u64,
    pub elapsed: Duration,
    /// Candidates per second; 0.0 before any run has started.
    pub speed: f64,
    /// Expected time to a full match at the current speed; `None` at speed 0.
    pub eta: Option<Duration>,
}

/// Owns the lifecycle of a search run.
///
/// Workers only ever touch shared run state through this type: they read the
/// live target and the running flag, bump the counters, and race through
/// [`claim_full_match`](Self::claim_full_match), which is the single
/// at-most-once arbitration point for stopping on success.
pub struct SearchController {
    target: RwLock<Option<TargetPattern>>,
    running: AtomicBool,
    /// Claim state for the current run. The read-modify-write in
    /// `claim_full_match` must be a single atomic unit with setting
    /// `running = false`, hence a mutex rather than a second flag.
    match_claimed: Mutex<bool>,
    started_at: Mutex<Option<Instant>>,
    counters: Counters,
    handles: Mutex<Vec<JoinHandle<()>>>,
    notifier: Arc<dyn Notifier>,
    match_log: Arc<MatchLog>,
    progress_interval: u64,
}

impl SearchController {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        match_log: Arc<MatchLog>,
        progress_interval: u64,
    ) -> Self {
        Self {
            target: RwLock::new(None),
            running: AtomicBool::new(false),
            match_claimed: Mutex::new(false),
            started_at: Mutex::new(None),
            counters: Counters::new(),
            handles: Mutex::new(Vec::new()),
            notifier,
            match_log,
            progress_interval,
        }
    }

    /// Validates a full address and stores the derived pattern, replacing any
    /// prior one. Allowed at any time, including mid-run: workers read the
    /// target live, so a new pattern takes effect for subsequent candidates.
    pub fn set_target(&self, address: &str) -> Result<TargetPattern, ControlError> {
        let pattern = TargetPattern::from_address(address)?;
        info!(prefix = pattern.prefix(), suffix = pattern.suffix(), "target configured");
        *self.target.write().expect("target lock poisoned") = Some(pattern.clone());
        Ok(pattern)
    }

    /// Returns the current target, if one is configured.
    pub fn target(&self) -> Option<TargetPattern> {
        self.target.read().expect("target lock poisoned").clone()
    }

    /// Starts a run with `workers` threads, each fed by its own candidate
    /// source from `make_source`. Takes the shared handle explicitly so each
    /// spawned worker can hold a clone of it.
    pub fn start<F>(
        controller: &Arc<SearchController>,
        workers: usize,
        mut make_source: F,
    ) -> Result<(), ControlError>
    where
        F: FnMut(usize) -> Box<dyn CandidateSource + Send>,
    {
        if controller.target().is_none() {
            return Err(ControlError::NoTargetConfigured);
        }

        // The handles lock serializes starts: only a lock holder ever sets
        // `running` to true, so after the check below it stays false until
        // this start releases the lock.
        let mut handles = controller.handles.lock().expect("handle lock poisoned");
        if controller.is_running() {
            return Err(ControlError::AlreadyRunning);
        }

        // Reap the previous run's workers while `running` is still false.
        // Joining before the flag flips back to true is what guarantees no
        // stale worker survives into the new run (or races the counter
        // reset below); each one finishes its in-flight candidate, observes
        // the cleared flag, and exits.
        for handle in handles.drain(..) {
            let _ = handle.join();
        }

        controller.running.store(true, Ordering::SeqCst);
        controller.counters.reset();
        *controller.match_claimed.lock().expect("claim lock poisoned") = false;
        *controller.started_at.lock().expect("start-time lock poisoned") = Some(Instant::now());

        for id in 0..workers {
            let shared = Arc::clone(controller);
            let source = make_source(id);
            let handle = thread::Builder::new()
                .name(format!("match-worker-{id}"))
                .spawn(move || Worker::new(id, shared, source).run())
                .expect("failed to spawn worker thread");
            handles.push(handle);
        }

        info!(workers, "run started");
        Ok(())
    }

    /// Signals all workers to stop. Cooperative and idempotent: each worker
    /// finishes its in-flight candidate, observes the flag, and exits.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Returns whether a run is active.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// At-most-once arbitration for a discovered full match.
    ///
    /// Exactly one caller per run observes the false-to-true transition and
    /// becomes responsible for reporting; it also stops the run and records
    /// the match. Every other concurrent caller returns `false` with no side
    /// effects.
    pub fn claim_full_match(&self) -> bool {
        let mut claimed = self.match_claimed.lock().expect("claim lock poisoned");
        if *claimed {
            return false;
        }
        *claimed = true;
        self.running.store(false, Ordering::SeqCst);
        self.counters.record_match();
        true
    }

    /// Snapshot of counters, elapsed time, speed, and ETA.
    pub fn status(&self) -> StatusSnapshot {
        let generated = self.counters.generated();
        let elapsed = self
            .started_at
            .lock()
            .expect("start-time lock poisoned")
            .map(|t| t.elapsed())
            .unwrap_or_default();

        let speed = if elapsed.as_secs_f64() > 0.0 {
            generated as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        StatusSnapshot {
            generated,
            matches_found: self.counters.matches_found(),
            elapsed,
            speed,
            eta: estimate_eta(speed),
        }
    }

    /// Waits for all outstanding worker threads to exit.
    pub fn join(&self) {
        let handles: Vec<_> = {
            let mut guard = self.handles.lock().expect("handle lock poisoned");
            guard.drain(..).collect()
        };
        for handle in handles {
            let _ = handle.join();
        }
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn match_log(&self) -> &Arc<MatchLog> {
        &self.match_log
    }

    pub fn progress_interval(&self) -> u64 {
        self.progress_interval
    }
}

/// Expected time to a full match: search space / speed.
pub fn estimate_eta(speed: f64) -> Option<Duration> {
    if speed > 0.0 {
        Some(Duration::from_secs_f64(search_space() as f64 / speed))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Candidate, GenerationError};
    use crate::notify::{Event, NotifyError};
    use crossbeam_channel::{unbounded, Sender};
    use std::fs;

    const TARGET: &str = "0xABCDEF0011223344556677889900AABBCCDDEEFF";

    /// Yields the same scripted address forever.
    struct ScriptedSource {
        address: String,
    }

    impl ScriptedSource {
        fn new(address: &str) -> Box<dyn CandidateSource + Send> {
            Box::new(Self {
                address: address.to_string(),
            })
        }
    }

    impl CandidateSource for ScriptedSource {
        fn next_candidate(&mut self) -> Result<Candidate, GenerationError> {
            Ok(Candidate {
                address: self.address.clone(),
                private_key: "11".repeat(32),
            })
        }
    }

    /// Yields the scripted address slowly, so a worker is usually
    /// mid-candidate when the run is stopped.
    struct SlowSource {
        address: String,
    }

    impl SlowSource {
        fn new(address: &str) -> Box<dyn CandidateSource + Send> {
            Box::new(Self {
                address: address.to_string(),
            })
        }
    }

    impl CandidateSource for SlowSource {
        fn next_candidate(&mut self) -> Result<Candidate, GenerationError> {
            thread::sleep(Duration::from_millis(100));
            Ok(Candidate {
                address: self.address.clone(),
                private_key: "11".repeat(32),
            })
        }
    }

    /// Fails on every call.
    struct FailingSource;

    impl CandidateSource for FailingSource {
        fn next_candidate(&mut self) -> Result<Candidate, GenerationError> {
            Err(GenerationError::Provider("rng unavailable".into()))
        }
    }

    /// Rejects every delivery, like a transport outage.
    struct FaultyNotifier;

    impl Notifier for FaultyNotifier {
        fn notify(&self, _event: Event) -> Result<(), NotifyError> {
            Err(NotifyError::Delivery("transport down".into()))
        }
    }

    /// Forwards events to a channel for inspection.
    struct ChannelNotifier(Sender<Event>);

    impl Notifier for ChannelNotifier {
        fn notify(&self, event: Event) -> Result<(), NotifyError> {
            self.0
                .send(event)
                .map_err(|e| NotifyError::Delivery(e.to_string()))
        }
    }

    fn full_match_address() -> String {
        format!("abc{}eeff", "0".repeat(33))
    }

    fn miss_address() -> String {
        format!("fff{}1111", "0".repeat(33))
    }

    fn temp_log(name: &str) -> Arc<MatchLog> {
        let path = std::env::temp_dir().join(format!(
            "wallet_matcher_ctrl_{}_{}.csv",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        Arc::new(MatchLog::new(path))
    }

    fn controller(name: &str) -> (Arc<SearchController>, crossbeam_channel::Receiver<Event>) {
        let (tx, rx) = unbounded();
        let controller = Arc::new(SearchController::new(
            Arc::new(ChannelNotifier(tx)),
            temp_log(name),
            2000,
        ));
        (controller, rx)
    }

    #[test]
    fn test_start_without_target_rejected() {
        let (controller, _rx) = controller("no_target");
        let result = SearchController::start(&controller, 2, |_| ScriptedSource::new(&miss_address()));
        assert!(matches!(result, Err(ControlError::NoTargetConfigured)));
        assert!(!controller.is_running());
    }

    #[test]
    fn test_start_while_running_rejected() {
        let (controller, _rx) = controller("already_running");
        controller.set_target(TARGET).unwrap();
        SearchController::start(&controller, 2, |_| ScriptedSource::new(&miss_address()))
            .unwrap();

        let result = SearchController::start(&controller, 2, |_| ScriptedSource::new(&miss_address()));
        assert!(matches!(result, Err(ControlError::AlreadyRunning)));

        controller.stop();
        controller.join();
    }

    #[test]
    fn test_invalid_target_leaves_state_untouched() {
        let (controller, _rx) = controller("bad_target");
        assert!(controller.set_target("0xnothex").is_err());
        assert!(controller.target().is_none());
        assert!(!controller.is_running());
    }

    #[test]
    fn test_at_most_once_claim_under_racing_workers() {
        let (controller, rx) = controller("claim_race");
        controller.set_target(TARGET).unwrap();

        // Every worker's very first candidate is a full match
        SearchController::start(&controller, 4, |_| ScriptedSource::new(&full_match_address()))
            .unwrap();
        controller.join();

        assert!(!controller.is_running());
        assert_eq!(controller.counters().matches_found(), 1);

        let full_matches = rx
            .try_iter()
            .filter(|e| matches!(e, Event::FullMatch { .. }))
            .count();
        assert_eq!(full_matches, 1);

        let _ = fs::remove_file(controller.match_log().path());
    }

    #[test]
    fn test_claim_is_exclusive_even_without_workers() {
        let (controller, _rx) = controller("claim_direct");
        assert!(controller.claim_full_match());
        assert!(!controller.claim_full_match());
        assert_eq!(controller.counters().matches_found(), 1);
    }

    #[test]
    fn test_cooperative_stop_terminates_all_workers() {
        let (controller, _rx) = controller("coop_stop");
        controller.set_target(TARGET).unwrap();
        SearchController::start(&controller, 4, |_| ScriptedSource::new(&miss_address()))
            .unwrap();

        controller.stop();
        // Hangs here if any worker misses the flag
        controller.join();
        assert!(!controller.is_running());
    }

    #[test]
    fn test_stop_then_restart_reaps_previous_workers() {
        let (controller, _rx) = controller("restart");
        controller.set_target(TARGET).unwrap();

        SearchController::start(&controller, 1, |_| SlowSource::new(&miss_address())).unwrap();
        thread::sleep(Duration::from_millis(50));
        controller.stop();

        // Restart must join the old worker before raising the running flag
        // again; a surviving worker would loop under the new run and this
        // call would hang on the stale join
        SearchController::start(&controller, 1, |_| ScriptedSource::new(&full_match_address()))
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while controller.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!controller.is_running());
        controller.join();
        // Only the fresh run's worker ran: its first candidate won the claim
        // against counters that started from zero
        assert_eq!(controller.counters().matches_found(), 1);
        assert_eq!(controller.counters().generated(), 1);

        let _ = fs::remove_file(controller.match_log().path());
    }

    #[test]
    fn test_notification_failures_do_not_stop_the_run() {
        let controller = Arc::new(SearchController::new(
            Arc::new(FaultyNotifier),
            temp_log("notify_fail"),
            2000,
        ));
        // Every candidate is a "First 3 Only" partial, so every iteration
        // attempts (and fails) a delivery
        controller.set_target(TARGET).unwrap();
        let partial = format!("abc{}1111", "0".repeat(33));
        SearchController::start(&controller, 2, |_| ScriptedSource::new(&partial)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while controller.counters().generated() < 50 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(controller.counters().generated() >= 50, "workers stalled");
        assert!(
            controller.is_running(),
            "failed deliveries must not stop the run"
        );

        // A full match is still claimed even though its notification fails
        controller
            .set_target("0xABC0000000000000000000000000000000001111")
            .unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while controller.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!controller.is_running());
        controller.join();
        assert_eq!(controller.counters().matches_found(), 1);

        let _ = fs::remove_file(controller.match_log().path());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (controller, _rx) = controller("stop_idem");
        controller.stop();
        controller.stop();
        assert!(!controller.is_running());
    }

    #[test]
    fn test_generation_failure_stops_whole_run() {
        let (controller, rx) = controller("gen_fail");
        controller.set_target(TARGET).unwrap();
        SearchController::start(&controller, 2, |_| Box::new(FailingSource) as Box<dyn CandidateSource + Send>)
            .unwrap();
        controller.join();

        assert!(!controller.is_running());
        assert!(rx
            .try_iter()
            .any(|e| matches!(e, Event::Error { .. })));
    }

    #[test]
    fn test_retarget_mid_run_takes_effect() {
        let (controller, _rx) = controller("retarget");
        // Workers always produce abc..eeff, which does not fully match the
        // first target's suffix
        controller
            .set_target("0xABC0000000000000000000000000000000000000")
            .unwrap();
        SearchController::start(&controller, 2, |_| ScriptedSource::new(&full_match_address()))
            .unwrap();
        assert!(controller.is_running());

        // Retarget to a pattern the scripted address fully matches
        controller.set_target(TARGET).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while controller.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!controller.is_running(), "workers never saw the new target");
        controller.join();
        assert_eq!(controller.counters().matches_found(), 1);

        let _ = fs::remove_file(controller.match_log().path());
    }

    #[test]
    fn test_counters_reset_on_start() {
        let (controller, _rx) = controller("reset");
        controller.set_target(TARGET).unwrap();
        SearchController::start(&controller, 1, |_| ScriptedSource::new(&full_match_address()))
            .unwrap();
        controller.join();
        assert_eq!(controller.counters().matches_found(), 1);

        SearchController::start(&controller, 1, |_| ScriptedSource::new(&full_match_address()))
            .unwrap();
        controller.join();
        // Second run starts from zero, not two
        assert_eq!(controller.counters().matches_found(), 1);

        let _ = fs::remove_file(controller.match_log().path());
    }

    #[test]
    fn test_status_before_any_run() {
        let (controller, _rx) = controller("status_idle");
        let status = controller.status();
        assert_eq!(status.generated, 0);
        assert_eq!(status.speed, 0.0);
        assert_eq!(status.eta, None);
    }

    #[test]
    fn test_eta_estimate() {
        // 16^7 combinations at 200 candidates/sec
        let eta = estimate_eta(200.0).unwrap();
        assert_eq!(eta.as_secs(), 268_435_456 / 200);
        assert_eq!(crate::notify::format_eta(Some(eta)), "372h 49m");
    }

    #[test]
    fn test_eta_unknown_at_zero_speed() {
        assert_eq!(estimate_eta(0.0), None);
    }
}
