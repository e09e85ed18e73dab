use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::attack::{AttackLimits, AttackStrategy};
use crate::error::{CrackError, Result};
use crate::hashing;
use crate::publisher::{JobEvent, ProgressPublisher};
use crate::state_machine::{Job, JobStatus, Outcome, StateMachine, Transition};
use crate::store::JobStore;
use crate::wordlist::WordlistSource;

/// How the candidate loop stopped.
#[derive(Debug)]
enum SearchEnd {
    Finished(Outcome),
    Cancelled,
}

/// Runs one job's attack to a terminal state.
///
/// Holds the only write path to a job while it is RUNNING. Cancellation is
/// cooperative: the token is polled at checkpoint boundaries only, so a
/// cancelled job stops within one checkpoint batch.
pub struct Executor {
    store: Arc<dyn JobStore>,
    publisher: Arc<dyn ProgressPublisher>,
    wordlists: Arc<dyn WordlistSource>,
    limits: AttackLimits,
}

impl Executor {
    pub fn new(
        store: Arc<dyn JobStore>,
        publisher: Arc<dyn ProgressPublisher>,
        wordlists: Arc<dyn WordlistSource>,
        limits: AttackLimits,
    ) -> Self {
        Self {
            store,
            publisher,
            wordlists,
            limits,
        }
    }

    /// Run `job_id` to completion on the calling thread.
    ///
    /// Returns the status the job ended in. A job that is no longer PENDING
    /// (already cancelled, or already run) is left alone and its current
    /// status returned.
    pub fn run(&self, job_id: &str, cancel: &CancellationToken) -> Result<JobStatus> {
        if cancel.is_cancelled() {
            return self.cancel_before_start(job_id);
        }

        let job = match self.transition(job_id, Transition::Start) {
            Ok(job) => job,
            Err(CrackError::InvalidTransition { from, .. }) => {
                debug!(job_id, status = %from, "Job is not pending, nothing to run");
                return Ok(from);
            }
            Err(e) => return Err(e),
        };

        match self.execute(job, cancel) {
            Ok(status) => Ok(status),
            Err(e) => {
                warn!(job_id, error = %e, kind = %e.kind(), "Job execution failed");
                self.abort(job_id, &e.to_string())
            }
        }
    }

    /// Force a job into FAILED after an unexpected fault outside [`run`](Self::run).
    ///
    /// A PENDING job is started first so the recorded history stays legal;
    /// a terminal job is left as is.
    pub fn abort(&self, job_id: &str, message: &str) -> Result<JobStatus> {
        let job = self.store.update(job_id, &mut |job| {
            if job.status == JobStatus::Pending {
                StateMachine::apply(job, Transition::Start)?;
            }
            if job.status == JobStatus::Running {
                StateMachine::apply(job, Transition::Fail(message.to_string()))?;
            }
            Ok(())
        })?;
        if job.status == JobStatus::Failed {
            self.publisher.publish(JobEvent::update(job.clone()));
        }
        Ok(job.status)
    }

    fn execute(&self, job: Job, cancel: &CancellationToken) -> Result<JobStatus> {
        let job_id = job.job_id.as_str();
        self.publisher.publish(JobEvent::update(job.clone()));

        let strategy = match AttackStrategy::prepare(&job.attack, self.wordlists.as_ref(), self.limits) {
            Ok(strategy) => strategy,
            Err(e) => {
                warn!(job_id, error = %e, "Job setup failed");
                return self.finish(job_id, 0, Duration::ZERO, Transition::Fail(e.to_string()));
            }
        };

        let total = strategy.total_attempts();
        self.store.update(job_id, &mut |j| j.set_total_attempts(total))?;
        info!(
            job_id,
            mode = %job.attack.mode(),
            hash_type = %job.hash_type,
            total_attempts = total,
            capped = strategy.is_capped(),
            "Job started"
        );

        let started = Instant::now();
        let mut attempts: u64 = 0;
        let end = self.search(&job, &strategy, cancel, started, &mut attempts)?;
        let elapsed = started.elapsed();

        let transition = match end {
            SearchEnd::Finished(outcome) => Transition::Complete(outcome),
            SearchEnd::Cancelled => Transition::Cancel,
        };
        self.finish(job_id, attempts, elapsed, transition)
    }

    fn search(
        &self,
        job: &Job,
        strategy: &AttackStrategy,
        cancel: &CancellationToken,
        started: Instant,
        attempts: &mut u64,
    ) -> Result<SearchEnd> {
        let every = strategy.checkpoint_every();
        for candidate in strategy.candidates() {
            *attempts += 1;
            if hashing::verify(&candidate, &job.target_hash, job.hash_type) {
                return Ok(SearchEnd::Finished(Outcome::Cracked(candidate.into_owned())));
            }
            if *attempts % every == 0 {
                if cancel.is_cancelled() {
                    info!(job_id = %job.job_id, attempts = *attempts, "Cancellation observed");
                    return Ok(SearchEnd::Cancelled);
                }
                self.checkpoint(&job.job_id, *attempts, started.elapsed())?;
            }
        }

        // Reaching the ceiling outranks exhaustion, even when the space is
        // exactly the ceiling's size.
        match strategy.attempt_cap() {
            Some(cap) if *attempts >= cap => Ok(SearchEnd::Finished(Outcome::CapReached(
                format!("Exceeded maximum attempts ({cap})"),
            ))),
            _ => Ok(SearchEnd::Finished(Outcome::Exhausted)),
        }
    }

    fn checkpoint(&self, job_id: &str, attempts: u64, elapsed: Duration) -> Result<()> {
        let job = self
            .store
            .update(job_id, &mut |j| j.record_progress(attempts, elapsed.as_secs_f64()))?;
        debug!(job_id, attempts, progress = job.progress, speed = job.speed, "Checkpoint");
        self.publisher.publish(JobEvent::update(job));
        Ok(())
    }

    fn finish(
        &self,
        job_id: &str,
        attempts: u64,
        elapsed: Duration,
        transition: Transition,
    ) -> Result<JobStatus> {
        let job = self.store.update(job_id, &mut |j| {
            if j.status == JobStatus::Running && attempts > 0 {
                j.record_progress(attempts, elapsed.as_secs_f64())?;
            }
            StateMachine::apply(j, transition.clone())?;
            Ok(())
        })?;
        info!(
            job_id,
            status = %job.status,
            success = job.success,
            attempts = job.current_attempt,
            elapsed_secs = job.time_elapsed,
            "Job finished"
        );
        self.publisher.publish(JobEvent::update(job.clone()));
        Ok(job.status)
    }

    fn cancel_before_start(&self, job_id: &str) -> Result<JobStatus> {
        match self.transition(job_id, Transition::Cancel) {
            Ok(job) => Ok(job.status),
            // The dispatcher got there first.
            Err(CrackError::InvalidTransition { from, .. }) => Ok(from),
            Err(e) => Err(e),
        }
    }

    fn transition(&self, job_id: &str, transition: Transition) -> Result<Job> {
        let job = self
            .store
            .update(job_id, &mut |j| StateMachine::apply(j, transition.clone()).map(|_| ()))?;
        if job.status.is_terminal() {
            self.publisher.publish(JobEvent::update(job.clone()));
        }
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::{AttackConfig, Charset};
    use crate::hashing::{HashType, digest};
    use crate::publisher::BroadcastPublisher;
    use crate::request::JobSpec;
    use crate::store::MemoryStore;
    use crate::wordlist::StaticWordlists;
    use tokio::sync::broadcast::error::TryRecvError;

    struct Harness {
        store: Arc<MemoryStore>,
        publisher: Arc<BroadcastPublisher>,
        executor: Executor,
    }

    fn harness(wordlists: StaticWordlists, limits: AttackLimits) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let publisher = Arc::new(BroadcastPublisher::new(1024));
        let executor = Executor::new(store.clone(), publisher.clone(), Arc::new(wordlists), limits);
        Harness {
            store,
            publisher,
            executor,
        }
    }

    fn insert(h: &Harness, id: &str, hash: String, hash_type: HashType, attack: AttackConfig) {
        h.store
            .insert(Job::new(
                id.to_string(),
                JobSpec {
                    target_hash: hash,
                    hash_type,
                    attack,
                },
            ))
            .unwrap();
    }

    fn numbered_wordlist(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("word{i:05}")).collect()
    }

    fn dictionary(name: &str) -> AttackConfig {
        AttackConfig::Dictionary {
            wordlist_name: name.into(),
        }
    }

    #[test]
    fn dictionary_first_match_reports_position() {
        let words = numbered_wordlist(2500);
        let h = harness(
            StaticWordlists::default().with("big", &words),
            AttackLimits::default(),
        );
        let target = digest("word01234", HashType::Sha1).unwrap();
        insert(&h, "d1", target, HashType::Sha1, dictionary("big"));

        let status = h.executor.run("d1", &CancellationToken::new()).unwrap();
        assert_eq!(status, JobStatus::Completed);

        let job = h.store.get("d1").unwrap();
        assert!(job.success);
        assert_eq!(job.cracked_password.as_deref(), Some("word01234"));
        assert_eq!(job.current_attempt, 1235);
        assert_eq!(job.total_attempts, 2500);
        assert_eq!(job.progress, 100.0);
        assert!(job.started_at.is_some() && job.completed_at.is_some());
    }

    #[test]
    fn dictionary_miss_exhausts_wordlist() {
        let h = harness(
            StaticWordlists::default().with("small", ["alpha", "beta", "gamma"]),
            AttackLimits::default(),
        );
        insert(
            &h,
            "d2",
            digest("delta", HashType::Md5).unwrap(),
            HashType::Md5,
            dictionary("small"),
        );

        h.executor.run("d2", &CancellationToken::new()).unwrap();
        let job = h.store.get("d2").unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(!job.success);
        assert!(job.cracked_password.is_none());
        assert!(job.error_message.is_none());
        assert_eq!(job.current_attempt, 3);
        assert_eq!(job.total_attempts, 3);
    }

    #[test]
    fn case_insensitive_digest_takes_earliest_entry() {
        let h = harness(
            StaticWordlists::default().with("dupes", ["nope", "secret", "secret"]),
            AttackLimits::default(),
        );
        let upper = digest("secret", HashType::Md5).unwrap().to_ascii_uppercase();
        insert(&h, "d3", upper, HashType::Md5, dictionary("dupes"));

        h.executor.run("d3", &CancellationToken::new()).unwrap();
        let job = h.store.get("d3").unwrap();
        assert_eq!(job.cracked_password.as_deref(), Some("secret"));
        assert_eq!(job.current_attempt, 2);
    }

    #[test]
    fn missing_wordlist_fails_without_running() {
        let h = harness(StaticWordlists::default(), AttackLimits::default());
        insert(&h, "d4", "00".repeat(16), HashType::Md5, dictionary("ghost.txt"));

        let status = h.executor.run("d4", &CancellationToken::new()).unwrap();
        assert_eq!(status, JobStatus::Failed);
        let job = h.store.get("d4").unwrap();
        assert!(job.error_message.unwrap().contains("ghost.txt"));
        assert_eq!(job.current_attempt, 0);
        assert_eq!(job.progress, 100.0);
        assert!(!job.success);
    }

    #[test]
    fn bruteforce_finds_ab_at_lexicographic_rank() {
        let h = harness(StaticWordlists::default(), AttackLimits::default());
        insert(
            &h,
            "b1",
            digest("ab", HashType::Md5).unwrap(),
            HashType::Md5,
            AttackConfig::Bruteforce {
                max_length: 3,
                charset_option: Charset::LowerDigits,
            },
        );

        h.executor.run("b1", &CancellationToken::new()).unwrap();
        let job = h.store.get("b1").unwrap();
        assert!(job.success);
        assert_eq!(job.cracked_password.as_deref(), Some("ab"));
        assert_eq!(job.current_attempt, 36 + 2);
        assert_eq!(job.total_attempts, 36 + 36 * 36 + 36 * 36 * 36);
    }

    #[test]
    fn bruteforce_stops_at_attempt_ceiling() {
        let limits = AttackLimits {
            max_attempts: 12_000,
            ..Default::default()
        };
        let h = harness(StaticWordlists::default(), limits);
        insert(
            &h,
            "b2",
            digest("zzzz", HashType::Md5).unwrap(),
            HashType::Md5,
            AttackConfig::Bruteforce {
                max_length: 4,
                charset_option: Charset::Lower,
            },
        );
        let mut rx = h.publisher.subscribe("b2");

        h.executor.run("b2", &CancellationToken::new()).unwrap();
        let job = h.store.get("b2").unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(!job.success);
        assert_eq!(job.total_attempts, 12_000);
        assert_eq!(job.current_attempt, 12_000);
        assert_eq!(job.error_message.as_deref(), Some("Exceeded maximum attempts (12000)"));

        let mut last_attempt = 0;
        let mut last_progress = 0.0;
        let mut final_status = None;
        while let Ok(event) = rx.try_recv() {
            assert!(event.job.current_attempt >= last_attempt);
            assert!(event.job.current_attempt <= 12_000);
            assert!((0.0..=100.0).contains(&event.job.progress));
            if !event.job.status.is_terminal() {
                assert!(event.job.progress < 100.0);
                assert!(event.job.progress >= last_progress);
                last_progress = event.job.progress;
            }
            last_attempt = event.job.current_attempt;
            final_status = Some(event.job.status);
        }
        assert_eq!(final_status, Some(JobStatus::Completed));
    }

    #[test]
    fn ceiling_equal_to_space_reports_cap() {
        let limits = AttackLimits {
            max_attempts: 26 + 676,
            ..Default::default()
        };
        let h = harness(StaticWordlists::default(), limits);
        insert(
            &h,
            "b4",
            digest("!!!", HashType::Md5).unwrap(),
            HashType::Md5,
            AttackConfig::Bruteforce {
                max_length: 2,
                charset_option: Charset::Lower,
            },
        );

        h.executor.run("b4", &CancellationToken::new()).unwrap();
        let job = h.store.get("b4").unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(!job.success);
        assert_eq!(job.current_attempt, 702);
        assert_eq!(job.total_attempts, 702);
        assert_eq!(job.error_message.as_deref(), Some("Exceeded maximum attempts (702)"));
    }

    #[test]
    fn bruteforce_exhausts_within_ceiling() {
        let h = harness(StaticWordlists::default(), AttackLimits::default());
        insert(
            &h,
            "b3",
            digest("!!!", HashType::Md5).unwrap(),
            HashType::Md5,
            AttackConfig::Bruteforce {
                max_length: 2,
                charset_option: Charset::Lower,
            },
        );

        h.executor.run("b3", &CancellationToken::new()).unwrap();
        let job = h.store.get("b3").unwrap();
        assert!(!job.success);
        assert!(job.error_message.is_none());
        assert_eq!(job.current_attempt, 26 + 676);
        assert_eq!(job.current_attempt, job.total_attempts);
    }

    #[test]
    fn checkpoints_publish_every_batch() {
        let words = numbered_wordlist(3500);
        let h = harness(
            StaticWordlists::default().with("w", &words),
            AttackLimits::default(),
        );
        insert(
            &h,
            "c1",
            digest("absent", HashType::Md5).unwrap(),
            HashType::Md5,
            dictionary("w"),
        );
        let mut rx = h.publisher.subscribe("c1");

        h.executor.run("c1", &CancellationToken::new()).unwrap();

        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push((event.job.status, event.job.current_attempt));
        }
        assert_eq!(
            seen,
            vec![
                (JobStatus::Running, 0),
                (JobStatus::Running, 1000),
                (JobStatus::Running, 2000),
                (JobStatus::Running, 3000),
                (JobStatus::Completed, 3500),
            ]
        );
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Closed)));
    }

    #[test]
    fn cancellation_is_observed_at_first_checkpoint() {
        let words = numbered_wordlist(5000);
        let h = harness(
            StaticWordlists::default().with("w", &words),
            AttackLimits::default(),
        );
        insert(
            &h,
            "x1",
            digest("absent", HashType::Md5).unwrap(),
            HashType::Md5,
            dictionary("w"),
        );
        // Started first, then cancelled: the token is seen at the 1000th attempt.
        h.store
            .update("x1", &mut |j| StateMachine::apply(j, Transition::Start).map(|_| ()))
            .unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let job = h.store.get("x1").unwrap();
        let status = h.executor.execute(job, &token).unwrap();
        assert_eq!(status, JobStatus::Cancelled);

        let job = h.store.get("x1").unwrap();
        assert_eq!(job.status, JobStatus::Cancelled);
        assert_eq!(job.current_attempt, 1000);
        assert_eq!(job.progress, 100.0);
    }

    #[test]
    fn pre_cancelled_token_never_runs() {
        let h = harness(
            StaticWordlists::default().with("w", ["a"]),
            AttackLimits::default(),
        );
        insert(&h, "x2", "00".repeat(16), HashType::Md5, dictionary("w"));
        let token = CancellationToken::new();
        token.cancel();

        assert_eq!(h.executor.run("x2", &token).unwrap(), JobStatus::Cancelled);
        let job = h.store.get("x2").unwrap();
        assert!(job.started_at.is_none());
    }

    #[test]
    fn finished_job_is_not_rerun() {
        let h = harness(
            StaticWordlists::default().with("w", ["a"]),
            AttackLimits::default(),
        );
        insert(&h, "r1", digest("a", HashType::Md5).unwrap(), HashType::Md5, dictionary("w"));
        assert_eq!(h.executor.run("r1", &CancellationToken::new()).unwrap(), JobStatus::Completed);
        let first = h.store.get("r1").unwrap();

        assert_eq!(h.executor.run("r1", &CancellationToken::new()).unwrap(), JobStatus::Completed);
        assert_eq!(h.store.get("r1").unwrap(), first);
    }

    #[test]
    fn abort_moves_pending_and_running_to_failed() {
        let h = harness(StaticWordlists::default(), AttackLimits::default());
        insert(&h, "p", "00".into(), HashType::Md5, dictionary("w"));
        assert_eq!(h.executor.abort("p", "worker panicked").unwrap(), JobStatus::Failed);
        assert_eq!(
            h.store.get("p").unwrap().error_message.as_deref(),
            Some("worker panicked")
        );

        insert(&h, "q", "00".into(), HashType::Md5, dictionary("w"));
        h.store
            .update("q", &mut |j| StateMachine::apply(j, Transition::Cancel).map(|_| ()))
            .unwrap();
        assert_eq!(h.executor.abort("q", "late").unwrap(), JobStatus::Cancelled);
    }
}
