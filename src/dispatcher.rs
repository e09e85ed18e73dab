//! Accepts jobs and runs them on a bounded pool of blocking workers.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::CrackerConfig;
use crate::error::{CrackError, Result};
use crate::executor::Executor;
use crate::publisher::{JobEvent, ProgressPublisher};
use crate::request::{JobRequest, JobSpec};
use crate::state_machine::{Job, JobStatus, StateMachine, Transition};
use crate::store::JobStore;
use crate::wordlist::WordlistSource;

/// Handles for a job whose Executor has not exited yet.
#[derive(Clone)]
struct InFlight {
    cancel: CancellationToken,
    done: CancellationToken,
}

pub struct Dispatcher {
    store: Arc<dyn JobStore>,
    publisher: Arc<dyn ProgressPublisher>,
    executor: Arc<Executor>,
    permits: Arc<Semaphore>,
    max_bruteforce_length: usize,
    in_flight: Arc<Mutex<HashMap<String, InFlight>>>,
}

impl Dispatcher {
    pub fn new(
        config: &CrackerConfig,
        store: Arc<dyn JobStore>,
        publisher: Arc<dyn ProgressPublisher>,
        wordlists: Arc<dyn WordlistSource>,
    ) -> Self {
        let executor = Executor::new(store.clone(), publisher.clone(), wordlists, config.limits());
        Self {
            store,
            publisher,
            executor: Arc::new(executor),
            permits: Arc::new(Semaphore::new(config.workers.max(1))),
            max_bruteforce_length: config.max_bruteforce_length,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Validate `request`, persist it as a PENDING job and schedule it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, request: &JobRequest) -> Result<Job> {
        let spec = request.validate(self.max_bruteforce_length)?;
        self.submit_with_id(Uuid::new_v4().to_string(), spec)
    }

    /// Schedule an already-validated job under a caller-chosen id.
    ///
    /// Callers that want every progress event subscribe to the id first.
    pub fn submit_with_id(&self, job_id: String, spec: JobSpec) -> Result<Job> {
        let job = Job::new(job_id.clone(), spec);
        let handles = InFlight {
            cancel: CancellationToken::new(),
            done: CancellationToken::new(),
        };
        {
            let mut in_flight = self.in_flight.lock();
            if in_flight.contains_key(&job_id) {
                warn!(job_id = %job_id, "Duplicate submission rejected");
                return Err(CrackError::DuplicateJob(job_id));
            }
            if let Err(e) = self.store.insert(job.clone()) {
                warn!(job_id = %job_id, error = %e, "Submission rejected");
                return Err(e);
            }
            in_flight.insert(job_id.clone(), handles.clone());
        }
        info!(
            job_id = %job_id,
            hash_type = %job.hash_type,
            mode = %job.attack.mode(),
            "Job submitted"
        );

        let executor = self.executor.clone();
        let permits = self.permits.clone();
        let in_flight = self.in_flight.clone();
        tokio::spawn(async move {
            // A job cancelled while queued skips the queue; the Executor then
            // settles it as CANCELLED without running.
            let permit = tokio::select! {
                permit = permits.acquire_owned() => permit.ok(),
                _ = handles.cancel.cancelled() => None,
            };

            let worker = executor.clone();
            let id = job_id.clone();
            let cancel = handles.cancel.clone();
            let result = tokio::task::spawn_blocking(move || worker.run(&id, &cancel)).await;
            drop(permit);

            let fault = match result {
                Ok(Ok(status)) => {
                    debug!(job_id = %job_id, status = %status, "Worker exited");
                    None
                }
                Ok(Err(e)) => Some(e.to_string()),
                Err(join) => Some(format!("worker crashed: {join}")),
            };
            if let Some(message) = fault {
                error!(job_id = %job_id, error = %message, "Worker fault, marking job failed");
                if let Err(e) = executor.abort(&job_id, &message) {
                    error!(job_id = %job_id, error = %e, "Could not record worker fault");
                }
            }

            in_flight.lock().remove(&job_id);
            handles.done.cancel();
        });

        Ok(job)
    }

    /// Request cancellation of a job.
    ///
    /// A PENDING job is cancelled on the spot. A RUNNING job is signalled and
    /// stops at its next checkpoint; the returned snapshot is still RUNNING.
    /// Repeating the call on a CANCELLED job is a no-op; cancelling a
    /// COMPLETED or FAILED job is an `InvalidTransition`.
    pub fn cancel(&self, job_id: &str) -> Result<Job> {
        let flight = self.in_flight.lock().get(job_id).cloned();
        if let Some(flight) = &flight {
            flight.cancel.cancel();
        }

        let job = self.store.get(job_id)?;
        match job.status {
            JobStatus::Pending => {
                match self
                    .store
                    .update(job_id, &mut |j| StateMachine::apply(j, Transition::Cancel).map(|_| ()))
                {
                    Ok(job) => {
                        info!(job_id, "Job cancelled before start");
                        self.publisher.publish(JobEvent::update(job.clone()));
                        Ok(job)
                    }
                    // Started in the meantime: the token is already set.
                    Err(CrackError::InvalidTransition {
                        from: JobStatus::Running,
                        ..
                    }) => self.store.get(job_id),
                    Err(e) => Err(e),
                }
            }
            JobStatus::Running => {
                info!(job_id, "Cancellation requested");
                Ok(job)
            }
            JobStatus::Cancelled => Ok(job),
            status => Err(CrackError::InvalidTransition {
                from: status,
                to: JobStatus::Cancelled,
            }),
        }
    }

    pub fn status(&self, job_id: &str) -> Result<Job> {
        self.store.get(job_id)
    }

    pub fn list(&self, status: Option<JobStatus>, limit: usize) -> Vec<Job> {
        self.store.list(status, limit)
    }

    /// Wait until the job's Executor has exited and return the final snapshot.
    pub async fn wait(&self, job_id: &str) -> Result<Job> {
        let done = self.in_flight.lock().get(job_id).map(|f| f.done.clone());
        if let Some(done) = done {
            done.cancelled().await;
        }
        self.store.get(job_id)
    }

    /// Signal every job that has not finished yet.
    pub fn shutdown(&self) {
        let in_flight = self.in_flight.lock();
        info!(jobs = in_flight.len(), "Cancelling outstanding jobs");
        for flight in in_flight.values() {
            flight.cancel.cancel();
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }
}
