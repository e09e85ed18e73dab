//! Progress fan-out to subscribers keyed by job id.
//!
//! The executor publishes a full [`Job`] snapshot on every checkpoint and on
//! every terminal transition. Delivery is best-effort: a slow subscriber that
//! falls behind the channel capacity loses intermediate snapshots, never the
//! ordering of the ones it does receive.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

use crate::state_machine::Job;

pub const JOB_UPDATE: &str = "job_update";

/// One message on the progress channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEvent {
    pub event: String,
    pub job: Job,
}

impl JobEvent {
    pub fn update(job: Job) -> Self {
        Self {
            event: JOB_UPDATE.to_string(),
            job,
        }
    }
}

pub trait ProgressPublisher: Send + Sync {
    fn publish(&self, event: JobEvent);
}

/// Discards every event.
pub struct NullPublisher;

impl ProgressPublisher for NullPublisher {
    fn publish(&self, _event: JobEvent) {}
}

/// One broadcast channel per job id, opened by the first subscriber and
/// closed after the job's terminal snapshot.
pub struct BroadcastPublisher {
    capacity: usize,
    channels: Mutex<HashMap<String, broadcast::Sender<JobEvent>>>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            channels: Mutex::new(HashMap::new()),
        }
    }

    /// Open (or join) the channel for `job_id`.
    ///
    /// Subscribe before the job is submitted. A channel opened for a job that
    /// never runs, or that already published its terminal snapshot, stays open
    /// until [`close`](Self::close) is called.
    pub fn subscribe(&self, job_id: &str) -> broadcast::Receiver<JobEvent> {
        let mut channels = self.channels.lock();
        channels
            .entry(job_id.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Drop the channel for `job_id`; its receivers drain and then see `Closed`.
    pub fn close(&self, job_id: &str) {
        if self.channels.lock().remove(job_id).is_some() {
            trace!(job_id, "Closed progress channel");
        }
    }

    pub fn subscriber_count(&self, job_id: &str) -> usize {
        self.channels
            .lock()
            .get(job_id)
            .map_or(0, |tx| tx.receiver_count())
    }
}

impl ProgressPublisher for BroadcastPublisher {
    fn publish(&self, event: JobEvent) {
        let job_id = event.job.job_id.clone();
        let terminal = event.job.status.is_terminal();
        let sender = {
            let mut channels = self.channels.lock();
            // A terminal snapshot is the last one: dropping the sender after it
            // lets subscribers drain and then observe `Closed`.
            if terminal {
                channels.remove(&job_id)
            } else {
                channels.get(&job_id).cloned()
            }
        };
        if let Some(tx) = sender {
            // Err only means there are no receivers right now.
            let delivered = tx.send(event).unwrap_or(0);
            trace!(job_id = %job_id, delivered, terminal, "Published job update");
        }
    }
}
