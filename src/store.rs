//! Job persistence seam.
//!
//! The executor writes whole snapshots through [`JobStore::update`]; readers
//! only ever see a committed copy.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{CrackError, Result};
use crate::state_machine::{Job, JobStatus};

pub const DEFAULT_LIST_LIMIT: usize = 50;

pub trait JobStore: Send + Sync {
    /// Insert a new job. Fails with `DuplicateJob` if the id is taken.
    fn insert(&self, job: Job) -> Result<()>;

    fn get(&self, job_id: &str) -> Result<Job>;

    /// Atomically read-modify-write one job.
    ///
    /// `apply` runs on a private copy; the copy replaces the stored job only if
    /// `apply` returns `Ok`, so a rejected change leaves the job untouched.
    fn update(&self, job_id: &str, apply: &mut dyn FnMut(&mut Job) -> Result<()>) -> Result<Job>;

    /// Most recently created first.
    fn list(&self, status: Option<JobStatus>, limit: usize) -> Vec<Job>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    jobs: RwLock<HashMap<String, Job>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobStore for MemoryStore {
    fn insert(&self, job: Job) -> Result<()> {
        let mut jobs = self.jobs.write();
        if jobs.contains_key(&job.job_id) {
            return Err(CrackError::DuplicateJob(job.job_id));
        }
        jobs.insert(job.job_id.clone(), job);
        Ok(())
    }

    fn get(&self, job_id: &str) -> Result<Job> {
        self.jobs
            .read()
            .get(job_id)
            .cloned()
            .ok_or_else(|| CrackError::JobNotFound(job_id.to_string()))
    }

    fn update(&self, job_id: &str, apply: &mut dyn FnMut(&mut Job) -> Result<()>) -> Result<Job> {
        let mut jobs = self.jobs.write();
        let stored = jobs
            .get_mut(job_id)
            .ok_or_else(|| CrackError::JobNotFound(job_id.to_string()))?;
        let mut draft = stored.clone();
        apply(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }

    fn list(&self, status: Option<JobStatus>, limit: usize) -> Vec<Job> {
        let jobs = self.jobs.read();
        let mut matching: Vec<Job> = jobs
            .values()
            .filter(|job| status.is_none_or(|s| job.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        matching
    }
}
