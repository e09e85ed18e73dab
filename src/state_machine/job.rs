use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::JobStatus;
use crate::attack::{AttackConfig, AttackMode, Charset};
use crate::error::{CrackError, Result};
use crate::hashing::HashType;
use crate::request::JobSpec;

/// Progress reported while running never reaches 100; only a terminal
/// transition pins it there.
const RUNNING_PROGRESS_CEILING: f64 = 99.9;

/// One search against a single target hash.
///
/// Serialised through [`JobRecord`], so every mode-specific field is present
/// and `null` when it does not apply to the job's attack mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "JobRecord", try_from = "JobRecord")]
pub struct Job {
    pub job_id: String,
    pub target_hash: String,
    pub hash_type: HashType,
    pub attack: AttackConfig,
    pub status: JobStatus,
    pub progress: f64,
    pub current_attempt: u64,
    pub total_attempts: u64,
    pub success: bool,
    pub cracked_password: Option<String>,
    /// Seconds on the executor's monotonic clock.
    pub time_elapsed: f64,
    /// Attempts per second.
    pub speed: f64,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(job_id: String, spec: JobSpec) -> Self {
        Self {
            job_id,
            target_hash: spec.target_hash,
            hash_type: spec.hash_type,
            attack: spec.attack,
            status: JobStatus::Pending,
            progress: 0.0,
            current_attempt: 0,
            total_attempts: 0,
            success: false,
            cracked_password: None,
            time_elapsed: 0.0,
            speed: 0.0,
            error_message: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    pub fn set_total_attempts(&mut self, total: u64) -> Result<()> {
        if self.status != JobStatus::Running {
            return Err(CrackError::Internal(format!(
                "cannot size job {} while {}",
                self.job_id, self.status
            )));
        }
        self.total_attempts = total;
        self.current_attempt = self.current_attempt.min(total);
        Ok(())
    }

    /// Record how far the executor has got.
    ///
    /// `current_attempt` never moves backwards and never passes
    /// `total_attempts`; throughput is derived from the elapsed time.
    pub fn record_progress(&mut self, attempts: u64, elapsed_secs: f64) -> Result<()> {
        if self.status != JobStatus::Running {
            return Err(CrackError::Internal(format!(
                "cannot record progress on job {} while {}",
                self.job_id, self.status
            )));
        }
        self.current_attempt = attempts.min(self.total_attempts).max(self.current_attempt);
        self.progress = if self.total_attempts == 0 {
            0.0
        } else {
            (self.current_attempt as f64 / self.total_attempts as f64 * 100.0)
                .min(RUNNING_PROGRESS_CEILING)
        };
        self.time_elapsed = elapsed_secs;
        self.speed = if elapsed_secs > 0.0 {
            self.current_attempt as f64 / elapsed_secs
        } else {
            0.0
        };
        Ok(())
    }
}

/// Flat wire shape of a [`Job`].
#[derive(Serialize, Deserialize)]
struct JobRecord {
    job_id: String,
    target_hash: String,
    hash_type: HashType,
    attack_mode: AttackMode,
    wordlist_name: Option<String>,
    max_length: Option<usize>,
    charset_option: Option<Charset>,
    status: JobStatus,
    progress: f64,
    current_attempt: u64,
    total_attempts: u64,
    success: bool,
    cracked_password: Option<String>,
    time_elapsed: f64,
    speed: f64,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl From<Job> for JobRecord {
    fn from(job: Job) -> Self {
        let attack_mode = job.attack.mode();
        let (wordlist_name, max_length, charset_option) = match job.attack {
            AttackConfig::Dictionary { wordlist_name } => (Some(wordlist_name), None, None),
            AttackConfig::Bruteforce {
                max_length,
                charset_option,
            } => (None, Some(max_length), Some(charset_option)),
        };
        Self {
            job_id: job.job_id,
            target_hash: job.target_hash,
            hash_type: job.hash_type,
            attack_mode,
            wordlist_name,
            max_length,
            charset_option,
            status: job.status,
            progress: job.progress,
            current_attempt: job.current_attempt,
            total_attempts: job.total_attempts,
            success: job.success,
            cracked_password: job.cracked_password,
            time_elapsed: job.time_elapsed,
            speed: job.speed,
            error_message: job.error_message,
            created_at: job.created_at,
            started_at: job.started_at,
            completed_at: job.completed_at,
        }
    }
}

impl TryFrom<JobRecord> for Job {
    type Error = CrackError;

    fn try_from(record: JobRecord) -> Result<Self> {
        let attack = match (record.attack_mode, record.wordlist_name, record.max_length, record.charset_option) {
            (AttackMode::Dictionary, Some(wordlist_name), _, _) => {
                AttackConfig::Dictionary { wordlist_name }
            }
            (AttackMode::Bruteforce, _, Some(max_length), Some(charset_option)) => {
                AttackConfig::Bruteforce {
                    max_length,
                    charset_option,
                }
            }
            (mode, ..) => {
                return Err(CrackError::Validation(format!(
                    "job {} is missing its {mode} configuration",
                    record.job_id
                )));
            }
        };
        Ok(Self {
            job_id: record.job_id,
            target_hash: record.target_hash,
            hash_type: record.hash_type,
            attack,
            status: record.status,
            progress: record.progress,
            current_attempt: record.current_attempt,
            total_attempts: record.total_attempts,
            success: record.success,
            cracked_password: record.cracked_password,
            time_elapsed: record.time_elapsed,
            speed: record.speed,
            error_message: record.error_message,
            created_at: record.created_at,
            started_at: record.started_at,
            completed_at: record.completed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::Charset;
    use crate::state_machine::{StateMachine, Transition};

    fn bruteforce_job() -> Job {
        Job::new(
            "job-42".into(),
            JobSpec {
                target_hash: "187ef4436122d1cc2f40dc2b92f0eba0".into(),
                hash_type: HashType::Md5,
                attack: AttackConfig::Bruteforce {
                    max_length: 3,
                    charset_option: Charset::LowerDigits,
                },
            },
        )
    }

    #[test]
    fn job_creation_defaults() {
        let job = bruteforce_job();
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.progress, 0.0);
        assert_eq!(job.current_attempt, 0);
        assert!(!job.success);
        assert!(job.cracked_password.is_none());
        assert!(job.started_at.is_none());
    }

    #[test]
    fn progress_is_clamped_and_monotonic() {
        let mut job = bruteforce_job();
        StateMachine::apply(&mut job, Transition::Start).unwrap();
        job.set_total_attempts(200).unwrap();

        job.record_progress(50, 0.5).unwrap();
        assert_eq!(job.current_attempt, 50);
        assert_eq!(job.progress, 25.0);
        assert_eq!(job.speed, 100.0);

        job.record_progress(10, 0.6).unwrap();
        assert_eq!(job.current_attempt, 50);

        job.record_progress(500, 1.0).unwrap();
        assert_eq!(job.current_attempt, 200);
        assert_eq!(job.progress, 99.9);
    }

    #[test]
    fn progress_requires_running() {
        let mut job = bruteforce_job();
        assert!(job.record_progress(1, 1.0).is_err());
        assert!(job.set_total_attempts(1).is_err());
    }

    #[test]
    fn zero_elapsed_reports_zero_speed() {
        let mut job = bruteforce_job();
        StateMachine::apply(&mut job, Transition::Start).unwrap();
        job.set_total_attempts(10).unwrap();
        job.record_progress(5, 0.0).unwrap();
        assert_eq!(job.speed, 0.0);
    }

    #[test]
    fn serialization_has_explicit_nulls_and_flat_config() {
        let job = bruteforce_job();
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["attack_mode"], "bruteforce");
        assert_eq!(json["charset_option"], "1");
        assert_eq!(json["hash_type"], "md5");
        assert!(json["cracked_password"].is_null());
        assert!(json["started_at"].is_null());
        assert!(json.as_object().unwrap().contains_key("error_message"));
        assert_eq!(json["max_length"], 3);
        assert!(json["wordlist_name"].is_null());
        assert!(json.as_object().unwrap().contains_key("wordlist_name"));
    }

    #[test]
    fn dictionary_job_serializes_null_bruteforce_fields() {
        let job = Job::new(
            "job-7".into(),
            JobSpec {
                target_hash: "00".into(),
                hash_type: HashType::Sha1,
                attack: AttackConfig::Dictionary {
                    wordlist_name: "rockyou.txt".into(),
                },
            },
        );
        let json = serde_json::to_value(&job).unwrap();
        let fields = json.as_object().unwrap();
        assert_eq!(json["attack_mode"], "dictionary");
        assert_eq!(json["wordlist_name"], "rockyou.txt");
        assert!(fields.contains_key("max_length") && json["max_length"].is_null());
        assert!(fields.contains_key("charset_option") && json["charset_option"].is_null());

        let back: Job = serde_json::from_value(json).unwrap();
        assert_eq!(back, job);
    }

    #[test]
    fn record_without_mode_config_is_rejected() {
        let mut json = serde_json::to_value(bruteforce_job()).unwrap();
        json["max_length"] = serde_json::Value::Null;
        assert!(serde_json::from_value::<Job>(json).is_err());
    }

    #[test]
    fn job_serialization_roundtrip() {
        let job = bruteforce_job();
        let json = serde_json::to_string(&job).unwrap();
        let back: Job = serde_json::from_str(&json).unwrap();
        assert_eq!(back, job);
    }
}
