//! Job creation input and its validation.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::attack::{AttackConfig, AttackMode, Charset};
use crate::error::{CrackError, Result};
use crate::hashing::{self, HashFamily, HashType};

/// Raw job request as a caller supplies it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub hash_type: Option<String>,
    #[serde(default)]
    pub attack_mode: Option<String>,
    #[serde(default)]
    pub wordlist: Option<String>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub charset: Option<String>,
    #[serde(default)]
    pub auto_detect: bool,
}

/// A validated job configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub target_hash: String,
    pub hash_type: HashType,
    pub attack: AttackConfig,
}

impl JobRequest {
    /// Validate into a [`JobSpec`]; any problem is a `Validation` error.
    ///
    /// With `auto_detect`, a recognised shape overrides `hash_type`; an
    /// unrecognised one falls back to whatever was supplied.
    pub fn validate(&self, max_bruteforce_length: usize) -> Result<JobSpec> {
        let target_hash = self.hash.trim().to_string();
        if target_hash.is_empty() {
            return Err(CrackError::Validation("hash is required".into()));
        }

        let detected = if self.auto_detect {
            let detection = hashing::detect(&target_hash);
            debug!(detected = detection.type_tag(), confidence = %detection.confidence, "Auto-detected hash type");
            detection.hash_type
        } else {
            None
        };

        let hash_type = match (detected, self.hash_type.as_deref()) {
            (Some(t), _) => t,
            (None, Some(tag)) => tag.parse()?,
            (None, None) if self.auto_detect => {
                return Err(CrackError::Validation(
                    "could not detect hash type; select one manually".into(),
                ));
            }
            (None, None) => return Err(CrackError::Validation("hashType is required".into())),
        };

        let mode = match self.attack_mode.as_deref() {
            Some(tag) => tag.parse()?,
            None => AttackMode::Dictionary,
        };

        let attack = match mode {
            AttackMode::Dictionary => {
                let wordlist_name = self.wordlist.as_deref().map(str::trim).unwrap_or_default();
                if wordlist_name.is_empty() {
                    return Err(CrackError::Validation(
                        "wordlist is required for dictionary mode".into(),
                    ));
                }
                AttackConfig::Dictionary {
                    wordlist_name: wordlist_name.to_string(),
                }
            }
            AttackMode::Bruteforce => {
                let max_length = self.max_length.ok_or_else(|| {
                    CrackError::Validation("maxLength is required for bruteforce mode".into())
                })?;
                if max_length == 0 || max_length > max_bruteforce_length {
                    return Err(CrackError::Validation(format!(
                        "maxLength must be between 1 and {max_bruteforce_length}"
                    )));
                }
                let charset_option: Charset = self
                    .charset
                    .as_deref()
                    .ok_or_else(|| {
                        CrackError::Validation("charset is required for bruteforce mode".into())
                    })?
                    .parse()?;
                if hash_type.family() == HashFamily::Crypt {
                    warn!(hash_type = %hash_type, "Brute force against a salted hash type will be very slow");
                }
                AttackConfig::Bruteforce {
                    max_length,
                    charset_option,
                }
            }
        };

        Ok(JobSpec {
            target_hash,
            hash_type,
            attack,
        })
    }
}
