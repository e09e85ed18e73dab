//! Hash types, verification and shape-based detection.
//!
//! [`HashType`] is the closed set of algorithms a job can target. Unsalted
//! digests are recomputed and compared as hex; crypt-style hashes carry their
//! own salt and cost and are checked by the matching `pwhash` routine.

mod classifier;
mod info;
mod verifier;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CrackError;

pub use classifier::{Confidence, Detection, detect};
pub use info::{HashInfo, hash_info};
pub use verifier::{GeneratedHashes, digest, generate_all, verify};

/// Algorithms a job may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashType {
    Md5,
    Sha1,
    Sha256,
    Sha512,
    Ntlm,
    Bcrypt,
    Sha256Crypt,
    Sha512Crypt,
    Md5Crypt,
}

/// The two verification families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashFamily {
    /// Plain hex digest, compared case-insensitively.
    Digest,
    /// Self-describing salted/iterated hash string.
    Crypt,
}

impl HashType {
    pub const ALL: [HashType; 9] = [
        HashType::Md5,
        HashType::Sha1,
        HashType::Sha256,
        HashType::Sha512,
        HashType::Ntlm,
        HashType::Bcrypt,
        HashType::Sha256Crypt,
        HashType::Sha512Crypt,
        HashType::Md5Crypt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HashType::Md5 => "md5",
            HashType::Sha1 => "sha1",
            HashType::Sha256 => "sha256",
            HashType::Sha512 => "sha512",
            HashType::Ntlm => "ntlm",
            HashType::Bcrypt => "bcrypt",
            HashType::Sha256Crypt => "sha256crypt",
            HashType::Sha512Crypt => "sha512crypt",
            HashType::Md5Crypt => "md5crypt",
        }
    }

    pub fn family(&self) -> HashFamily {
        match self {
            HashType::Md5 | HashType::Sha1 | HashType::Sha256 | HashType::Sha512 | HashType::Ntlm => {
                HashFamily::Digest
            }
            HashType::Bcrypt | HashType::Sha256Crypt | HashType::Sha512Crypt | HashType::Md5Crypt => {
                HashFamily::Crypt
            }
        }
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashType {
    type Err = CrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        HashType::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| CrackError::Validation(format!("unknown hash type `{}`", s.trim())))
    }
}
