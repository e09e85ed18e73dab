use md4::Md4;
use md5::Md5;
use serde::Serialize;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use super::HashType;

/// Hex digest of `plaintext` for unsalted hash types.
///
/// Returns `None` for crypt-style types, which cannot be produced without
/// choosing a salt.
pub fn digest(plaintext: &str, hash_type: HashType) -> Option<String> {
    let bytes = plaintext.as_bytes();
    let encoded = match hash_type {
        HashType::Md5 => hex::encode(Md5::digest(bytes)),
        HashType::Sha1 => hex::encode(Sha1::digest(bytes)),
        HashType::Sha256 => hex::encode(Sha256::digest(bytes)),
        HashType::Sha512 => hex::encode(Sha512::digest(bytes)),
        HashType::Ntlm => {
            let utf16le: Vec<u8> = plaintext
                .encode_utf16()
                .flat_map(|unit| unit.to_le_bytes())
                .collect();
            hex::encode(Md4::digest(&utf16le))
        }
        HashType::Bcrypt | HashType::Sha256Crypt | HashType::Sha512Crypt | HashType::Md5Crypt => {
            return None;
        }
    };
    Some(encoded)
}

/// Checks whether `candidate` hashes to `target` under `hash_type`.
///
/// Malformed targets are a non-match, never an error.
pub fn verify(candidate: &str, target: &str, hash_type: HashType) -> bool {
    let target = target.trim();
    match hash_type {
        HashType::Bcrypt => pwhash::bcrypt::verify(candidate, target),
        HashType::Sha256Crypt => pwhash::sha256_crypt::verify(candidate, target),
        HashType::Sha512Crypt => pwhash::sha512_crypt::verify(candidate, target),
        HashType::Md5Crypt => pwhash::md5_crypt::verify(candidate, target),
        HashType::Md5 | HashType::Sha1 | HashType::Sha256 | HashType::Sha512 | HashType::Ntlm => {
            digest(candidate, hash_type).is_some_and(|computed| computed.eq_ignore_ascii_case(target))
        }
    }
}

/// Unsalted digests of one password, for the `hash` command.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedHashes {
    pub password: String,
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
    pub sha512: String,
    pub ntlm: String,
}

pub fn generate_all(password: &str) -> GeneratedHashes {
    let hex_of = |t| digest(password, t).unwrap_or_default();
    GeneratedHashes {
        password: password.to_string(),
        md5: hex_of(HashType::Md5),
        sha1: hex_of(HashType::Sha1),
        sha256: hex_of(HashType::Sha256),
        sha512: hex_of(HashType::Sha512),
        ntlm: hex_of(HashType::Ntlm),
    }
}
