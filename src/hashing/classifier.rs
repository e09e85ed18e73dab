use std::fmt;

use serde::{Serialize, Serializer};

use super::HashType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::Low => write!(f, "Low"),
        }
    }
}

/// Advisory result of [`detect`]. `hash_type` is `None` for the `unknown` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    #[serde(rename = "detected_type", serialize_with = "serialize_type_tag")]
    pub hash_type: Option<HashType>,
    pub confidence: Confidence,
    pub description: &'static str,
    pub hash_length: usize,
}

impl Detection {
    pub fn type_tag(&self) -> &'static str {
        self.hash_type.map_or("unknown", |t| t.as_str())
    }
}

fn serialize_type_tag<S: Serializer>(hash_type: &Option<HashType>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(hash_type.map_or("unknown", |t| t.as_str()))
}

/// Infers the most likely hash type from the string's shape.
///
/// Salted formats are recognised by their `$id$` prefix, plain digests by
/// length when the content is entirely hex.
pub fn detect(hash: &str) -> Detection {
    let hash = hash.trim();
    let length = hash.chars().count();
    let found = |hash_type, description| Detection {
        hash_type: Some(hash_type),
        confidence: Confidence::High,
        description,
        hash_length: length,
    };

    if is_bcrypt(hash) {
        return found(HashType::Bcrypt, "Bcrypt - Very secure, slow to crack");
    }
    if hash.starts_with("$6$") {
        return found(HashType::Sha512Crypt, "SHA-512 Crypt (Unix/Linux)");
    }
    if hash.starts_with("$5$") {
        return found(HashType::Sha256Crypt, "SHA-256 Crypt (Unix/Linux)");
    }
    if hash.starts_with("$1$") {
        return found(HashType::Md5Crypt, "MD5 Crypt (Unix/Linux)");
    }

    if !hash.is_empty() && hash.chars().all(|c| c.is_ascii_hexdigit()) {
        match length {
            32 => return found(HashType::Md5, "MD5 - Fast, commonly used"),
            40 => return found(HashType::Sha1, "SHA-1 - Git commits, legacy systems"),
            64 => return found(HashType::Sha256, "SHA-256 - Bitcoin, modern apps"),
            128 => return found(HashType::Sha512, "SHA-512 - High security applications"),
            _ => {}
        }
    }

    Detection {
        hash_type: None,
        confidence: Confidence::Low,
        description: "Unknown hash type - Cannot detect",
        hash_length: length,
    }
}

// `$2a$`, `$2b$` or `$2y$`, a two-digit cost, `$`, then 53 characters of salt and digest.
fn is_bcrypt(hash: &str) -> bool {
    let Some(rest) = hash.strip_prefix("$2") else {
        return false;
    };
    let mut chars = rest.chars();
    let variant_ok = matches!(chars.next(), Some('a' | 'b' | 'y'));
    let sep_ok = chars.next() == Some('$');
    let cost_ok = chars.next().is_some_and(|c| c.is_ascii_digit())
        && chars.next().is_some_and(|c| c.is_ascii_digit());
    let sep2_ok = chars.next() == Some('$');
    let tail: Vec<char> = chars.collect();
    variant_ok && sep_ok && cost_ok && sep2_ok && tail.len() == 53 && !tail.contains(&'\n')
}
